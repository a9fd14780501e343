//! Draw pass. The explorer only describes what to draw; the host supplies
//! a [`Canvas`] that turns the calls into pixels.

use chiptrack_types::{Color, EnvelopeType, Project};

use super::capture::{Capture, CaptureOperation, DragPayload};
use super::controls::{self, ListArrow};
use super::rows::{
    display_font, display_text, is_expand_eligible, sub_button_icon, sub_buttons, FontWeight, Icon,
    Row, RowEntity, RowKind, SubButton,
};
use super::{Point, ProjectExplorer};

const BACKGROUND: Color = Color::rgb(45, 45, 48);
const ROW_SEPARATOR: Color = Color::rgb(30, 30, 32);
const TEXT: Color = Color::BLACK;
const DISABLED_TEXT: Color = Color::rgb(110, 110, 110);
const SLIDER_FILL: Color = Color::rgb(0, 0, 0).with_alpha(64);
const SLIDER_BORDER: Color = Color::BLACK;
const DRAG_LINE: Color = Color::WHITE;
const SCROLL_TRACK: Color = Color::rgb(60, 60, 64);
const SCROLL_THUMB: Color = Color::rgb(140, 140, 146);

const INACTIVE_SUB_BUTTON_OPACITY: f32 = 0.2;
const DIMMED_CONTROL_OPACITY: f32 = 0.25;
const GHOST_OPACITY: f32 = 0.5;
const DRAG_BAND_ALPHA: u8 = 128;

/// Drawing surface. Coordinates are widget-local pixels, offset by any
/// translations pushed so far.
pub trait Canvas {
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);

    fn fill_and_draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, fill: Color, border: Color) {
        self.fill_rect(x, y, w, h, fill);
        self.draw_rect(x, y, w, h, border);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color, thickness: i32);

    /// Text clipped to `clip_width` pixels from `x`.
    fn draw_text(&mut self, text: &str, font: FontWeight, x: i32, y: i32, color: Color, clip_width: i32);

    fn draw_icon(&mut self, icon: Icon, x: i32, y: i32, opacity: f32);

    fn push_translation(&mut self, dx: i32, dy: i32);
    fn pop_transform(&mut self);
}

impl ProjectExplorer {
    pub fn render(&self, project: &Project, canvas: &mut dyn Canvas) {
        let g = &self.geometry;
        canvas.fill_rect(0, 0, g.width, g.height, BACKGROUND);

        let rh = g.row_height;
        let scroll = self.scroll.offset();
        let first = (scroll / rh).max(0) as usize;
        let last = (((scroll + g.height) / rh) as usize + 1).min(self.rows.len());

        for index in first..last {
            self.render_row(project, canvas, index, first);
        }

        if let Some(capture) = self.capture.as_ref().filter(|c| c.threshold_met) {
            if let Some(pointer) = self.pointer {
                self.render_drag(project, canvas, capture, pointer);
            }
        }

        if g.has_scroll_bar() {
            canvas.fill_rect(g.usable_width, 0, g.scroll_bar_thickness, g.height, SCROLL_TRACK);
            if let Some(thumb) = self.scroll.thumb() {
                canvas.fill_rect(
                    g.usable_width,
                    thumb.top,
                    g.scroll_bar_thickness,
                    thumb.height,
                    SCROLL_THUMB,
                );
            }
        }
    }

    fn render_row(&self, project: &Project, canvas: &mut dyn Canvas, index: usize, first_visible: usize) {
        let g = &self.geometry;
        let row = &self.rows[index];
        let rh = g.row_height;

        canvas.push_translation(0, self.row_top(index));

        // A run of parameter rows shares one background, painted by its
        // first visible row.
        let continues_group = row.kind.is_param()
            && index > first_visible
            && self.rows[index - 1].kind.is_param();
        if !continues_group {
            let span = if row.kind.is_param() {
                self.rows[index..]
                    .iter()
                    .take_while(|r| r.kind.is_param())
                    .count() as i32
            } else {
                1
            };
            canvas.fill_rect(0, 0, g.usable_width, rh * span, row.color);
        }
        let ends_group = row.kind.is_param()
            && self.rows.get(index + 1).is_some_and(|r| r.kind.is_param());
        if !ends_group {
            canvas.draw_line(0, rh - 1, g.usable_width, rh - 1, ROW_SEPARATOR, 1);
        }

        if self.show_expand && is_expand_eligible(row, project) {
            let icon = if self.is_expanded(row) {
                Icon::Expanded
            } else {
                Icon::Expand
            };
            canvas.draw_icon(icon, g.expand_pos_x, g.expand_pos_y, 1.0);
        }

        let enabled = row.param.as_ref().map_or(true, |p| p.enabled(project));
        let text_color = if enabled { TEXT } else { DISABLED_TEXT };
        let shift = if self.show_expand && row.kind.is_left_aligned() {
            g.expand_size_x + 1
        } else {
            0
        };

        canvas.push_translation(shift, 0);
        let text_x = match row.icon {
            Some(icon) => {
                canvas.draw_icon(icon, g.icon_pos_x, g.icon_pos_y, 1.0);
                g.text_pos_x
            }
            None => g.text_no_icon_pos_x,
        };
        let text_right = if row.kind.is_param() {
            g.slider_left()
        } else {
            g.usable_width
        };
        canvas.draw_text(
            &display_text(row, project),
            display_font(row, &self.selection),
            text_x,
            g.text_pos_y,
            text_color,
            text_right - shift - text_x,
        );
        canvas.pop_transform();

        if row.kind.is_param() {
            self.render_param(project, canvas, row, enabled, text_color);
        }

        for (slot, s) in sub_buttons(row, project, self.show_expand).iter().enumerate() {
            if s.button == SubButton::Expand {
                continue;
            }
            let opacity = if s.active {
                1.0
            } else {
                INACTIVE_SUB_BUTTON_OPACITY
            };
            canvas.draw_icon(
                sub_button_icon(s.button, false),
                g.sub_button_x(slot),
                g.sub_button_pos_y,
                opacity,
            );
        }

        canvas.pop_transform();
    }

    fn render_param(
        &self,
        project: &Project,
        canvas: &mut dyn Canvas,
        row: &Row,
        enabled: bool,
        text_color: Color,
    ) {
        let g = &self.geometry;
        let Some(param) = &row.param else {
            return;
        };
        let Some(value) = param.value(project) else {
            return;
        };
        let info = &param.info;
        let left = g.slider_left();

        match row.kind {
            RowKind::ParamSlider => {
                let fill = controls::slider_fill_width(info, value, g.slider_size_x);
                canvas.fill_rect(left, g.slider_pos_y, fill, g.slider_size_y, SLIDER_FILL);
                canvas.draw_rect(left, g.slider_pos_y, g.slider_size_x, g.slider_size_y, SLIDER_BORDER);
                canvas.draw_text(
                    &info.value_string(value),
                    FontWeight::Regular,
                    left,
                    g.slider_pos_y,
                    text_color,
                    g.slider_size_x,
                );
            }
            RowKind::ParamCheckbox => {
                let icon = if value != 0 {
                    Icon::CheckBoxOn
                } else {
                    Icon::CheckBoxOff
                };
                let opacity = if enabled { 1.0 } else { DIMMED_CONTROL_OPACITY };
                canvas.draw_icon(icon, g.check_box_left(), g.check_box_pos_y, opacity);
            }
            RowKind::ParamCycleList => {
                let arrow = g.list_arrow_size_x;
                let opacity = |a| {
                    if controls::list_arrow_enabled(info, value, a, enabled) {
                        1.0
                    } else {
                        DIMMED_CONTROL_OPACITY
                    }
                };
                canvas.draw_icon(Icon::ListLeft, left, g.slider_pos_y, opacity(ListArrow::Decrement));
                canvas.draw_icon(
                    Icon::ListRight,
                    left + g.slider_size_x - arrow,
                    g.slider_pos_y,
                    opacity(ListArrow::Increment),
                );
                canvas.draw_text(
                    &info.value_string(value),
                    FontWeight::Regular,
                    left + arrow,
                    g.slider_pos_y,
                    text_color,
                    g.slider_size_x - 2 * arrow,
                );
            }
            _ => {}
        }
    }

    fn render_drag(&self, project: &Project, canvas: &mut dyn Canvas, capture: &Capture, pointer: Point) {
        let g = &self.geometry;
        let rh = g.row_height;
        let scroll = self.scroll.offset();

        match (capture.op, capture.payload) {
            (CaptureOperation::DragSong, DragPayload::Song(_)) => {
                let Some(previous) = self.song_drop_target(project, pointer.x, pointer.y) else {
                    return;
                };
                let index = self.rows.iter().position(|r| match previous {
                    Some(id) => r.kind == RowKind::Song && r.entity.song() == Some(id),
                    None => r.kind == RowKind::SongSectionHeader,
                });
                if let Some(index) = index {
                    let y = (index as i32 + 1) * rh - scroll;
                    canvas.draw_line(0, y, g.usable_width, y, DRAG_LINE, g.dragged_line_size_y);
                }
            }
            (CaptureOperation::DragInstrument, DragPayload::Instrument { id, envelope }) => {
                if !g.inside(pointer.x, pointer.y) {
                    return;
                }
                match envelope {
                    Some(kind) => {
                        self.render_ghost(canvas, capture, pointer, Icon::Envelope(kind), true)
                    }
                    None => {
                        if let Some(color) = project.instrument(id).map(|i| i.color) {
                            self.render_band(canvas, capture, RowKind::Instrument, pointer, color);
                        }
                    }
                }
            }
            (CaptureOperation::DragArpeggio, DragPayload::Arpeggio { id: Some(id), envelope }) => {
                if !g.inside(pointer.x, pointer.y) {
                    return;
                }
                if envelope {
                    let icon = Icon::Envelope(EnvelopeType::Arpeggio);
                    self.render_ghost(canvas, capture, pointer, icon, true);
                } else if let Some(color) = project.arpeggio(id).map(|a| a.color) {
                    self.render_band(canvas, capture, RowKind::Arpeggio, pointer, color);
                }
            }
            (CaptureOperation::DragSample, DragPayload::Sample(_)) => {
                if g.inside(pointer.x, pointer.y) {
                    self.render_ghost(canvas, capture, pointer, Icon::Sample, false);
                }
            }
            _ => {}
        }
    }

    /// Band under the pointer, offset by the grab point and kept within the
    /// rows holding an entity of the dragged kind.
    fn render_band(
        &self,
        canvas: &mut dyn Canvas,
        capture: &Capture,
        kind: RowKind,
        pointer: Point,
        color: Color,
    ) {
        let g = &self.geometry;
        let mut matching = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                r.kind == kind
                    && match kind {
                        RowKind::Instrument => r.entity.instrument().is_some(),
                        RowKind::Arpeggio => r.entity.arpeggio().is_some(),
                        _ => true,
                    }
            })
            .map(|(i, _)| i);
        let Some(min) = matching.next() else {
            return;
        };
        let max = matching.last().unwrap_or(min);

        let y = (pointer.y - capture.rel.y).clamp(self.row_top(min), self.row_top(max));
        canvas.fill_rect(
            0,
            y,
            g.usable_width,
            g.row_height,
            color.with_alpha(DRAG_BAND_ALPHA),
        );
    }

    fn render_ghost(
        &self,
        canvas: &mut dyn Canvas,
        capture: &Capture,
        pointer: Point,
        icon: Icon,
        grabbed_sub_button: bool,
    ) {
        let g = &self.geometry;
        let (x, y) = if grabbed_sub_button {
            (pointer.x - capture.rel.x, pointer.y - capture.rel.y)
        } else {
            let shift = if self.show_expand { g.expand_size_x + 1 } else { 0 };
            (
                pointer.x - capture.rel.x + g.icon_pos_x + shift,
                pointer.y - capture.rel.y + g.icon_pos_y,
            )
        };
        canvas.draw_icon(icon, x, y, GHOST_OPACITY);
    }

    fn is_expanded(&self, row: &Row) -> bool {
        match row.entity {
            RowEntity::Instrument(id) => self.expanded_instrument == Some(id),
            RowEntity::Sample(id) => self.expanded_sample == Some(id),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::ExplorerSettings;
    use chiptrack_types::SampleSource;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Fill(i32, i32, i32, i32, Color),
        Line(i32, i32),
        Text(String),
        Icon(Icon, i32, i32, f32),
        Push,
        Pop,
        Other,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Canvas for Recorder {
        fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
            self.calls.push(Call::Fill(x, y, w, h, color));
        }
        fn draw_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, _color: Color) {
            self.calls.push(Call::Other);
        }
        fn draw_line(&mut self, _x0: i32, y0: i32, _x1: i32, _y1: i32, _color: Color, thickness: i32) {
            self.calls.push(Call::Line(y0, thickness));
        }
        fn draw_text(&mut self, text: &str, _f: FontWeight, _x: i32, _y: i32, _c: Color, _w: i32) {
            self.calls.push(Call::Text(text.to_string()));
        }
        fn draw_icon(&mut self, icon: Icon, x: i32, y: i32, opacity: f32) {
            self.calls.push(Call::Icon(icon, x, y, opacity));
        }
        fn push_translation(&mut self, _dx: i32, _dy: i32) {
            self.calls.push(Call::Push);
        }
        fn pop_transform(&mut self) {
            self.calls.push(Call::Pop);
        }
    }

    fn draw(explorer: &ProjectExplorer, project: &Project) -> Vec<Call> {
        let mut canvas = Recorder::default();
        explorer.render(project, &mut canvas);
        canvas.calls
    }

    #[test]
    fn translations_balance() {
        let mut project = Project::new();
        project.add_sample("kick", SampleSource::Dmc(vec![0x55; 32]), None);
        let mut explorer = ProjectExplorer::new(ExplorerSettings::default(), 240, 400, &project);
        let id = project.samples[0].id;
        explorer.toggle_expanded_sample(&project, id);

        let calls = draw(&explorer, &project);
        let pushes = calls.iter().filter(|c| **c == Call::Push).count();
        let pops = calls.iter().filter(|c| **c == Call::Pop).count();
        assert_eq!(pushes, pops);
        assert!(pushes > 0);
    }

    #[test]
    fn reload_without_source_path_is_faded() {
        let mut project = Project::new();
        project.add_sample("kick", SampleSource::Dmc(vec![0x55; 33]), None);
        let explorer = ProjectExplorer::new(ExplorerSettings::default(), 240, 400, &project);

        let calls = draw(&explorer, &project);
        assert!(calls.iter().any(|c| matches!(
            c,
            Call::Icon(Icon::Reload, _, _, o) if *o == INACTIVE_SUB_BUTTON_OPACITY
        )));
        assert!(calls
            .iter()
            .any(|c| matches!(c, Call::Icon(Icon::Play, _, _, o) if *o == 1.0)));
        assert!(calls.iter().any(|c| *c == Call::Text("kick (33 Bytes)".into())));
    }

    #[test]
    fn song_drag_draws_insertion_line_and_no_ghost() {
        let mut project = Project::new();
        let second = project.create_song();
        let mut explorer = ProjectExplorer::new(ExplorerSettings::default(), 240, 400, &project);
        explorer.capture = Some(Capture::new(
            CaptureOperation::DragSong,
            Point::new(50, 3 * 21 + 5),
            Some(3),
            Point::new(50, 5),
            DragPayload::Song(second),
            0,
        ));
        explorer.pointer = Some(Point::new(50, 3 * 21 + 15));

        let calls = draw(&explorer, &project);
        // Half a row above the pointer is the second song itself: line under row 3.
        assert!(calls.iter().any(|c| *c == Call::Line(4 * 21, 5)));
        assert!(!calls
            .iter()
            .any(|c| matches!(c, Call::Icon(_, _, _, o) if *o == GHOST_OPACITY)));
    }

    fn dragging(explorer: &mut ProjectExplorer, op: CaptureOperation, row: usize, payload: DragPayload) {
        let mut capture = Capture::new(
            op,
            Point::new(50, row as i32 * 21 + 5),
            Some(row),
            Point::new(3, 5),
            payload,
            0,
        );
        capture.threshold_met = true;
        explorer.capture = Some(capture);
    }

    fn has_ghost(calls: &[Call]) -> bool {
        calls
            .iter()
            .any(|c| matches!(c, Call::Icon(_, _, _, o) if *o == GHOST_OPACITY))
    }

    fn bands(calls: &[Call], color: Color) -> Vec<i32> {
        let band = color.with_alpha(DRAG_BAND_ALPHA);
        calls
            .iter()
            .filter_map(|c| match c {
                Call::Fill(0, y, 240, 21, fill) if *fill == band => Some(*y),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn instrument_drag_draws_band_only() {
        let mut project = Project::new();
        let a = project.create_instrument(chiptrack_types::ExpansionType::None);
        project.create_instrument(chiptrack_types::ExpansionType::None);
        let mut explorer = ProjectExplorer::new(ExplorerSettings::default(), 240, 400, &project);
        dragging(
            &mut explorer,
            CaptureOperation::DragInstrument,
            5,
            DragPayload::Instrument { id: a, envelope: None },
        );
        // Far below the instrument rows: the band clamps to the last one.
        explorer.pointer = Some(Point::new(50, 395));

        let calls = draw(&explorer, &project);
        let color = project.instrument(a).map(|i| i.color).unwrap();
        assert_eq!(bands(&calls, color), vec![6 * 21]);
        assert!(!has_ghost(&calls));
    }

    #[test]
    fn band_follows_the_grab_offset() {
        let mut project = Project::new();
        let a = project.create_instrument(chiptrack_types::ExpansionType::None);
        project.create_instrument(chiptrack_types::ExpansionType::None);
        let mut explorer = ProjectExplorer::new(ExplorerSettings::default(), 240, 400, &project);
        dragging(
            &mut explorer,
            CaptureOperation::DragInstrument,
            5,
            DragPayload::Instrument { id: a, envelope: None },
        );
        explorer.pointer = Some(Point::new(50, 5 * 21 + 12));

        let calls = draw(&explorer, &project);
        let color = project.instrument(a).map(|i| i.color).unwrap();
        assert_eq!(bands(&calls, color), vec![5 * 21 + 7]);
    }

    #[test]
    fn instrument_drag_band_skips_dpcm_row() {
        let mut project = Project::new();
        let a = project.create_instrument(chiptrack_types::ExpansionType::None);
        let mut explorer = ProjectExplorer::new(ExplorerSettings::default(), 240, 400, &project);
        dragging(
            &mut explorer,
            CaptureOperation::DragInstrument,
            5,
            DragPayload::Instrument { id: a, envelope: None },
        );
        // Over the DPCM row, which holds no instrument.
        explorer.pointer = Some(Point::new(50, 4 * 21 + 5));

        let calls = draw(&explorer, &project);
        let color = project.instrument(a).map(|i| i.color).unwrap();
        assert_eq!(bands(&calls, color), vec![5 * 21]);
    }

    #[test]
    fn arpeggio_drag_band_skips_none_row() {
        let mut project = Project::new();
        let x = project.create_arpeggio();
        project.create_arpeggio();
        let mut explorer = ProjectExplorer::new(ExplorerSettings::default(), 240, 400, &project);
        // 6 arpeggio header, 7 None, 8 and 9 arpeggios.
        dragging(
            &mut explorer,
            CaptureOperation::DragArpeggio,
            8,
            DragPayload::Arpeggio { id: Some(x), envelope: false },
        );
        explorer.pointer = Some(Point::new(50, 7 * 21 + 5));

        let calls = draw(&explorer, &project);
        let color = project.arpeggio(x).map(|a| a.color).unwrap();
        assert_eq!(bands(&calls, color), vec![8 * 21]);
        assert!(!has_ghost(&calls));
    }

    #[test]
    fn instrument_envelope_drag_draws_ghost_only() {
        let mut project = Project::new();
        let a = project.create_instrument(chiptrack_types::ExpansionType::None);
        let mut explorer = ProjectExplorer::new(ExplorerSettings::default(), 240, 400, &project);
        dragging(
            &mut explorer,
            CaptureOperation::DragInstrument,
            5,
            DragPayload::Instrument {
                id: a,
                envelope: Some(EnvelopeType::Volume),
            },
        );
        explorer.pointer = Some(Point::new(100, 120));

        let calls = draw(&explorer, &project);
        let color = project.instrument(a).map(|i| i.color).unwrap();
        assert!(bands(&calls, color).is_empty());
        assert!(calls.iter().any(|c| *c
            == Call::Icon(Icon::Envelope(EnvelopeType::Volume), 97, 115, GHOST_OPACITY)));
    }
}
