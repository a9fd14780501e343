//! Pointer entry points and per-row-kind dispatch.

use chiptrack_types::Project;

use super::capture::{Capture, CaptureOperation, DragPayload};
use super::controls;
use super::events::{ExplorerEvent, ImportKind, Point, PointerEvent};
use super::hit_test::Hit;
use super::rows::{RowEntity, RowKind, SubButton};
use super::{ExplorerEnv, ProjectExplorer};
use crate::transaction::TransactionFlags;

impl ProjectExplorer {
    /// Ignored while a capture is active. Tried in order: pan, scroll bar, rows.
    pub fn pointer_down(&mut self, env: &mut ExplorerEnv, ev: PointerEvent) {
        self.pointer = Some(ev.pos());
        if self.capture.is_some() {
            return;
        }
        if ev.is_pan() {
            self.last_pan_y = ev.y;
            return;
        }
        if self.scroll_bar_down(&ev) {
            return;
        }

        let Some(hit) = self.hit_test(env.project, ev.x, ev.y) else {
            return;
        };
        let Some(kind) = self.rows.get(hit.row).map(|r| r.kind) else {
            return;
        };
        match kind {
            RowKind::ProjectHeader => {}
            RowKind::SongSectionHeader => self.song_header_down(env, &ev, &hit),
            RowKind::Song => self.song_down(env, &ev, &hit),
            RowKind::InstrumentSectionHeader => self.instrument_header_down(env, &ev, &hit),
            RowKind::Instrument => self.instrument_down(env, &ev, &hit),
            RowKind::DpcmSectionHeader => {
                if ev.is_left() && hit.sub == Some(SubButton::Load) {
                    self.emit(ExplorerEvent::ImportRequested(ImportKind::Samples));
                }
            }
            RowKind::DpcmSample => self.sample_down(env, &ev, &hit),
            RowKind::ArpeggioSectionHeader => {
                if ev.is_left() && hit.sub == Some(SubButton::Add) {
                    self.add_arpeggio(env);
                }
            }
            RowKind::Arpeggio => self.arpeggio_down(env, &ev, &hit),
            RowKind::ParamSlider => self.slider_down(env, &ev, &hit),
            RowKind::ParamCheckbox => self.checkbox_down(env, &ev, &hit),
            RowKind::ParamCycleList => self.list_down(env, &ev, &hit),
        }
    }

    pub fn pointer_move(&mut self, env: &mut ExplorerEnv, ev: PointerEvent) {
        self.pointer = Some(ev.pos());
        if self.capture.is_some() {
            self.capture_pointer_move(env, &ev);
        } else if ev.is_pan() {
            self.scroll.scroll_by(self.last_pan_y - ev.y);
            self.last_pan_y = ev.y;
        }
        self.update_hover(env.project, &ev);
    }

    pub fn pointer_up(&mut self, env: &mut ExplorerEnv, ev: PointerEvent) {
        self.pointer = Some(ev.pos());
        self.capture_pointer_up(env, &ev);
    }

    /// Positive deltas scroll up.
    pub fn wheel(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }
        let amount = self.geometry.row_height * self.settings.wheel_rows;
        self.scroll.scroll_by(if delta > 0 { -amount } else { amount });
    }

    pub fn pointer_leave(&mut self) {
        if self.capture.is_none() {
            self.pointer = None;
        }
        self.set_instruments_hovered(false);
    }

    /// Aborts any capture first, then opens the properties of what was hit.
    pub fn double_click(&mut self, env: &mut ExplorerEnv, ev: PointerEvent) {
        if self.capture.is_some() {
            self.abort_capture(env.transactions, env.project);
        }
        let Some(hit) = self.hit_test(env.project, ev.x, ev.y) else {
            return;
        };
        let Some(row) = self.rows.get(hit.row) else {
            return;
        };
        match (row.kind, row.entity, hit.sub) {
            (RowKind::ProjectHeader, _, _) => self.edit_project_properties(env),
            (RowKind::Song, RowEntity::Song(id), _) => self.edit_song_properties(env, id),
            (RowKind::Instrument, entity @ RowEntity::Instrument(_), None)
            | (RowKind::Arpeggio, entity @ RowEntity::Arpeggio(_), None)
            | (RowKind::DpcmSample, entity @ RowEntity::Sample(_), None) => {
                self.edit_entity_properties(env, entity)
            }
            _ => {}
        }
    }

    fn update_hover(&mut self, project: &Project, ev: &PointerEvent) {
        let hovered = self
            .hit_test(project, ev.x, ev.y)
            .and_then(|hit| self.rows.get(hit.row))
            .is_some_and(|row| {
                matches!(row.kind, RowKind::Instrument | RowKind::InstrumentSectionHeader)
            });
        self.set_instruments_hovered(hovered);
    }

    fn set_instruments_hovered(&mut self, hovered: bool) {
        if hovered != self.instruments_hovered {
            self.instruments_hovered = hovered;
            self.emit(ExplorerEvent::InstrumentsHovered(hovered));
        }
    }

    fn scroll_bar_down(&mut self, ev: &PointerEvent) -> bool {
        if !ev.is_left() || !self.geometry.in_scroll_bar(ev.x) {
            return false;
        }
        let Some(thumb) = self.scroll.thumb() else {
            return true;
        };
        if ev.y < thumb.top {
            self.scroll.page(false);
        } else if ev.y > thumb.top + thumb.height {
            self.scroll.page(true);
        } else {
            self.start_capture(Capture::new(
                CaptureOperation::ScrollBar,
                ev.pos(),
                None,
                Point::new(ev.x - self.geometry.usable_width, ev.y - thumb.top),
                DragPayload::None,
                self.scroll.offset(),
            ));
        }
        true
    }

    fn start_drag(&mut self, op: CaptureOperation, ev: &PointerEvent, hit: &Hit, payload: DragPayload) {
        self.start_capture(Capture::new(
            op,
            ev.pos(),
            Some(hit.row),
            Point::new(hit.rel_x, hit.rel_y),
            payload,
            self.scroll.offset(),
        ));
    }

    fn song_header_down(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent, hit: &Hit) {
        if !ev.is_left() {
            return;
        }
        match hit.sub {
            Some(SubButton::Add) => self.add_song(env),
            Some(SubButton::Load) => self.emit(ExplorerEvent::ImportRequested(ImportKind::Songs)),
            _ => {}
        }
    }

    fn song_down(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent, hit: &Hit) {
        let Some(id) = self.rows[hit.row].entity.song() else {
            return;
        };
        if ev.is_left() {
            if self.selection.song != Some(id) {
                self.selection.song = Some(id);
                self.emit(ExplorerEvent::SongSelected(id));
            }
            self.start_drag(CaptureOperation::DragSong, ev, hit, DragPayload::Song(id));
        } else if ev.is_right() && env.project.songs.len() > 1 {
            self.delete_song(env, id);
        }
    }

    fn instrument_header_down(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent, hit: &Hit) {
        if !ev.is_left() {
            return;
        }
        match hit.sub {
            Some(SubButton::Add) => self.add_instrument(env),
            Some(SubButton::Load) => {
                self.emit(ExplorerEvent::ImportRequested(ImportKind::Instruments))
            }
            _ => {}
        }
    }

    fn instrument_down(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent, hit: &Hit) {
        let entity = self.rows[hit.row].entity.instrument();
        let envelope = match hit.sub {
            Some(SubButton::Envelope(kind)) => Some(kind),
            _ => None,
        };

        if ev.is_left() {
            if hit.sub == Some(SubButton::Expand) {
                if let Some(id) = entity {
                    self.toggle_expanded_instrument(env.project, id);
                }
                return;
            }

            self.selection.instrument = entity;
            self.emit(ExplorerEvent::InstrumentSelected(entity));
            match (hit.sub, entity) {
                (Some(SubButton::Dpcm), _) => self.emit(ExplorerEvent::InstrumentEdited {
                    id: None,
                    envelope: None,
                }),
                (Some(SubButton::Envelope(kind)), Some(id)) => {
                    self.emit(ExplorerEvent::InstrumentEdited {
                        id: Some(id),
                        envelope: Some(kind),
                    })
                }
                _ => {}
            }
            if let Some(id) = entity {
                self.start_drag(
                    CaptureOperation::DragInstrument,
                    ev,
                    hit,
                    DragPayload::Instrument { id, envelope },
                );
            }
        } else if ev.is_right() {
            let Some(id) = entity else {
                return;
            };
            match (hit.sub, envelope) {
                (Some(_), Some(kind)) => self.clear_envelope(env, id, kind),
                (None, _) => self.delete_instrument(env, id),
                _ => {}
            }
        }
    }

    fn arpeggio_down(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent, hit: &Hit) {
        let entity = self.rows[hit.row].entity.arpeggio();
        let on_envelope = hit.sub == Some(SubButton::ArpeggioEnvelope);

        if ev.is_left() {
            self.selection.arpeggio = entity;
            self.emit(ExplorerEvent::ArpeggioSelected(entity));
            if let (true, Some(id)) = (on_envelope, entity) {
                self.emit(ExplorerEvent::ArpeggioEdited(id));
            }
            self.start_drag(
                CaptureOperation::DragArpeggio,
                ev,
                hit,
                DragPayload::Arpeggio {
                    id: entity,
                    envelope: on_envelope,
                },
            );
        } else if ev.is_right() && hit.sub.is_none() {
            if let Some(id) = entity {
                self.delete_arpeggio(env, id);
            }
        }
    }

    fn sample_down(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent, hit: &Hit) {
        let Some(id) = self.rows[hit.row].entity.sample() else {
            return;
        };
        if ev.is_left() {
            match hit.sub {
                Some(SubButton::EditWave) => self.emit(ExplorerEvent::SampleEdited(id)),
                Some(SubButton::Reload) => self.reload_sample(env, id),
                Some(SubButton::Save) => self.export_processed_sample(env, id),
                Some(SubButton::Play) => {
                    self.emit(ExplorerEvent::PreviewSample { id, source: false })
                }
                Some(SubButton::Expand) => self.toggle_expanded_sample(env.project, id),
                None => self.start_drag(CaptureOperation::DragSample, ev, hit, DragPayload::Sample(id)),
                _ => {}
            }
        } else if ev.is_right() {
            match hit.sub {
                Some(SubButton::Play) => {
                    self.emit(ExplorerEvent::PreviewSample { id, source: true })
                }
                Some(SubButton::Save) => self.export_sample_source(env, id),
                None => self.delete_sample(env, id),
                _ => {}
            }
        }
    }

    fn slider_down(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent, hit: &Hit) {
        let Some(param) = self.rows[hit.row].param.clone() else {
            return;
        };
        if ev.is_left() {
            if !controls::inside_slider(&self.geometry, ev.x, hit.rel_y) {
                return;
            }
            if !env.transactions.begin(env.project, param.scope(), TransactionFlags::NONE) {
                return;
            }
            let mut last_x = ev.x;
            if !self.update_slider_value(env.project, hit.row, ev, true, &mut last_x) {
                env.transactions.abort(env.project);
                return;
            }
            let mut capture = Capture::new(
                CaptureOperation::MoveSlider,
                ev.pos(),
                Some(hit.row),
                Point::new(hit.rel_x, hit.rel_y),
                DragPayload::None,
                self.scroll.offset(),
            );
            capture.last_x = last_x;
            if !self.start_capture(capture) {
                env.transactions.abort(env.project);
            }
        } else if ev.is_right() && ev.x >= self.geometry.slider_left() {
            self.edit_param(env, &param, param.info.default);
        }
    }

    fn checkbox_down(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent, hit: &Hit) {
        let Some(param) = self.rows[hit.row].param.clone() else {
            return;
        };
        if !controls::in_checkbox_column(&self.geometry, ev.x) {
            return;
        }
        let Some(current) = param.value(env.project) else {
            return;
        };
        if ev.is_left() {
            self.edit_param(env, &param, controls::checkbox_toggle(current));
        } else if ev.is_right() {
            self.edit_param(env, &param, param.info.default);
        }
    }

    fn list_down(&mut self, env: &mut ExplorerEnv, ev: &PointerEvent, hit: &Hit) {
        let Some(param) = self.rows[hit.row].param.clone() else {
            return;
        };
        let Some(current) = param.value(env.project) else {
            return;
        };
        if ev.is_left() {
            if let Some(arrow) = controls::list_arrow_at(&self.geometry, ev.x) {
                let value = controls::list_step(&param.info, current, arrow);
                self.edit_param(env, &param, value);
            }
        } else if ev.is_right() && ev.x > self.geometry.slider_left() {
            self.edit_param(env, &param, param.info.default);
        }
    }
}
