//! The project explorer panel.
//!
//! A vertically scrolling list of typed rows (project, songs, instruments,
//! DPCM samples, arpeggios and inline parameter controls) driven by raw
//! pointer events. Every gesture goes through a single capture slot; edits
//! are recorded through [`Transactions`] and user-visible effects are
//! queued as [`ExplorerEvent`]s.

mod actions;
mod capture;
pub mod controls;
mod events;
pub mod geometry;
mod input;
mod persist;
mod render;
pub mod rows;
pub mod scroll;
mod tooltip;

pub use capture::{Capture, CaptureOperation, DragPayload};
pub use events::{
    CursorShape, ExplorerEvent, ImportKind, Modifiers, Point, PointerButton, PointerEvent,
};
pub use geometry::Geometry;
pub use hit_test::Hit;
pub use persist::{ExplorerState, StateError};
pub use render::Canvas;
pub use rows::{FontWeight, Icon, Row, RowEntity, RowKind, Selection, SubButton};
pub use tooltip::Tooltip;

use chiptrack_types::{ArpeggioId, InstrumentId, Project, SampleId, SongId};

use crate::dialogs::{Dialogs, DropTargets};
use crate::transaction::Transactions;

use scroll::ScrollState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollBarStyle {
    None,
    #[default]
    Thin,
    Thick,
}

/// Explorer tuning, normally produced by `Config::explorer_settings`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerSettings {
    pub ui_scale: f32,
    /// Pixels a pending drag must move on either axis before it starts.
    pub drag_threshold: i32,
    pub scroll_bar: ScrollBarStyle,
    pub wheel_rows: i32,
    /// Pixels per step when fine-adjusting a slider.
    pub fine_adjust_divisor: i32,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            ui_scale: 1.0,
            drag_threshold: 4,
            scroll_bar: ScrollBarStyle::Thin,
            wheel_rows: 3,
            fine_adjust_divisor: 4,
        }
    }
}

/// Collaborators an input event may need.
pub struct ExplorerEnv<'a> {
    pub project: &'a mut Project,
    pub transactions: &'a mut dyn Transactions,
    pub dialogs: &'a mut dyn Dialogs,
    pub drop_targets: &'a dyn DropTargets,
}

pub struct ProjectExplorer {
    settings: ExplorerSettings,
    /// Screen position of the widget's top-left corner.
    origin: Point,
    width: i32,
    height: i32,
    geometry: Geometry,
    rows: Vec<Row>,
    show_expand: bool,
    scroll: ScrollState,
    capture: Option<Capture>,
    selection: Selection,
    expanded_instrument: Option<InstrumentId>,
    expanded_sample: Option<SampleId>,
    /// Last pointer position seen, for drag feedback.
    pointer: Option<Point>,
    last_pan_y: i32,
    instruments_hovered: bool,
    events: Vec<ExplorerEvent>,
}

impl ProjectExplorer {
    pub fn new(settings: ExplorerSettings, width: i32, height: i32, project: &Project) -> Self {
        let geometry = Geometry::compute(&settings, width, height, 0);
        let mut explorer = Self {
            settings,
            origin: Point::default(),
            width,
            height,
            geometry,
            rows: Vec::new(),
            show_expand: false,
            scroll: ScrollState::default(),
            capture: None,
            selection: Selection::default(),
            expanded_instrument: None,
            expanded_sample: None,
            pointer: None,
            last_pan_y: 0,
            instruments_hovered: false,
            events: Vec::new(),
        };
        explorer.reset(project);
        explorer
    }

    /// Select the first song and instrument, collapse everything, scroll to top.
    pub fn reset(&mut self, project: &Project) {
        self.capture = None;
        self.selection = Selection {
            song: project.first_song(),
            instrument: project.first_instrument(),
            arpeggio: None,
        };
        self.expanded_instrument = None;
        self.expanded_sample = None;
        self.rebuild(project);
        self.scroll.scroll_to(0);
    }

    /// Rebuild the row list from the project. Not allowed while a drag is
    /// in flight; the drag is dropped if it happens anyway.
    pub fn rebuild(&mut self, project: &Project) {
        if let Some(capture) = &self.capture {
            if capture.op.is_drag() {
                debug_assert!(false, "rebuild during {:?}", capture.op);
                log::warn!(target: "explorer", "rebuild during {:?}, dropping the drag", capture.op);
                self.capture = None;
            }
        }

        self.sanitize(project);
        self.rows = rows::build_rows(project, self.expanded_instrument, self.expanded_sample);
        self.show_expand = rows::show_expand_buttons(project);
        self.update_layout();
    }

    /// Forget ids the project no longer has.
    fn sanitize(&mut self, project: &Project) {
        if self.selection.song.and_then(|id| project.song(id)).is_none() {
            self.selection.song = project.first_song();
        }
        if let Some(id) = self.selection.instrument {
            if project.instrument(id).is_none() {
                self.selection.instrument = project.first_instrument();
            }
        }
        if let Some(id) = self.selection.arpeggio {
            if project.arpeggio(id).is_none() {
                self.selection.arpeggio = None;
            }
        }
        if let Some(id) = self.expanded_instrument {
            if project.instrument(id).is_none() {
                self.expanded_instrument = None;
            }
        }
        if let Some(id) = self.expanded_sample {
            if project.sample(id).is_none() {
                self.expanded_sample = None;
            }
        }
    }

    fn update_layout(&mut self) {
        self.geometry = Geometry::compute(&self.settings, self.width, self.height, self.rows.len());
        self.scroll.set_extent(self.geometry.content_height, self.height);
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.update_layout();
    }

    pub fn set_settings(&mut self, settings: ExplorerSettings) {
        self.settings = settings;
        self.update_layout();
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn settings(&self) -> &ExplorerSettings {
        &self.settings
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn show_expand_buttons(&self) -> bool {
        self.show_expand
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll.offset()
    }

    pub fn scroll_to(&mut self, offset: i32) {
        self.scroll.scroll_to(offset);
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_song(&self) -> Option<SongId> {
        self.selection.song
    }

    pub fn selected_instrument(&self) -> Option<InstrumentId> {
        self.selection.instrument
    }

    pub fn selected_arpeggio(&self) -> Option<ArpeggioId> {
        self.selection.arpeggio
    }

    /// Selection changes made elsewhere (piano roll, sequencer).
    pub fn select_song(&mut self, id: SongId) {
        self.selection.song = Some(id);
    }

    pub fn select_instrument(&mut self, id: Option<InstrumentId>) {
        self.selection.instrument = id;
    }

    pub fn select_arpeggio(&mut self, id: Option<ArpeggioId>) {
        self.selection.arpeggio = id;
    }

    pub fn expanded_instrument(&self) -> Option<InstrumentId> {
        self.expanded_instrument
    }

    pub fn expanded_sample(&self) -> Option<SampleId> {
        self.expanded_sample
    }

    pub fn capture(&self) -> Option<&Capture> {
        self.capture.as_ref()
    }

    pub fn capture_operation(&self) -> Option<CaptureOperation> {
        self.capture.as_ref().map(|c| c.op)
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    pub fn hit_test(&self, project: &Project, x: i32, y: i32) -> Option<Hit> {
        hit_test::hit_test(
            &self.geometry,
            &self.rows,
            project,
            self.scroll.offset(),
            self.show_expand,
            x,
            y,
        )
    }

    pub fn take_events(&mut self) -> Vec<ExplorerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn cursor(&self) -> CursorShape {
        match &self.capture {
            Some(c) if c.threshold_met => match (c.op, c.payload) {
                (CaptureOperation::DragInstrument, DragPayload::Instrument { envelope, .. }) => {
                    if envelope.is_some() {
                        CursorShape::Copy
                    } else {
                        CursorShape::Drag
                    }
                }
                (CaptureOperation::DragArpeggio, _) | (CaptureOperation::DragSample, _) => {
                    CursorShape::Drag
                }
                _ => CursorShape::Default,
            },
            _ => CursorShape::Default,
        }
    }

    fn emit(&mut self, event: ExplorerEvent) {
        log::debug!(target: "explorer", "event {:?}", event);
        self.events.push(event);
    }

    fn to_screen(&self, p: Point) -> Point {
        p.offset(self.origin.x, self.origin.y)
    }

    fn row_top(&self, index: usize) -> i32 {
        index as i32 * self.geometry.row_height - self.scroll.offset()
    }
}
