use chiptrack_types::{ArpeggioId, EnvelopeType, InstrumentId, SampleId, SongId};

/// A position in pixels. Explorer entry points take widget-local
/// coordinates; drop notifications carry screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

/// One pointer event in widget-local coordinates. `button` is the button
/// pressed or released, or the one held during a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub x: i32,
    pub y: i32,
    pub button: Option<PointerButton>,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(x: i32, y: i32, button: Option<PointerButton>) -> Self {
        Self {
            x,
            y,
            button,
            modifiers: Modifiers::default(),
        }
    }

    pub fn left(x: i32, y: i32) -> Self {
        Self::new(x, y, Some(PointerButton::Left))
    }

    pub fn right(x: i32, y: i32) -> Self {
        Self::new(x, y, Some(PointerButton::Right))
    }

    pub fn middle(x: i32, y: i32) -> Self {
        Self::new(x, y, Some(PointerButton::Middle))
    }

    pub fn hover(x: i32, y: i32) -> Self {
        Self::new(x, y, None)
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_left(&self) -> bool {
        self.button == Some(PointerButton::Left)
    }

    pub fn is_right(&self) -> bool {
        self.button == Some(PointerButton::Right)
    }

    /// Middle button, or Alt with the left button.
    pub fn is_pan(&self) -> bool {
        self.button == Some(PointerButton::Middle) || (self.is_left() && self.modifiers.alt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Songs,
    Instruments,
    Samples,
}

/// Cursor the host should show over the explorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorShape {
    #[default]
    Default,
    Drag,
    Copy,
}

/// Notifications the explorer emits for the rest of the application.
/// Drained with `ProjectExplorer::take_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExplorerEvent {
    SongSelected(SongId),
    SongModified(SongId),
    InstrumentSelected(Option<InstrumentId>),
    /// Open an envelope editor; `id: None` with no envelope is the DPCM editor.
    InstrumentEdited {
        id: Option<InstrumentId>,
        envelope: Option<EnvelopeType>,
    },
    InstrumentReplaced(InstrumentId),
    InstrumentDeleted(InstrumentId),
    InstrumentColorChanged(InstrumentId),
    InstrumentDroppedOutside {
        id: InstrumentId,
        pos: Point,
    },
    ArpeggioSelected(Option<ArpeggioId>),
    ArpeggioEdited(ArpeggioId),
    ArpeggioDeleted(ArpeggioId),
    ArpeggioColorChanged(ArpeggioId),
    /// `id: None` is the "no arpeggio" row.
    ArpeggioDroppedOutside {
        id: Option<ArpeggioId>,
        pos: Point,
    },
    SampleEdited(SampleId),
    SampleReloaded(SampleId),
    SampleDeleted(SampleId),
    SampleColorChanged(SampleId),
    SampleDraggedOutside {
        id: SampleId,
        pos: Point,
    },
    SampleMapped {
        id: SampleId,
        note: u8,
    },
    /// `source: true` plays the unprocessed source data.
    PreviewSample {
        id: SampleId,
        source: bool,
    },
    ProjectModified,
    ImportRequested(ImportKind),
    InstrumentsHovered(bool),
}
