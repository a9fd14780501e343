//! Collaborators the explorer calls out to: modal prompts and property
//! editors, plus the panels that accept drags leaving the explorer.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chiptrack_types::{Color, ExpansionType, Project, Song, TempoMode};

use crate::explorer::Point;

/// Editable project-wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectProperties {
    pub name: String,
    pub author: String,
    pub copyright: String,
    pub tempo_mode: TempoMode,
    pub pal_mode: bool,
    pub n163_channels: u8,
    pub expansions: BTreeSet<ExpansionType>,
}

impl ProjectProperties {
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            author: project.author.clone(),
            copyright: project.copyright.clone(),
            tempo_mode: project.tempo_mode,
            pal_mode: project.pal_mode,
            n163_channels: project.n163_channels,
            expansions: project.expansions.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongProperties {
    pub name: String,
    pub color: Color,
    pub length: u16,
    pub famitracker_tempo: u16,
    pub famitracker_speed: u8,
    pub beat_length: u8,
    pub pattern_length: u16,
}

impl SongProperties {
    pub fn from_song(song: &Song) -> Self {
        Self {
            name: song.name.clone(),
            color: song.color,
            length: song.length,
            famitracker_tempo: song.famitracker_tempo,
            famitracker_speed: song.famitracker_speed,
            beat_length: song.beat_length,
            pattern_length: song.pattern_length,
        }
    }
}

/// Name and color, the properties instruments, arpeggios and samples share.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityProperties {
    pub name: String,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Instrument,
    Arpeggio,
    Sample,
}

impl EntityKind {
    pub fn title(self) -> &'static str {
        match self {
            EntityKind::Instrument => "Instrument Properties",
            EntityKind::Arpeggio => "Arpeggio Properties",
            EntityKind::Sample => "DPCM Sample Properties",
        }
    }
}

/// Modal interaction with the user. Every call returns before the next
/// pointer event is processed.
pub trait Dialogs {
    /// Yes/no question. `false` means the action is declined.
    fn confirm(&mut self, title: &str, message: &str) -> bool;

    fn warn(&mut self, message: &str);

    fn beep(&mut self) {}

    /// Pick the chip for a new instrument. `None` cancels.
    fn pick_expansion(&mut self, choices: &[ExpansionType]) -> Option<ExpansionType>;

    fn edit_project(&mut self, current: &ProjectProperties) -> Option<ProjectProperties>;

    fn edit_song(&mut self, current: &SongProperties) -> Option<SongProperties>;

    fn edit_entity(
        &mut self,
        kind: EntityKind,
        current: &EntityProperties,
    ) -> Option<EntityProperties>;

    /// Destination for an export, `None` cancels.
    fn save_path(&mut self, title: &str, extension: &str) -> Option<PathBuf>;
}

/// Panels outside the explorer that accept dropped samples.
pub trait DropTargets {
    /// Note under a screen position on the sample mapping strip, if any.
    fn sample_mapping_note_at(&self, pos: Point) -> Option<u8>;
}

/// Drop target that accepts nothing.
pub struct NoDropTargets;

impl DropTargets for NoDropTargets {
    fn sample_mapping_note_at(&self, _pos: Point) -> Option<u8> {
        None
    }
}
