use serde::{Deserialize, Serialize};

use crate::{ArpeggioId, Color, InstrumentId, SongId};

pub const MAX_SONG_LENGTH: u16 = 256;
pub const DEFAULT_FAMITRACKER_TEMPO: u16 = 150;

/// A note placed in a song, referencing the instrument and arpeggio it plays with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub time: u32,
    pub value: u8,
    #[serde(default)]
    pub instrument: Option<InstrumentId>,
    #[serde(default)]
    pub arpeggio: Option<ArpeggioId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub name: String,
    pub color: Color,
    pub length: u16,
    pub famitracker_tempo: u16,
    pub famitracker_speed: u8,
    pub beat_length: u8,
    pub pattern_length: u16,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Song {
    pub fn new(id: SongId, name: &str, color: Color) -> Self {
        Self {
            id,
            name: name.to_string(),
            color,
            length: 16,
            famitracker_tempo: DEFAULT_FAMITRACKER_TEMPO,
            famitracker_speed: 6,
            beat_length: 4,
            pattern_length: 64,
            notes: Vec::new(),
        }
    }

    pub fn set_length(&mut self, length: u16) {
        self.length = length.clamp(1, MAX_SONG_LENGTH);
    }

    pub fn uses_instrument(&self, id: InstrumentId) -> bool {
        self.notes.iter().any(|n| n.instrument == Some(id))
    }

    pub fn uses_arpeggio(&self, id: ArpeggioId) -> bool {
        self.notes.iter().any(|n| n.arpeggio == Some(id))
    }

    /// Point every note using `old` at `new` (or at nothing).
    pub fn replace_instrument(&mut self, old: InstrumentId, new: Option<InstrumentId>) {
        for note in self.notes.iter_mut().filter(|n| n.instrument == Some(old)) {
            note.instrument = new;
        }
    }

    pub fn replace_arpeggio(&mut self, old: ArpeggioId, new: Option<ArpeggioId>) {
        for note in self.notes.iter_mut().filter(|n| n.arpeggio == Some(old)) {
            note.arpeggio = new;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_clamped() {
        let mut song = Song::new(SongId::new(0), "Song 1", Color::default());
        song.set_length(0);
        assert_eq!(song.length, 1);
        song.set_length(1000);
        assert_eq!(song.length, MAX_SONG_LENGTH);
    }

    #[test]
    fn replace_instrument_rewrites_notes() {
        let a = InstrumentId::new(1);
        let b = InstrumentId::new(2);
        let mut song = Song::new(SongId::new(0), "Song 1", Color::default());
        song.notes.push(Note { time: 0, value: 40, instrument: Some(a), arpeggio: None });
        song.notes.push(Note { time: 4, value: 42, instrument: Some(b), arpeggio: None });
        song.replace_instrument(a, Some(b));
        assert!(!song.uses_instrument(a));
        assert_eq!(song.notes.iter().filter(|n| n.instrument == Some(b)).count(), 2);
    }
}
