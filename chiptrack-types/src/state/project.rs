//! The project snapshot: ordered entity collections plus the operations the
//! explorer applies to them.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::arpeggio::Arpeggio;
use super::expansion::ExpansionType;
use super::instrument::Instrument;
use super::sample::{DpcmSample, SampleSource};
use super::song::{Song, DEFAULT_FAMITRACKER_TEMPO};
use crate::{ArpeggioId, Color, InstrumentId, SampleId, SongId};

/// Byte budget for all samples mapped to notes.
pub const MAX_MAPPED_SAMPLE_SIZE: usize = 16384;

/// Notes that can trigger a DPCM sample.
pub const DPCM_NOTE_MIN: u8 = 1;
pub const DPCM_NOTE_MAX: u8 = 63;

/// Samples are laid out in ROM on 64-byte boundaries.
const SAMPLE_ALIGNMENT: usize = 64;

pub const MAX_N163_CHANNELS: u8 = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempoMode {
    #[default]
    FamiStudio,
    FamiTracker,
}

impl TempoMode {
    pub fn name(self) -> &'static str {
        match self {
            TempoMode::FamiStudio => "FamiStudio",
            TempoMode::FamiTracker => "FamiTracker",
        }
    }
}

/// A DPCM sample assigned to a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleMapping {
    pub sample: SampleId,
    pub pitch: u8,
    pub looping: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub copyright: String,
    #[serde(default)]
    pub tempo_mode: TempoMode,
    #[serde(default)]
    pub pal_mode: bool,
    #[serde(default)]
    pub expansions: BTreeSet<ExpansionType>,
    #[serde(default = "default_n163_channels")]
    pub n163_channels: u8,
    pub songs: Vec<Song>,
    #[serde(default)]
    pub instruments: Vec<Instrument>,
    #[serde(default)]
    pub arpeggios: Vec<Arpeggio>,
    #[serde(default)]
    pub samples: Vec<DpcmSample>,
    #[serde(default)]
    pub sample_mappings: BTreeMap<u8, SampleMapping>,
    #[serde(default)]
    next_id: u32,
}

fn default_n163_channels() -> u8 {
    1
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    /// A new project holds a single empty song.
    pub fn new() -> Self {
        let mut project = Self {
            name: "Untitled".to_string(),
            author: String::new(),
            copyright: String::new(),
            tempo_mode: TempoMode::default(),
            pal_mode: false,
            expansions: BTreeSet::new(),
            n163_channels: default_n163_channels(),
            songs: Vec::new(),
            instruments: Vec::new(),
            arpeggios: Vec::new(),
            samples: Vec::new(),
            sample_mappings: BTreeMap::new(),
            next_id: 0,
        };
        project.create_song();
        project
    }

    fn alloc_id(&mut self) -> u32 {
        // Files written by hand may carry ids without a counter.
        let max_used = self
            .songs
            .iter()
            .map(|s| s.id.get())
            .chain(self.instruments.iter().map(|i| i.id.get()))
            .chain(self.arpeggios.iter().map(|a| a.id.get()))
            .chain(self.samples.iter().map(|s| s.id.get()))
            .max()
            .map_or(0, |m| m + 1);
        let id = self.next_id.max(max_used);
        self.next_id = id + 1;
        id
    }

    fn entity_count(&self) -> usize {
        self.songs.len() + self.instruments.len() + self.arpeggios.len() + self.samples.len()
    }

    fn unique_name(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
        (1..)
            .map(|n| format!("{} {}", prefix, n))
            .find(|name| !taken(name))
            .unwrap_or_else(|| prefix.to_string())
    }

    // --- lookups ---

    pub fn song(&self, id: SongId) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn song_mut(&mut self, id: SongId) -> Option<&mut Song> {
        self.songs.iter_mut().find(|s| s.id == id)
    }

    pub fn instrument(&self, id: InstrumentId) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id == id)
    }

    pub fn instrument_mut(&mut self, id: InstrumentId) -> Option<&mut Instrument> {
        self.instruments.iter_mut().find(|i| i.id == id)
    }

    pub fn arpeggio(&self, id: ArpeggioId) -> Option<&Arpeggio> {
        self.arpeggios.iter().find(|a| a.id == id)
    }

    pub fn arpeggio_mut(&mut self, id: ArpeggioId) -> Option<&mut Arpeggio> {
        self.arpeggios.iter_mut().find(|a| a.id == id)
    }

    pub fn sample(&self, id: SampleId) -> Option<&DpcmSample> {
        self.samples.iter().find(|s| s.id == id)
    }

    pub fn sample_mut(&mut self, id: SampleId) -> Option<&mut DpcmSample> {
        self.samples.iter_mut().find(|s| s.id == id)
    }

    pub fn first_song(&self) -> Option<SongId> {
        self.songs.first().map(|s| s.id)
    }

    pub fn first_instrument(&self) -> Option<InstrumentId> {
        self.instruments.first().map(|i| i.id)
    }

    // --- creation ---

    pub fn create_song(&mut self) -> SongId {
        let id = SongId::new(self.alloc_id());
        let name = Self::unique_name("Song", |n| self.songs.iter().any(|s| s.name == n));
        let color = Color::from_palette(self.entity_count());
        self.songs.push(Song::new(id, &name, color));
        id
    }

    pub fn create_instrument(&mut self, expansion: ExpansionType) -> InstrumentId {
        let id = InstrumentId::new(self.alloc_id());
        let prefix = if expansion == ExpansionType::None {
            "Instrument".to_string()
        } else {
            format!("{} Instrument", expansion.name())
        };
        let name = Self::unique_name(&prefix, |n| self.instruments.iter().any(|i| i.name == n));
        let color = Color::from_palette(self.entity_count());
        self.instruments
            .push(Instrument::new(id, &name, expansion, color));
        id
    }

    pub fn create_arpeggio(&mut self) -> ArpeggioId {
        let id = ArpeggioId::new(self.alloc_id());
        let name = Self::unique_name("Arpeggio", |n| self.arpeggios.iter().any(|a| a.name == n));
        let color = Color::from_palette(self.entity_count());
        self.arpeggios.push(Arpeggio::new(id, &name, color));
        id
    }

    /// Add an imported sample; the name is made unique if needed.
    pub fn add_sample(
        &mut self,
        name: &str,
        source: SampleSource,
        source_path: Option<PathBuf>,
    ) -> SampleId {
        let id = SampleId::new(self.alloc_id());
        let name = if self.samples.iter().any(|s| s.name == name) {
            Self::unique_name(name, |n| self.samples.iter().any(|s| s.name == n))
        } else {
            name.to_string()
        };
        let color = Color::from_palette(self.entity_count());
        let mut sample = DpcmSample::new(id, &name, color, source);
        sample.source_path = source_path;
        self.samples.push(sample);
        id
    }

    // --- deletion ---

    pub fn delete_song(&mut self, id: SongId) -> bool {
        let before = self.songs.len();
        self.songs.retain(|s| s.id != id);
        self.songs.len() != before
    }

    /// Delete an instrument and clear every note referencing it.
    pub fn delete_instrument(&mut self, id: InstrumentId) -> bool {
        let before = self.instruments.len();
        self.instruments.retain(|i| i.id != id);
        for song in &mut self.songs {
            song.replace_instrument(id, None);
        }
        self.instruments.len() != before
    }

    pub fn delete_arpeggio(&mut self, id: ArpeggioId) -> bool {
        let before = self.arpeggios.len();
        self.arpeggios.retain(|a| a.id != id);
        for song in &mut self.songs {
            song.replace_arpeggio(id, None);
        }
        self.arpeggios.len() != before
    }

    /// Delete a sample and every note mapping that plays it.
    pub fn delete_sample(&mut self, id: SampleId) -> bool {
        let before = self.samples.len();
        self.samples.retain(|s| s.id != id);
        self.sample_mappings.retain(|_, m| m.sample != id);
        self.samples.len() != before
    }

    // --- renaming ---

    pub fn rename_song(&mut self, id: SongId, name: &str) -> bool {
        if name.is_empty() || self.songs.iter().any(|s| s.id != id && s.name == name) {
            return false;
        }
        match self.song_mut(id) {
            Some(song) => {
                song.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn rename_instrument(&mut self, id: InstrumentId, name: &str) -> bool {
        if name.is_empty() || self.instruments.iter().any(|i| i.id != id && i.name == name) {
            return false;
        }
        match self.instrument_mut(id) {
            Some(inst) => {
                inst.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn rename_arpeggio(&mut self, id: ArpeggioId, name: &str) -> bool {
        if name.is_empty() || self.arpeggios.iter().any(|a| a.id != id && a.name == name) {
            return false;
        }
        match self.arpeggio_mut(id) {
            Some(arp) => {
                arp.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn rename_sample(&mut self, id: SampleId, name: &str) -> bool {
        if name.is_empty() || self.samples.iter().any(|s| s.id != id && s.name == name) {
            return false;
        }
        match self.sample_mut(id) {
            Some(sample) => {
                sample.name = name.to_string();
                true
            }
            None => false,
        }
    }

    // --- reordering / replacing ---

    /// Move `id` so it sits right after `previous`, or first when `previous` is `None`.
    pub fn move_song(&mut self, id: SongId, previous: Option<SongId>) -> bool {
        if previous == Some(id) {
            return false;
        }
        let Some(from) = self.songs.iter().position(|s| s.id == id) else {
            return false;
        };
        let song = self.songs.remove(from);
        let to = match previous {
            None => 0,
            Some(prev) => match self.songs.iter().position(|s| s.id == prev) {
                Some(p) => p + 1,
                None => {
                    self.songs.insert(from, song);
                    return false;
                }
            },
        };
        self.songs.insert(to, song);
        true
    }

    /// Make every note playing `dst` play `src` instead. Both must target
    /// the same chip.
    pub fn replace_instrument(&mut self, dst: InstrumentId, src: InstrumentId) -> bool {
        let (Some(d), Some(s)) = (self.instrument(dst), self.instrument(src)) else {
            return false;
        };
        if d.expansion != s.expansion {
            return false;
        }
        for song in &mut self.songs {
            song.replace_instrument(dst, Some(src));
        }
        true
    }

    pub fn replace_arpeggio(&mut self, dst: ArpeggioId, src: ArpeggioId) -> bool {
        if self.arpeggio(dst).is_none() || self.arpeggio(src).is_none() {
            return false;
        }
        for song in &mut self.songs {
            song.replace_arpeggio(dst, Some(src));
        }
        true
    }

    // --- sample mapping ---

    pub fn note_supports_dpcm(&self, note: u8) -> bool {
        (DPCM_NOTE_MIN..=DPCM_NOTE_MAX).contains(&note)
    }

    pub fn sample_mapping(&self, note: u8) -> Option<&SampleMapping> {
        self.sample_mappings.get(&note)
    }

    pub fn map_sample(&mut self, note: u8, id: SampleId) -> bool {
        if !self.note_supports_dpcm(note) || self.sample(id).is_none() {
            return false;
        }
        self.sample_mappings.insert(
            note,
            SampleMapping {
                sample: id,
                pitch: 15,
                looping: false,
            },
        );
        true
    }

    pub fn unmap_sample(&mut self, note: u8) -> Option<SampleMapping> {
        self.sample_mappings.remove(&note)
    }

    pub fn is_sample_mapped(&self, id: SampleId) -> bool {
        self.sample_mappings.values().any(|m| m.sample == id)
    }

    /// ROM footprint of all mapped samples, each counted once and aligned.
    pub fn total_mapped_sample_size(&self) -> usize {
        let mapped: BTreeSet<SampleId> = self.sample_mappings.values().map(|m| m.sample).collect();
        mapped
            .iter()
            .filter_map(|id| self.sample(*id))
            .map(|s| s.processed_size().div_ceil(SAMPLE_ALIGNMENT) * SAMPLE_ALIGNMENT)
            .sum()
    }

    // --- expansions ---

    pub fn uses_expansion(&self, expansion: ExpansionType) -> bool {
        expansion == ExpansionType::None || self.expansions.contains(&expansion)
    }

    pub fn uses_any_expansion(&self) -> bool {
        !self.expansions.is_empty()
    }

    /// Expansions whose instruments the user must pick between on "add instrument".
    pub fn instrument_expansion_choices(&self) -> Vec<ExpansionType> {
        std::iter::once(ExpansionType::None)
            .chain(
                self.expansions
                    .iter()
                    .copied()
                    .filter(|e| e.needs_own_instruments()),
            )
            .collect()
    }

    /// Apply a new expansion set. Instruments of removed chips are deleted;
    /// their ids are returned.
    pub fn set_expansions(
        &mut self,
        expansions: BTreeSet<ExpansionType>,
        n163_channels: u8,
    ) -> Vec<InstrumentId> {
        let mut expansions = expansions;
        expansions.remove(&ExpansionType::None);
        self.expansions = expansions;
        self.n163_channels = n163_channels.clamp(1, MAX_N163_CHANNELS);

        let removed: Vec<InstrumentId> = self
            .instruments
            .iter()
            .filter(|i| !self.uses_expansion(i.expansion))
            .map(|i| i.id)
            .collect();
        for id in &removed {
            self.delete_instrument(*id);
        }
        if self.uses_any_expansion() {
            self.pal_mode = false;
        }
        removed
    }

    pub fn are_songs_empty(&self) -> bool {
        self.songs.iter().all(Song::is_empty)
    }

    /// Switch tempo mode. Conversion resets FamiTracker timing to speed 1 at the default tempo.
    pub fn set_tempo_mode(&mut self, mode: TempoMode) {
        if self.tempo_mode == mode {
            return;
        }
        self.tempo_mode = mode;
        for song in &mut self.songs {
            song.famitracker_tempo = DEFAULT_FAMITRACKER_TEMPO;
            song.famitracker_speed = if mode == TempoMode::FamiTracker { 1 } else { 6 };
        }
    }
}
