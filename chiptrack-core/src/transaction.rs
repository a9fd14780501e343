//! Scoped undo/redo transactions.
//!
//! A transaction snapshots only the part of the project its scope names on
//! `begin`, and pushes that snapshot onto the undo stack on `end`. `abort`
//! restores the snapshot, so a rejected multi-step edit leaves no trace.

use std::collections::{BTreeMap, VecDeque};

use chiptrack_types::{
    Arpeggio, ArpeggioId, DpcmSample, Instrument, InstrumentId, Project, SampleId, SampleMapping,
};

/// What part of the project an edit may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionScope {
    /// Everything.
    Project,
    /// Everything except DPCM sample data.
    ProjectNoSamples,
    Instrument(InstrumentId),
    Arpeggio(ArpeggioId),
    Sample(SampleId),
    /// All samples and their note mappings.
    Samples,
    /// Note mappings only.
    SamplesMapping,
}

/// What the audio side must do once the transaction lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFlags {
    pub stop_audio: bool,
    pub reinitialize_audio: bool,
}

impl TransactionFlags {
    pub const NONE: Self = Self {
        stop_audio: false,
        reinitialize_audio: false,
    };
    pub const STOP_AUDIO: Self = Self {
        stop_audio: true,
        reinitialize_audio: false,
    };
    pub const REINITIALIZE_AUDIO: Self = Self {
        stop_audio: false,
        reinitialize_audio: true,
    };

    pub fn is_empty(self) -> bool {
        !self.stop_audio && !self.reinitialize_audio
    }

    fn merge(&mut self, other: Self) {
        self.stop_audio |= other.stop_audio;
        self.reinitialize_audio |= other.reinitialize_audio;
    }
}

/// Transaction collaborator the explorer records its edits through.
pub trait Transactions {
    /// Start recording. Returns false if a transaction is already open.
    fn begin(&mut self, project: &Project, scope: TransactionScope, flags: TransactionFlags)
        -> bool;
    /// Commit the open transaction.
    fn end(&mut self, project: &Project);
    /// Roll the project back to the state captured by `begin`.
    fn abort(&mut self, project: &mut Project);
    fn in_progress(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
enum Snapshot {
    Project(Box<Project>),
    ProjectNoSamples(Box<Project>),
    Instrument {
        id: InstrumentId,
        instrument: Box<Instrument>,
    },
    Arpeggio {
        id: ArpeggioId,
        arpeggio: Box<Arpeggio>,
    },
    Sample {
        id: SampleId,
        sample: Box<DpcmSample>,
    },
    Samples {
        samples: Vec<DpcmSample>,
        mappings: BTreeMap<u8, SampleMapping>,
    },
    SamplesMapping(BTreeMap<u8, SampleMapping>),
}

impl Snapshot {
    fn capture(scope: TransactionScope, project: &Project) -> Self {
        match scope {
            TransactionScope::Project => Snapshot::Project(Box::new(project.clone())),
            TransactionScope::ProjectNoSamples => {
                let mut copy = project.clone();
                copy.samples.clear();
                Snapshot::ProjectNoSamples(Box::new(copy))
            }
            TransactionScope::Instrument(id) => match project.instrument(id) {
                Some(inst) => Snapshot::Instrument {
                    id,
                    instrument: Box::new(inst.clone()),
                },
                // Instrument gone, snapshot wider
                None => Self::capture(TransactionScope::ProjectNoSamples, project),
            },
            TransactionScope::Arpeggio(id) => match project.arpeggio(id) {
                Some(arp) => Snapshot::Arpeggio {
                    id,
                    arpeggio: Box::new(arp.clone()),
                },
                None => Self::capture(TransactionScope::ProjectNoSamples, project),
            },
            TransactionScope::Sample(id) => match project.sample(id) {
                Some(sample) => Snapshot::Sample {
                    id,
                    sample: Box::new(sample.clone()),
                },
                None => Self::capture(TransactionScope::Samples, project),
            },
            TransactionScope::Samples => Snapshot::Samples {
                samples: project.samples.clone(),
                mappings: project.sample_mappings.clone(),
            },
            TransactionScope::SamplesMapping => {
                Snapshot::SamplesMapping(project.sample_mappings.clone())
            }
        }
    }

    /// Snapshot of the same scope taken from the current project.
    fn inverse(&self, project: &Project) -> Self {
        match self {
            Snapshot::Project(_) => Self::capture(TransactionScope::Project, project),
            Snapshot::ProjectNoSamples(_) => {
                Self::capture(TransactionScope::ProjectNoSamples, project)
            }
            Snapshot::Instrument { id, .. } => {
                Self::capture(TransactionScope::Instrument(*id), project)
            }
            Snapshot::Arpeggio { id, .. } => Self::capture(TransactionScope::Arpeggio(*id), project),
            Snapshot::Sample { id, .. } => Self::capture(TransactionScope::Sample(*id), project),
            Snapshot::Samples { .. } => Self::capture(TransactionScope::Samples, project),
            Snapshot::SamplesMapping(_) => Self::capture(TransactionScope::SamplesMapping, project),
        }
    }

    fn apply(self, project: &mut Project) {
        match self {
            Snapshot::Project(p) => *project = *p,
            Snapshot::ProjectNoSamples(p) => {
                let samples = std::mem::take(&mut project.samples);
                *project = *p;
                project.samples = samples;
            }
            Snapshot::Instrument { id, instrument } => {
                if let Some(slot) = project.instrument_mut(id) {
                    *slot = *instrument;
                }
            }
            Snapshot::Arpeggio { id, arpeggio } => {
                if let Some(slot) = project.arpeggio_mut(id) {
                    *slot = *arpeggio;
                }
            }
            Snapshot::Sample { id, sample } => {
                if let Some(slot) = project.sample_mut(id) {
                    *slot = *sample;
                }
            }
            Snapshot::Samples { samples, mappings } => {
                project.samples = samples;
                project.sample_mappings = mappings;
            }
            Snapshot::SamplesMapping(mappings) => project.sample_mappings = mappings,
        }
    }
}

struct UndoEntry {
    scope: TransactionScope,
    flags: TransactionFlags,
    snapshot: Snapshot,
}

/// Snapshot-based undo/redo history.
pub struct UndoRedoManager {
    undo_stack: VecDeque<UndoEntry>,
    redo_stack: VecDeque<UndoEntry>,
    max_depth: usize,
    pending: Option<UndoEntry>,
    audio_request: TransactionFlags,
}

impl UndoRedoManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
            pending: None,
            audio_request: TransactionFlags::NONE,
        }
    }

    /// Undo the last committed transaction. Returns its scope, or `None` if
    /// there is nothing to undo or a transaction is open.
    pub fn undo(&mut self, project: &mut Project) -> Option<TransactionScope> {
        if self.pending.is_some() {
            log::warn!(target: "transaction", "undo requested while a transaction is open");
            return None;
        }
        let entry = self.undo_stack.pop_back()?;
        let inverse = entry.snapshot.inverse(project);
        let scope = entry.scope;
        self.audio_request.merge(entry.flags);
        entry.snapshot.apply(project);
        self.redo_stack.push_back(UndoEntry {
            scope,
            flags: entry.flags,
            snapshot: inverse,
        });
        log::debug!(target: "transaction", "undo {:?}", scope);
        Some(scope)
    }

    pub fn redo(&mut self, project: &mut Project) -> Option<TransactionScope> {
        if self.pending.is_some() {
            log::warn!(target: "transaction", "redo requested while a transaction is open");
            return None;
        }
        let entry = self.redo_stack.pop_back()?;
        let inverse = entry.snapshot.inverse(project);
        let scope = entry.scope;
        self.audio_request.merge(entry.flags);
        entry.snapshot.apply(project);
        self.undo_stack.push_back(UndoEntry {
            scope,
            flags: entry.flags,
            snapshot: inverse,
        });
        log::debug!(target: "transaction", "redo {:?}", scope);
        Some(scope)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Audio work requested by transactions since the last call.
    pub fn take_audio_request(&mut self) -> TransactionFlags {
        std::mem::take(&mut self.audio_request)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending = None;
    }
}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Transactions for UndoRedoManager {
    fn begin(
        &mut self,
        project: &Project,
        scope: TransactionScope,
        flags: TransactionFlags,
    ) -> bool {
        if let Some(open) = &self.pending {
            debug_assert!(false, "nested transaction {:?} inside {:?}", scope, open.scope);
            log::warn!(target: "transaction", "refusing nested {:?} inside {:?}", scope, open.scope);
            return false;
        }
        self.pending = Some(UndoEntry {
            scope,
            flags,
            snapshot: Snapshot::capture(scope, project),
        });
        log::debug!(target: "transaction", "begin {:?}", scope);
        true
    }

    fn end(&mut self, project: &Project) {
        let Some(entry) = self.pending.take() else {
            log::warn!(target: "transaction", "end without an open transaction");
            return;
        };
        self.audio_request.merge(entry.flags);

        if entry.snapshot.inverse(project) == entry.snapshot {
            log::debug!(target: "transaction", "end {:?} (no change)", entry.scope);
            return;
        }

        log::debug!(target: "transaction", "end {:?}", entry.scope);
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(entry);
        self.redo_stack.clear();
    }

    fn abort(&mut self, project: &mut Project) {
        let Some(entry) = self.pending.take() else {
            log::warn!(target: "transaction", "abort without an open transaction");
            return;
        };
        log::debug!(target: "transaction", "abort {:?}", entry.scope);
        entry.snapshot.apply(project);
    }

    fn in_progress(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chiptrack_types::{ExpansionType, SampleSource};

    #[test]
    fn end_then_undo_restores() {
        let mut project = Project::new();
        let mut undo = UndoRedoManager::default();

        assert!(undo.begin(&project, TransactionScope::ProjectNoSamples, TransactionFlags::NONE));
        project.create_song();
        undo.end(&project);
        assert_eq!(project.songs.len(), 2);

        assert_eq!(undo.undo(&mut project), Some(TransactionScope::ProjectNoSamples));
        assert_eq!(project.songs.len(), 1);
        assert_eq!(undo.redo(&mut project), Some(TransactionScope::ProjectNoSamples));
        assert_eq!(project.songs.len(), 2);
    }

    #[test]
    fn abort_rolls_back() {
        let mut project = Project::new();
        let id = project.songs[0].id;
        let mut undo = UndoRedoManager::default();

        undo.begin(&project, TransactionScope::ProjectNoSamples, TransactionFlags::NONE);
        project.rename_song(id, "Changed");
        undo.abort(&mut project);

        assert_eq!(project.songs[0].name, "Song 1");
        assert!(!undo.in_progress());
        assert!(!undo.can_undo());
    }

    #[test]
    fn unchanged_transaction_is_dropped() {
        let project = Project::new();
        let mut undo = UndoRedoManager::default();
        undo.begin(&project, TransactionScope::Project, TransactionFlags::NONE);
        undo.end(&project);
        assert!(!undo.can_undo());
    }

    #[test]
    fn project_no_samples_keeps_sample_edits() {
        let mut project = Project::new();
        let sample = project.add_sample("Kick", SampleSource::Dmc(vec![1, 2]), None);
        let mut undo = UndoRedoManager::default();

        undo.begin(&project, TransactionScope::ProjectNoSamples, TransactionFlags::NONE);
        project.create_instrument(ExpansionType::None);
        project.rename_sample(sample, "Snare");
        undo.abort(&mut project);

        assert!(project.instruments.is_empty());
        assert_eq!(project.sample(sample).unwrap().name, "Snare");
    }

    #[test]
    fn instrument_scope_only_touches_that_instrument() {
        let mut project = Project::new();
        let a = project.create_instrument(ExpansionType::None);
        let mut undo = UndoRedoManager::default();

        undo.begin(&project, TransactionScope::Instrument(a), TransactionFlags::NONE);
        project.instrument_mut(a).unwrap().name = "Bass".into();
        undo.end(&project);
        project.create_song();

        undo.undo(&mut project);
        assert_eq!(project.instrument(a).unwrap().name, "Instrument 1");
        assert_eq!(project.songs.len(), 2);
    }

    #[test]
    fn audio_request_is_drained() {
        let mut project = Project::new();
        let mut undo = UndoRedoManager::default();
        undo.begin(&project, TransactionScope::ProjectNoSamples, TransactionFlags::STOP_AUDIO);
        project.create_song();
        undo.end(&project);

        assert!(undo.take_audio_request().stop_audio);
        assert!(undo.take_audio_request().is_empty());
    }

    #[test]
    fn max_depth_drops_oldest() {
        let mut project = Project::new();
        let mut undo = UndoRedoManager::new(2);
        for _ in 0..3 {
            undo.begin(&project, TransactionScope::ProjectNoSamples, TransactionFlags::NONE);
            project.create_song();
            undo.end(&project);
        }
        assert_eq!(undo.undo_depth(), 2);
    }
}
