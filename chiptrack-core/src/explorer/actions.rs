//! Edits the explorer makes to the project. Each one runs inside a single
//! transaction; a declined prompt changes nothing and a rejected edit is
//! rolled back.

use std::path::{Path, PathBuf};

use chiptrack_types::{
    ArpeggioId, EnvelopeType, ExpansionType, InstrumentId, Project, SampleId, SongId, TempoMode,
};

use super::events::ExplorerEvent;
use super::rows::{ParamRow, RowEntity};
use super::{ExplorerEnv, ProjectExplorer};
use crate::dialogs::{EntityKind, EntityProperties, ProjectProperties, SongProperties};
use crate::sample_io::{self, SampleIoError};
use crate::transaction::{TransactionFlags, TransactionScope};

/// Longest sample name kept from an imported file name.
const MAX_IMPORTED_NAME_LEN: usize = 16;

impl ProjectExplorer {
    pub(super) fn add_song(&mut self, env: &mut ExplorerEnv) {
        if !env.transactions.begin(
            env.project,
            TransactionScope::ProjectNoSamples,
            TransactionFlags::STOP_AUDIO,
        ) {
            return;
        }
        let id = env.project.create_song();
        env.transactions.end(env.project);
        self.selection.song = Some(id);
        self.emit(ExplorerEvent::SongSelected(id));
        self.rebuild(env.project);
    }

    pub(super) fn delete_song(&mut self, env: &mut ExplorerEnv, id: SongId) {
        let Some(name) = env.project.song(id).map(|s| s.name.clone()) else {
            return;
        };
        let message = format!("Are you sure you want to delete '{}' ?", name);
        if !env.dialogs.confirm("Delete song", &message) {
            return;
        }
        if !env.transactions.begin(
            env.project,
            TransactionScope::ProjectNoSamples,
            TransactionFlags::STOP_AUDIO,
        ) {
            return;
        }
        env.project.delete_song(id);
        env.transactions.end(env.project);

        if self.selection.song == Some(id) || self.selection.song.is_none() {
            if let Some(first) = env.project.first_song() {
                self.selection.song = Some(first);
                self.emit(ExplorerEvent::SongSelected(first));
            }
        }
        self.rebuild(env.project);
    }

    pub(super) fn add_instrument(&mut self, env: &mut ExplorerEnv) {
        let choices = env.project.instrument_expansion_choices();
        let expansion = if choices.len() > 1 {
            match env.dialogs.pick_expansion(&choices) {
                Some(e) => e,
                None => return,
            }
        } else {
            choices.first().copied().unwrap_or(ExpansionType::None)
        };
        if !env.transactions.begin(
            env.project,
            TransactionScope::ProjectNoSamples,
            TransactionFlags::NONE,
        ) {
            return;
        }
        let id = env.project.create_instrument(expansion);
        env.transactions.end(env.project);
        self.selection.instrument = Some(id);
        self.emit(ExplorerEvent::InstrumentSelected(Some(id)));
        self.rebuild(env.project);
    }

    pub(super) fn delete_instrument(&mut self, env: &mut ExplorerEnv, id: InstrumentId) {
        let Some(name) = env.project.instrument(id).map(|i| i.name.clone()) else {
            return;
        };
        let message = format!(
            "Are you sure you want to delete '{}' ? All notes using this instrument will be deleted.",
            name
        );
        if !env.dialogs.confirm("Delete instrument", &message) {
            return;
        }
        if !env.transactions.begin(
            env.project,
            TransactionScope::ProjectNoSamples,
            TransactionFlags::STOP_AUDIO,
        ) {
            return;
        }
        env.project.delete_instrument(id);
        env.transactions.end(env.project);

        if self.selection.instrument == Some(id) {
            self.selection.instrument = env.project.first_instrument();
        }
        if self.expanded_instrument == Some(id) {
            self.expanded_instrument = None;
        }
        self.emit(ExplorerEvent::InstrumentDeleted(id));
        self.rebuild(env.project);
    }

    pub(super) fn clear_envelope(&mut self, env: &mut ExplorerEnv, id: InstrumentId, kind: EnvelopeType) {
        if !env.transactions.begin(
            env.project,
            TransactionScope::Instrument(id),
            TransactionFlags::NONE,
        ) {
            return;
        }
        match env.project.instrument_mut(id) {
            Some(inst) => {
                inst.clear_envelope(kind);
                env.transactions.end(env.project);
            }
            None => env.transactions.abort(env.project),
        }
    }

    pub(super) fn add_arpeggio(&mut self, env: &mut ExplorerEnv) {
        if !env.transactions.begin(
            env.project,
            TransactionScope::ProjectNoSamples,
            TransactionFlags::NONE,
        ) {
            return;
        }
        let id = env.project.create_arpeggio();
        env.transactions.end(env.project);
        self.selection.arpeggio = Some(id);
        self.emit(ExplorerEvent::ArpeggioSelected(Some(id)));
        self.rebuild(env.project);
    }

    pub(super) fn delete_arpeggio(&mut self, env: &mut ExplorerEnv, id: ArpeggioId) {
        let Some(name) = env.project.arpeggio(id).map(|a| a.name.clone()) else {
            return;
        };
        let message = format!(
            "Are you sure you want to delete '{}' ? All notes using this arpeggio will be no longer be arpeggiated.",
            name
        );
        if !env.dialogs.confirm("Delete arpeggio", &message) {
            return;
        }
        if !env.transactions.begin(
            env.project,
            TransactionScope::ProjectNoSamples,
            TransactionFlags::STOP_AUDIO,
        ) {
            return;
        }
        env.project.delete_arpeggio(id);
        env.transactions.end(env.project);

        if self.selection.arpeggio == Some(id) {
            self.selection.arpeggio = None;
        }
        self.emit(ExplorerEvent::ArpeggioDeleted(id));
        self.rebuild(env.project);
    }

    pub(super) fn delete_sample(&mut self, env: &mut ExplorerEnv, id: SampleId) {
        let Some(name) = env.project.sample(id).map(|s| s.name.clone()) else {
            return;
        };
        let message = format!(
            "Are you sure you want to delete DPCM Sample '{}' ? It will be removed from the DPCM Instrument and every note using it will be silent.",
            name
        );
        if !env.dialogs.confirm("Delete DPCM Sample", &message) {
            return;
        }
        if !env
            .transactions
            .begin(env.project, TransactionScope::Samples, TransactionFlags::STOP_AUDIO)
        {
            return;
        }
        env.project.delete_sample(id);
        env.transactions.end(env.project);

        if self.expanded_sample == Some(id) {
            self.expanded_sample = None;
        }
        self.emit(ExplorerEvent::SampleDeleted(id));
        self.rebuild(env.project);
    }

    pub(super) fn toggle_expanded_instrument(&mut self, project: &Project, id: InstrumentId) {
        self.expanded_instrument = if self.expanded_instrument == Some(id) {
            None
        } else {
            Some(id)
        };
        self.expanded_sample = None;
        self.selection.instrument = Some(id);
        self.emit(ExplorerEvent::InstrumentSelected(Some(id)));
        self.rebuild(project);
    }

    pub(super) fn toggle_expanded_sample(&mut self, project: &Project, id: SampleId) {
        self.expanded_sample = if self.expanded_sample == Some(id) {
            None
        } else {
            Some(id)
        };
        self.expanded_instrument = None;
        self.rebuild(project);
    }

    /// One discrete parameter change as its own transaction.
    pub(super) fn edit_param(&mut self, env: &mut ExplorerEnv, param: &ParamRow, value: i32) {
        let value = param.info.snap_and_clamp(value);
        if !env
            .transactions
            .begin(env.project, param.scope(), TransactionFlags::NONE)
        {
            return;
        }
        if param.set_value(env.project, value) {
            env.transactions.end(env.project);
        } else {
            log::warn!(target: "explorer", "parameter owner {:?} is gone", param.owner);
            env.transactions.abort(env.project);
        }
    }

    /// Reload sample data from the file it was imported from.
    pub(super) fn reload_sample(&mut self, env: &mut ExplorerEnv, id: SampleId) {
        let Some(path) = env.project.sample(id).and_then(|s| s.source_path.clone()) else {
            return;
        };
        if !path.exists() {
            let error = SampleIoError::MissingSource(path);
            log::warn!(target: "sample", "reload of {} failed: {}", id, error);
            env.dialogs.warn(&error.to_string());
            return;
        }
        if !env
            .transactions
            .begin(env.project, TransactionScope::Samples, TransactionFlags::STOP_AUDIO)
        {
            return;
        }
        match sample_io::load_source(&path) {
            Ok(source) => {
                if let Some(sample) = env.project.sample_mut(id) {
                    sample.set_source(source, None);
                }
                env.transactions.end(env.project);
                log::info!(target: "sample", "reloaded {} from {}", id, path.display());
                self.emit(ExplorerEvent::SampleReloaded(id));
            }
            Err(e) => {
                env.transactions.abort(env.project);
                log::warn!(target: "sample", "reload of {} failed: {}", id, e);
                env.dialogs.warn(&format!("Error reloading '{}': {}", path.display(), e));
            }
        }
    }

    pub(super) fn export_processed_sample(&mut self, env: &mut ExplorerEnv, id: SampleId) {
        let Some(data) = env.project.sample(id).map(|s| s.processed.clone()) else {
            return;
        };
        let Some(path) = env.dialogs.save_path("Save File", "dmc") else {
            return;
        };
        if let Err(e) = sample_io::write_dmc(&path, &data) {
            report_export_error(env, &path, &e);
        }
    }

    pub(super) fn export_sample_source(&mut self, env: &mut ExplorerEnv, id: SampleId) {
        let Some(source) = env.project.sample(id).and_then(|s| s.source.clone()) else {
            return;
        };
        let Some(path) = env
            .dialogs
            .save_path("Save File", sample_io::source_extension(&source))
        else {
            return;
        };
        if let Err(e) = sample_io::write_source(&path, &source) {
            report_export_error(env, &path, &e);
        }
    }

    /// Add samples from files, typically after an `ImportRequested(Samples)`.
    /// Files that fail to load are reported and skipped.
    pub fn import_samples(&mut self, env: &mut ExplorerEnv, paths: &[PathBuf]) -> Vec<SampleId> {
        if paths.is_empty()
            || !env
                .transactions
                .begin(env.project, TransactionScope::Samples, TransactionFlags::STOP_AUDIO)
        {
            return Vec::new();
        }

        let mut added = Vec::new();
        for path in paths {
            match sample_io::load_source(path) {
                Ok(source) => {
                    let name = imported_name(path);
                    added.push(env.project.add_sample(&name, source, Some(path.clone())));
                }
                Err(e) => {
                    log::warn!(target: "sample", "import of {} failed: {}", path.display(), e);
                    env.dialogs.warn(&format!("Error loading '{}': {}", path.display(), e));
                }
            }
        }

        if added.is_empty() {
            env.transactions.abort(env.project);
        } else {
            env.transactions.end(env.project);
            self.rebuild(env.project);
        }
        added
    }

    pub(super) fn edit_project_properties(&mut self, env: &mut ExplorerEnv) {
        let current = ProjectProperties::from_project(env.project);
        let Some(edited) = env.dialogs.edit_project(&current) else {
            return;
        };

        let expansions_changed = edited.expansions != current.expansions;
        let channels_changed = edited.n163_channels != current.n163_channels;
        let tempo_changed = edited.tempo_mode != current.tempo_mode;
        let pal_changed = edited.pal_mode != current.pal_mode;

        let flags = if expansions_changed || channels_changed || pal_changed {
            TransactionFlags::REINITIALIZE_AUDIO
        } else if tempo_changed {
            TransactionFlags::STOP_AUDIO
        } else {
            TransactionFlags::NONE
        };

        let removes_expansion = current
            .expansions
            .iter()
            .any(|e| !edited.expansions.contains(e));
        if (expansions_changed || channels_changed)
            && removes_expansion
            && !env.dialogs.confirm(
                "Change expansion audio",
                "Remove an expansion will delete all instruments and channels using it, continue?",
            )
        {
            return;
        }

        if !env
            .transactions
            .begin(env.project, TransactionScope::ProjectNoSamples, flags)
        {
            return;
        }

        env.project.name = edited.name;
        env.project.author = edited.author;
        env.project.copyright = edited.copyright;

        if expansions_changed || channels_changed {
            let removed = env
                .project
                .set_expansions(edited.expansions, edited.n163_channels);
            if !removed.is_empty() {
                log::info!(target: "explorer", "removed {} instruments with their expansion", removed.len());
            }
        }
        if tempo_changed {
            env.project.set_tempo_mode(edited.tempo_mode);
        }
        // PAL is only available to plain 2A03 projects in FamiStudio tempo.
        if pal_changed
            && env.project.tempo_mode == TempoMode::FamiStudio
            && !env.project.uses_any_expansion()
        {
            env.project.pal_mode = edited.pal_mode;
        }

        env.transactions.end(env.project);

        if expansions_changed || channels_changed {
            self.capture = None;
            self.reset(env.project);
        } else {
            self.rebuild(env.project);
        }
        self.emit(ExplorerEvent::ProjectModified);
    }

    pub(super) fn edit_song_properties(&mut self, env: &mut ExplorerEnv, id: SongId) {
        let Some(current) = env.project.song(id).map(SongProperties::from_song) else {
            return;
        };
        let Some(edited) = env.dialogs.edit_song(&current) else {
            return;
        };
        if !env.transactions.begin(
            env.project,
            TransactionScope::ProjectNoSamples,
            TransactionFlags::STOP_AUDIO,
        ) {
            return;
        }
        if !env.project.rename_song(id, &edited.name) {
            env.transactions.abort(env.project);
            log::info!(target: "explorer", "song rename to '{}' rejected", edited.name);
            env.dialogs.beep();
            return;
        }
        if let Some(song) = env.project.song_mut(id) {
            song.color = edited.color;
            song.set_length(edited.length);
            song.famitracker_tempo = edited.famitracker_tempo;
            song.famitracker_speed = edited.famitracker_speed.max(1);
            song.beat_length = edited.beat_length.max(1);
            song.pattern_length = edited.pattern_length.max(1);
        }
        env.transactions.end(env.project);
        self.emit(ExplorerEvent::SongModified(id));
        self.rebuild(env.project);
    }

    pub(super) fn edit_entity_properties(&mut self, env: &mut ExplorerEnv, entity: RowEntity) {
        let (kind, scope, current) = match entity {
            RowEntity::Instrument(id) => match env.project.instrument(id) {
                Some(i) => (
                    EntityKind::Instrument,
                    TransactionScope::ProjectNoSamples,
                    EntityProperties {
                        name: i.name.clone(),
                        color: i.color,
                    },
                ),
                None => return,
            },
            RowEntity::Arpeggio(id) => match env.project.arpeggio(id) {
                Some(a) => (
                    EntityKind::Arpeggio,
                    TransactionScope::ProjectNoSamples,
                    EntityProperties {
                        name: a.name.clone(),
                        color: a.color,
                    },
                ),
                None => return,
            },
            RowEntity::Sample(id) => match env.project.sample(id) {
                Some(s) => (
                    EntityKind::Sample,
                    TransactionScope::Sample(id),
                    EntityProperties {
                        name: s.name.clone(),
                        color: s.color,
                    },
                ),
                None => return,
            },
            RowEntity::None | RowEntity::Song(_) => return,
        };

        let Some(edited) = env.dialogs.edit_entity(kind, &current) else {
            return;
        };
        if !env
            .transactions
            .begin(env.project, scope, TransactionFlags::NONE)
        {
            return;
        }

        let (renamed, event) = match entity {
            RowEntity::Instrument(id) => (
                env.project.rename_instrument(id, &edited.name),
                ExplorerEvent::InstrumentColorChanged(id),
            ),
            RowEntity::Arpeggio(id) => (
                env.project.rename_arpeggio(id, &edited.name),
                ExplorerEvent::ArpeggioColorChanged(id),
            ),
            RowEntity::Sample(id) => (
                env.project.rename_sample(id, &edited.name),
                ExplorerEvent::SampleColorChanged(id),
            ),
            RowEntity::None | RowEntity::Song(_) => return,
        };
        if !renamed {
            env.transactions.abort(env.project);
            log::info!(target: "explorer", "rename to '{}' rejected", edited.name);
            env.dialogs.beep();
            return;
        }

        match entity {
            RowEntity::Instrument(id) => {
                if let Some(i) = env.project.instrument_mut(id) {
                    i.color = edited.color;
                }
            }
            RowEntity::Arpeggio(id) => {
                if let Some(a) = env.project.arpeggio_mut(id) {
                    a.color = edited.color;
                }
            }
            RowEntity::Sample(id) => {
                if let Some(s) = env.project.sample_mut(id) {
                    s.color = edited.color;
                }
            }
            RowEntity::None | RowEntity::Song(_) => {}
        }
        env.transactions.end(env.project);
        self.emit(event);
        self.rebuild(env.project);
    }
}

fn report_export_error(env: &mut ExplorerEnv, path: &Path, error: &SampleIoError) {
    log::warn!(target: "sample", "export to {} failed: {}", path.display(), error);
    env.dialogs
        .warn(&format!("Error saving '{}': {}", path.display(), error));
}

fn imported_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sample");
    stem.chars().take(MAX_IMPORTED_NAME_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imported_name_is_trimmed() {
        assert_eq!(imported_name(Path::new("/a/kick.dmc")), "kick");
        assert_eq!(
            imported_name(Path::new("a_really_long_sample_name.wav")),
            "a_really_long_sa"
        );
    }
}
