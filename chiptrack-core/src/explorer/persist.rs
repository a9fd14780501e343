//! Panel state saved alongside the project: selection, expansion, scroll.

use serde::{Deserialize, Serialize};

use chiptrack_types::{ArpeggioId, InstrumentId, Project, SampleId, SongId};

use super::ProjectExplorer;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerState {
    #[serde(default)]
    pub selected_song: Option<SongId>,
    #[serde(default)]
    pub selected_instrument: Option<InstrumentId>,
    #[serde(default)]
    pub selected_arpeggio: Option<ArpeggioId>,
    #[serde(default)]
    pub expanded_instrument: Option<InstrumentId>,
    #[serde(default)]
    pub expanded_sample: Option<SampleId>,
    #[serde(default)]
    pub scroll_y: i32,
}

#[derive(Debug)]
pub enum StateError {
    Json(serde_json::Error),
}

impl From<serde_json::Error> for StateError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for StateError {}

impl ProjectExplorer {
    pub fn state(&self) -> ExplorerState {
        ExplorerState {
            selected_song: self.selection.song,
            selected_instrument: self.selection.instrument,
            selected_arpeggio: self.selection.arpeggio,
            expanded_instrument: self.expanded_instrument,
            expanded_sample: self.expanded_sample,
            scroll_y: self.scroll.offset(),
        }
    }

    pub fn save_state(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(&self.state())?)
    }

    /// Restore saved state. Ids the project no longer has are dropped and
    /// the scroll offset is clamped to the rebuilt content.
    pub fn load_state(&mut self, json: &str, project: &Project) -> Result<(), StateError> {
        let state: ExplorerState = serde_json::from_str(json)?;
        self.apply_state(&state, project);
        Ok(())
    }

    pub fn apply_state(&mut self, state: &ExplorerState, project: &Project) {
        if let Some(capture) = self.capture.take() {
            log::warn!(target: "explorer", "state loaded during {:?}, capture dropped", capture.op);
        }
        self.selection.song = state.selected_song;
        self.selection.instrument = state.selected_instrument;
        self.selection.arpeggio = state.selected_arpeggio;
        self.expanded_instrument = state.expanded_instrument;
        self.expanded_sample = state.expanded_sample;
        self.rebuild(project);
        self.scroll.scroll_to(state.scroll_y);
        log::debug!(target: "explorer", "state restored, {} rows", self.rows.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::ExplorerSettings;
    use chiptrack_types::ExpansionType;

    #[test]
    fn round_trip() {
        let mut project = Project::new();
        for _ in 0..20 {
            project.create_song();
        }
        let fds = project.create_instrument(ExpansionType::Fds);
        let arp = project.create_arpeggio();

        let mut explorer = ProjectExplorer::new(ExplorerSettings::default(), 200, 120, &project);
        explorer.select_arpeggio(Some(arp));
        explorer.toggle_expanded_instrument(&project, fds);
        explorer.scroll_to(63);
        let json = explorer.save_state().unwrap();

        let mut restored = ProjectExplorer::new(ExplorerSettings::default(), 200, 120, &project);
        restored.load_state(&json, &project).unwrap();
        assert_eq!(restored.state(), explorer.state());
        assert_eq!(restored.rows().len(), explorer.rows().len());
    }

    #[test]
    fn stale_ids_are_dropped_and_scroll_clamped() {
        let project = Project::new();
        let mut explorer = ProjectExplorer::new(ExplorerSettings::default(), 200, 400, &project);
        let json = r#"{"selected_song":99,"selected_instrument":7,"selected_arpeggio":8,"expanded_sample":3,"scroll_y":5000}"#;
        explorer.load_state(json, &project).unwrap();

        assert_eq!(explorer.selected_song(), project.first_song());
        assert_eq!(explorer.selected_instrument(), None);
        assert_eq!(explorer.selected_arpeggio(), None);
        assert_eq!(explorer.expanded_sample(), None);
        assert_eq!(explorer.scroll_offset(), 0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let project = Project::new();
        let mut explorer = ProjectExplorer::new(ExplorerSettings::default(), 200, 400, &project);
        let err = explorer.load_state("{not json", &project).unwrap_err();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
