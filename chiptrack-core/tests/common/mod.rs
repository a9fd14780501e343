#![allow(dead_code)]
//! Test harness for explorer scenario tests: scripted dialogs, a fixed
//! sample-mapping drop target and a transaction manager that counts calls.

use std::path::PathBuf;

use chiptrack_core::dialogs::{
    Dialogs, DropTargets, EntityKind, EntityProperties, ProjectProperties, SongProperties,
};
use chiptrack_core::explorer::{
    ExplorerEnv, ExplorerEvent, ExplorerSettings, Point, PointerEvent, ProjectExplorer,
};
use chiptrack_core::transaction::{
    TransactionFlags, TransactionScope, Transactions, UndoRedoManager,
};
use chiptrack_types::{ExpansionType, Project};

pub const WIDTH: i32 = 240;
pub const HEIGHT: i32 = 600;
pub const ROW: i32 = 21;

/// Dialogs that answer from preset values and record what was asked.
pub struct ScriptedDialogs {
    pub answer: bool,
    pub confirms: Vec<String>,
    pub warnings: Vec<String>,
    pub beeps: usize,
    pub expansion: Option<ExpansionType>,
    pub project_edit: Option<ProjectProperties>,
    pub song_edit: Option<SongProperties>,
    pub entity_edit: Option<EntityProperties>,
    pub save_to: Option<PathBuf>,
}

impl Default for ScriptedDialogs {
    fn default() -> Self {
        Self {
            answer: true,
            confirms: Vec::new(),
            warnings: Vec::new(),
            beeps: 0,
            expansion: None,
            project_edit: None,
            song_edit: None,
            entity_edit: None,
            save_to: None,
        }
    }
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&mut self, title: &str, _message: &str) -> bool {
        self.confirms.push(title.to_string());
        self.answer
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn beep(&mut self) {
        self.beeps += 1;
    }

    fn pick_expansion(&mut self, _choices: &[ExpansionType]) -> Option<ExpansionType> {
        self.expansion
    }

    fn edit_project(&mut self, _current: &ProjectProperties) -> Option<ProjectProperties> {
        self.project_edit.take()
    }

    fn edit_song(&mut self, _current: &SongProperties) -> Option<SongProperties> {
        self.song_edit.take()
    }

    fn edit_entity(
        &mut self,
        _kind: EntityKind,
        _current: &EntityProperties,
    ) -> Option<EntityProperties> {
        self.entity_edit.take()
    }

    fn save_path(&mut self, _title: &str, _extension: &str) -> Option<PathBuf> {
        self.save_to.clone()
    }
}

/// Sample mapping strip that reports the same note everywhere.
#[derive(Default)]
pub struct MappingStrip {
    pub note: Option<u8>,
}

impl DropTargets for MappingStrip {
    fn sample_mapping_note_at(&self, _pos: Point) -> Option<u8> {
        self.note
    }
}

#[derive(Default)]
pub struct CountingTransactions {
    pub inner: UndoRedoManager,
    pub begins: usize,
    pub ends: usize,
    pub aborts: usize,
    pub scopes: Vec<TransactionScope>,
}

impl Transactions for CountingTransactions {
    fn begin(&mut self, project: &Project, scope: TransactionScope, flags: TransactionFlags) -> bool {
        let ok = self.inner.begin(project, scope, flags);
        if ok {
            self.begins += 1;
            self.scopes.push(scope);
        }
        ok
    }

    fn end(&mut self, project: &Project) {
        self.ends += 1;
        self.inner.end(project);
    }

    fn abort(&mut self, project: &mut Project) {
        self.aborts += 1;
        self.inner.abort(project);
    }

    fn in_progress(&self) -> bool {
        self.inner.in_progress()
    }
}

pub struct Harness {
    pub project: Project,
    pub explorer: ProjectExplorer,
    pub transactions: CountingTransactions,
    pub dialogs: ScriptedDialogs,
    pub strip: MappingStrip,
}

impl Harness {
    pub fn new(project: Project) -> Self {
        Self::with_size(project, WIDTH, HEIGHT)
    }

    pub fn with_size(project: Project, width: i32, height: i32) -> Self {
        let explorer = ProjectExplorer::new(ExplorerSettings::default(), width, height, &project);
        Self {
            project,
            explorer,
            transactions: CountingTransactions::default(),
            dialogs: ScriptedDialogs::default(),
            strip: MappingStrip::default(),
        }
    }

    fn with_env<R>(&mut self, f: impl FnOnce(&mut ProjectExplorer, &mut ExplorerEnv) -> R) -> R {
        let Harness {
            project,
            explorer,
            transactions,
            dialogs,
            strip,
        } = self;
        let mut env = ExplorerEnv {
            project,
            transactions,
            dialogs,
            drop_targets: &*strip,
        };
        f(explorer, &mut env)
    }

    pub fn down(&mut self, ev: PointerEvent) {
        self.with_env(|explorer, env| explorer.pointer_down(env, ev));
    }

    pub fn move_to(&mut self, ev: PointerEvent) {
        self.with_env(|explorer, env| explorer.pointer_move(env, ev));
    }

    pub fn up(&mut self, ev: PointerEvent) {
        self.with_env(|explorer, env| explorer.pointer_up(env, ev));
    }

    pub fn double_click(&mut self, x: i32, y: i32) {
        self.with_env(|explorer, env| explorer.double_click(env, PointerEvent::left(x, y)));
    }

    /// Press, move and release the left button.
    pub fn drag(&mut self, from: (i32, i32), to: (i32, i32)) {
        self.down(PointerEvent::left(from.0, from.1));
        self.move_to(PointerEvent::left(to.0, to.1));
        self.up(PointerEvent::left(to.0, to.1));
    }

    pub fn click(&mut self, x: i32, y: i32) {
        self.down(PointerEvent::left(x, y));
        self.up(PointerEvent::left(x, y));
    }

    pub fn right_click(&mut self, x: i32, y: i32) {
        self.down(PointerEvent::right(x, y));
        self.up(PointerEvent::right(x, y));
    }

    pub fn import_samples(&mut self, paths: &[PathBuf]) {
        self.with_env(|explorer, env| {
            explorer.import_samples(env, paths);
        });
    }

    pub fn events(&mut self) -> Vec<ExplorerEvent> {
        self.explorer.take_events()
    }

    /// Widget-local y of a point inside row `index`, `dy` pixels from its top.
    pub fn row_y(&self, index: usize, dy: i32) -> i32 {
        index as i32 * ROW + dy - self.explorer.scroll_offset()
    }

    /// Centre of sub-button `slot` on row `index`.
    pub fn sub_button(&self, index: usize, slot: usize) -> (i32, i32) {
        let g = self.explorer.geometry();
        (
            g.sub_button_x(slot) + g.sub_button_size / 2,
            self.row_y(index, g.sub_button_pos_y + g.sub_button_size / 2),
        )
    }

    pub fn song_names(&self) -> Vec<&str> {
        self.project.songs.iter().map(|s| s.name.as_str()).collect()
    }
}
