//! Stand-ins for the windowed application around the explorer: prompts
//! answered from the script, a keyboard strip that accepts sample drops and
//! a canvas that keeps only the text it is asked to draw.

use std::collections::VecDeque;
use std::path::PathBuf;

use chiptrack_core::dialogs::{
    Dialogs, DropTargets, EntityKind, EntityProperties, ProjectProperties, SongProperties,
};
use chiptrack_core::explorer::{Canvas, FontWeight, Icon, Point};
use chiptrack_types::{Color, ExpansionType, DPCM_NOTE_MAX, DPCM_NOTE_MIN};

pub struct ScriptDialogs {
    assume_yes: bool,
    next_answer: Option<bool>,
    names: VecDeque<String>,
    save_paths: VecDeque<PathBuf>,
}

impl ScriptDialogs {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            next_answer: None,
            names: VecDeque::new(),
            save_paths: VecDeque::new(),
        }
    }

    pub fn queue_answer(&mut self, yes: bool) {
        self.next_answer = Some(yes);
    }

    pub fn queue_name(&mut self, name: String) {
        self.names.push_back(name);
    }

    pub fn queue_save_path(&mut self, path: PathBuf) {
        self.save_paths.push_back(path);
    }
}

impl Dialogs for ScriptDialogs {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        let yes = self.next_answer.take().unwrap_or(self.assume_yes);
        println!("? {}: {} -> {}", title, message, if yes { "yes" } else { "no" });
        yes
    }

    fn warn(&mut self, message: &str) {
        println!("! {}", message);
    }

    fn beep(&mut self) {
        println!("! (beep)");
    }

    /// Picks the first expansion chip on offer.
    fn pick_expansion(&mut self, choices: &[ExpansionType]) -> Option<ExpansionType> {
        let pick = choices
            .iter()
            .copied()
            .find(|e| *e != ExpansionType::None)
            .or_else(|| choices.first().copied());
        if let Some(e) = pick {
            println!("? expansion -> {}", e.name());
        }
        pick
    }

    fn edit_project(&mut self, current: &ProjectProperties) -> Option<ProjectProperties> {
        let name = self.names.pop_front()?;
        Some(ProjectProperties {
            name,
            ..current.clone()
        })
    }

    fn edit_song(&mut self, current: &SongProperties) -> Option<SongProperties> {
        let name = self.names.pop_front()?;
        Some(SongProperties {
            name,
            ..current.clone()
        })
    }

    fn edit_entity(
        &mut self,
        kind: EntityKind,
        current: &EntityProperties,
    ) -> Option<EntityProperties> {
        let name = self.names.pop_front()?;
        log::debug!("{} -> '{}'", kind.title(), name);
        Some(EntityProperties {
            name,
            color: current.color,
        })
    }

    fn save_path(&mut self, title: &str, extension: &str) -> Option<PathBuf> {
        let path = self.save_paths.pop_front();
        if path.is_none() {
            println!("? {} (*.{}) -> cancelled", title, extension);
        }
        path
    }
}

/// Piano strip laid out under the explorer, one key per DPCM note.
pub struct KeyboardStrip {
    pub top: i32,
    pub height: i32,
    pub key_width: i32,
}

impl DropTargets for KeyboardStrip {
    fn sample_mapping_note_at(&self, pos: Point) -> Option<u8> {
        if pos.y < self.top || pos.y >= self.top + self.height || pos.x < 0 {
            return None;
        }
        let note = i32::from(DPCM_NOTE_MIN) + pos.x / self.key_width.max(1);
        u8::try_from(note)
            .ok()
            .filter(|n| *n <= DPCM_NOTE_MAX)
    }
}

/// Collects drawn text by screen line; shapes and icons are dropped.
#[derive(Default)]
pub struct TextCanvas {
    origin: Vec<(i32, i32)>,
    items: Vec<(i32, i32, String)>,
}

impl TextCanvas {
    fn offset(&self) -> (i32, i32) {
        self.origin.last().copied().unwrap_or((0, 0))
    }

    /// Text items grouped by y, left to right.
    pub fn lines(&self) -> Vec<String> {
        let mut items = self.items.clone();
        items.sort_by_key(|(x, y, _)| (*y, *x));
        let mut lines: Vec<(i32, String)> = Vec::new();
        for (_, y, text) in items {
            match lines.last_mut() {
                Some((line_y, line)) if *line_y == y => {
                    line.push_str("  ");
                    line.push_str(&text);
                }
                _ => lines.push((y, text)),
            }
        }
        lines.into_iter().map(|(_, line)| line).collect()
    }
}

impl Canvas for TextCanvas {
    fn fill_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, _color: Color) {}

    fn draw_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, _color: Color) {}

    fn draw_line(&mut self, _x0: i32, _y0: i32, _x1: i32, _y1: i32, _color: Color, _thickness: i32) {}

    fn draw_text(&mut self, text: &str, _font: FontWeight, x: i32, y: i32, _color: Color, _clip: i32) {
        let (dx, dy) = self.offset();
        self.items.push((x + dx, y + dy, text.to_string()));
    }

    fn draw_icon(&mut self, _icon: Icon, _x: i32, _y: i32, _opacity: f32) {}

    fn push_translation(&mut self, dx: i32, dy: i32) {
        let (x, y) = self.offset();
        self.origin.push((x + dx, y + dy));
    }

    fn pop_transform(&mut self) {
        self.origin.pop();
    }
}
