//! Scripted pointer sessions for the headless host.
//!
//! One JSON object per line, tagged by `op`:
//!
//! ```text
//! {"op":"down","x":50,"y":68}
//! {"op":"move","x":50,"y":44,"button":"left"}
//! {"op":"up","x":50,"y":44}
//! {"op":"render"}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use chiptrack_core::explorer::{Modifiers, PointerButton, PointerEvent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    #[default]
    Left,
    Right,
    Middle,
}

impl From<Button> for PointerButton {
    fn from(b: Button) -> Self {
        match b {
            Button::Left => PointerButton::Left,
            Button::Right => PointerButton::Right,
            Button::Middle => PointerButton::Middle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Down {
        x: i32,
        y: i32,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        alt: bool,
    },
    /// `button: None` is a hover.
    Move {
        x: i32,
        y: i32,
        #[serde(default)]
        button: Option<Button>,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        alt: bool,
    },
    Up {
        x: i32,
        y: i32,
        #[serde(default)]
        button: Button,
    },
    DoubleClick {
        x: i32,
        y: i32,
    },
    Wheel {
        delta: i32,
    },
    Leave,
    Resize {
        width: i32,
        height: i32,
    },
    /// Answer for the next confirmation prompt, overriding `--yes`.
    Answer {
        yes: bool,
    },
    /// Name the next properties dialog returns.
    Rename {
        name: String,
    },
    /// Destination the next export dialog returns.
    SaveTo {
        path: PathBuf,
    },
    ImportSamples {
        paths: Vec<PathBuf>,
    },
    Undo,
    Redo,
    Render,
    Tooltip {
        x: i32,
        y: i32,
    },
}

fn pointer(x: i32, y: i32, button: Option<Button>, shift: bool, alt: bool) -> PointerEvent {
    PointerEvent {
        modifiers: Modifiers { shift, alt },
        ..PointerEvent::new(x, y, button.map(PointerButton::from))
    }
}

impl ScriptStep {
    /// The pointer event a step carries, if it is a pointer step.
    pub fn pointer_event(&self) -> Option<PointerEvent> {
        match *self {
            ScriptStep::Down {
                x,
                y,
                button,
                shift,
                alt,
            } => Some(pointer(x, y, Some(button), shift, alt)),
            ScriptStep::Move {
                x,
                y,
                button,
                shift,
                alt,
            } => Some(pointer(x, y, button, shift, alt)),
            ScriptStep::Up { x, y, button } => Some(pointer(x, y, Some(button), false, false)),
            ScriptStep::DoubleClick { x, y } => Some(PointerEvent::left(x, y)),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ScriptError {
    Io(std::io::Error),
    Json { line: usize, source: serde_json::Error },
}

impl From<std::io::Error> for ScriptError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Json { line, source } => write!(f, "JSON error on line {}: {}", line, source),
        }
    }
}

impl std::error::Error for ScriptError {}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, ScriptError> {
    let file = File::open(path)?;
    parse_script(BufReader::new(file))
}

/// Blank lines and `#` comments are skipped.
pub fn parse_script(reader: impl BufRead) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step = serde_json::from_str(trimmed).map_err(|source| ScriptError::Json {
            line: index + 1,
            source,
        })?;
        steps.push(step);
    }
    log::debug!("loaded {} script steps", steps.len());
    Ok(steps)
}
