use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::explorer::{ExplorerSettings, ScrollBarStyle};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    explorer: ExplorerConfig,
}

#[derive(Deserialize, Default)]
struct ExplorerConfig {
    ui_scale: Option<f32>,
    drag_threshold: Option<i32>,
    scroll_bar: Option<String>,
    wheel_rows: Option<i32>,
    fine_adjust_divisor: Option<i32>,
}

pub struct Config {
    explorer: ExplorerConfig,
}

impl Config {
    /// Embedded defaults merged with `~/.config/chiptrack/config.toml`.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref())
    }

    /// Embedded defaults merged with the file at `path`, if it exists.
    pub fn load_from(path: Option<&Path>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(path) = path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => merge_explorer(&mut base.explorer, user.explorer),
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            explorer: base.explorer,
        }
    }

    pub fn explorer_settings(&self) -> ExplorerSettings {
        let fallback = ExplorerSettings::default();
        ExplorerSettings {
            ui_scale: self
                .explorer
                .ui_scale
                .unwrap_or(fallback.ui_scale)
                .clamp(0.5, 4.0),
            drag_threshold: self
                .explorer
                .drag_threshold
                .unwrap_or(fallback.drag_threshold)
                .max(0),
            scroll_bar: self
                .explorer
                .scroll_bar
                .as_deref()
                .and_then(parse_scroll_bar)
                .unwrap_or(fallback.scroll_bar),
            wheel_rows: self
                .explorer
                .wheel_rows
                .unwrap_or(fallback.wheel_rows)
                .max(1),
            fine_adjust_divisor: self
                .explorer
                .fine_adjust_divisor
                .unwrap_or(fallback.fine_adjust_divisor)
                .max(1),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chiptrack").join("config.toml"))
}

fn merge_explorer(base: &mut ExplorerConfig, user: ExplorerConfig) {
    if user.ui_scale.is_some() {
        base.ui_scale = user.ui_scale;
    }
    if user.drag_threshold.is_some() {
        base.drag_threshold = user.drag_threshold;
    }
    if user.scroll_bar.is_some() {
        base.scroll_bar = user.scroll_bar;
    }
    if user.wheel_rows.is_some() {
        base.wheel_rows = user.wheel_rows;
    }
    if user.fine_adjust_divisor.is_some() {
        base.fine_adjust_divisor = user.fine_adjust_divisor;
    }
}

fn parse_scroll_bar(s: &str) -> Option<ScrollBarStyle> {
    match s.to_lowercase().as_str() {
        "none" | "off" => Some(ScrollBarStyle::None),
        "thin" => Some(ScrollBarStyle::Thin),
        "thick" => Some(ScrollBarStyle::Thick),
        _ => None,
    }
}
