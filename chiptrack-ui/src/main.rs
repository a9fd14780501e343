mod host;
mod script;

use std::fs::File;
use std::path::{Path, PathBuf};

use chiptrack_core::config::Config as AppConfig;
use chiptrack_core::explorer::{ExplorerEnv, Point, ProjectExplorer};
use chiptrack_core::transaction::UndoRedoManager;
use chiptrack_types::Project;

use host::{KeyboardStrip, ScriptDialogs, TextCanvas};
use script::ScriptStep;

const DEFAULT_WIDTH: i32 = 240;
const DEFAULT_HEIGHT: i32 = 600;
const UNDO_DEPTH: usize = 500;

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chiptrack")
        .join("chiptrack.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path)
        .or_else(|_| File::create(std::env::temp_dir().join("chiptrack.log")))
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Cannot create log file: {}", e);
            return;
        }
    };

    if WriteLogger::init(log_level, Config::default(), log_file).is_err() {
        eprintln!("Failed to initialize logger");
        return;
    }

    log::info!("chiptrack starting (log level: {:?})", log_level);
}

struct Args {
    verbose: bool,
    assume_yes: bool,
    width: i32,
    height: i32,
    out: Option<PathBuf>,
    state: Option<PathBuf>,
    project: Option<PathBuf>,
    script: PathBuf,
}

fn usage() -> ! {
    eprintln!(
        "Usage: chiptrack-ui [-v] [--yes] [--width N] [--height N] \
         [--out project.json] [--state state.json] [project.json] <script.jsonl>"
    );
    std::process::exit(2);
}

fn parse_args(args: &[String]) -> Args {
    let flag_value = |name: &str| {
        args.iter()
            .position(|a| a == name)
            .and_then(|i| args.get(i + 1).cloned())
    };
    let number = |name: &str, default: i32| match flag_value(name) {
        Some(v) => v.parse().unwrap_or_else(|_| {
            eprintln!("{} expects a number, got '{}'", name, v);
            usage()
        }),
        None => default,
    };

    let mut positional = Vec::new();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--width" | "--height" | "--out" | "--state" => i += 2,
            a if a.starts_with('-') => i += 1,
            a => {
                positional.push(PathBuf::from(a));
                i += 1;
            }
        }
    }

    let (project, script) = match positional.len() {
        1 => (None, positional.remove(0)),
        2 => {
            let script = positional.remove(1);
            (Some(positional.remove(0)), script)
        }
        _ => usage(),
    };

    Args {
        verbose: args.iter().any(|a| a == "--verbose" || a == "-v"),
        assume_yes: args.iter().any(|a| a == "--yes"),
        width: number("--width", DEFAULT_WIDTH),
        height: number("--height", DEFAULT_HEIGHT),
        out: flag_value("--out").map(PathBuf::from),
        state: flag_value("--state").map(PathBuf::from),
        project,
        script,
    }
}

fn load_project(path: &Path) -> Result<Project, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("Bad project {}: {}", path.display(), e))
}

struct Session {
    project: Project,
    explorer: ProjectExplorer,
    undo: UndoRedoManager,
    dialogs: ScriptDialogs,
    strip: KeyboardStrip,
}

impl Session {
    fn env(&mut self) -> (&mut ProjectExplorer, ExplorerEnv<'_>) {
        (
            &mut self.explorer,
            ExplorerEnv {
                project: &mut self.project,
                transactions: &mut self.undo,
                dialogs: &mut self.dialogs,
                drop_targets: &self.strip,
            },
        )
    }

    fn run(&mut self, step: ScriptStep) {
        log::debug!("step {:?}", step);
        let pointer = step.pointer_event();
        match step {
            ScriptStep::Down { .. } => {
                if let Some(ev) = pointer {
                    let (explorer, mut env) = self.env();
                    explorer.pointer_down(&mut env, ev);
                }
            }
            ScriptStep::Move { .. } => {
                if let Some(ev) = pointer {
                    let (explorer, mut env) = self.env();
                    explorer.pointer_move(&mut env, ev);
                }
            }
            ScriptStep::Up { .. } => {
                if let Some(ev) = pointer {
                    let (explorer, mut env) = self.env();
                    explorer.pointer_up(&mut env, ev);
                }
            }
            ScriptStep::DoubleClick { .. } => {
                if let Some(ev) = pointer {
                    let (explorer, mut env) = self.env();
                    explorer.double_click(&mut env, ev);
                }
            }
            ScriptStep::Wheel { delta } => self.explorer.wheel(delta),
            ScriptStep::Leave => self.explorer.pointer_leave(),
            ScriptStep::Resize { width, height } => {
                self.explorer.resize(width, height);
                self.strip.top = height;
            }
            ScriptStep::Answer { yes } => self.dialogs.queue_answer(yes),
            ScriptStep::Rename { name } => self.dialogs.queue_name(name),
            ScriptStep::SaveTo { path } => self.dialogs.queue_save_path(path),
            ScriptStep::ImportSamples { paths } => {
                let (explorer, mut env) = self.env();
                let ids = explorer.import_samples(&mut env, &paths);
                println!("imported {} sample(s)", ids.len());
            }
            ScriptStep::Undo => {
                match self.undo.undo(&mut self.project) {
                    Some(scope) => println!("undo {:?}", scope),
                    None => println!("nothing to undo"),
                }
                self.explorer.rebuild(&self.project);
            }
            ScriptStep::Redo => {
                match self.undo.redo(&mut self.project) {
                    Some(scope) => println!("redo {:?}", scope),
                    None => println!("nothing to redo"),
                }
                self.explorer.rebuild(&self.project);
            }
            ScriptStep::Render => {
                let mut canvas = TextCanvas::default();
                self.explorer.render(&self.project, &mut canvas);
                for line in canvas.lines() {
                    println!("| {}", line);
                }
            }
            ScriptStep::Tooltip { x, y } => match self.explorer.tooltip_at(&self.project, x, y) {
                Some(tip) if tip.warning => println!("tooltip (warning): {}", tip.text),
                Some(tip) => println!("tooltip: {}", tip.text),
                None => println!("tooltip: none"),
            },
        }

        for event in self.explorer.take_events() {
            println!("> {:?}", event);
        }
        let audio = self.undo.take_audio_request();
        if audio.reinitialize_audio {
            println!("> audio: reinitialize");
        } else if audio.stop_audio {
            println!("> audio: stop");
        }
    }

    fn print_rows(&self) {
        for (i, row) in self.explorer.rows().iter().enumerate() {
            println!("{:3} {:?} {}", i, row.kind, row.text);
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), String> {
    std::fs::write(path, contents).map_err(|e| format!("Cannot write {}: {}", path.display(), e))
}

fn run(args: Args) -> Result<(), String> {
    let project = match &args.project {
        Some(path) => load_project(path)?,
        None => Project::new(),
    };
    let steps = script::load_script(&args.script)
        .map_err(|e| format!("{}: {}", args.script.display(), e))?;

    let settings = AppConfig::load().explorer_settings();
    let mut explorer = ProjectExplorer::new(settings, args.width, args.height, &project);
    explorer.set_origin(Point::new(0, 0));

    let mut session = Session {
        project,
        explorer,
        undo: UndoRedoManager::new(UNDO_DEPTH),
        dialogs: ScriptDialogs::new(args.assume_yes),
        strip: KeyboardStrip {
            top: args.height,
            height: 40,
            key_width: 8,
        },
    };

    for step in steps {
        session.run(step);
    }
    session.print_rows();

    if let Some(path) = &args.out {
        let json = serde_json::to_string_pretty(&session.project)
            .map_err(|e| format!("Cannot serialize project: {}", e))?;
        write_file(path, &json)?;
    }
    if let Some(path) = &args.state {
        let json = session
            .explorer
            .save_state()
            .map_err(|e| format!("Cannot save explorer state: {}", e))?;
        write_file(path, &json)?;
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args);
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
