use crate::grid::{DEFAULT_MAP_SIZE, MAX_MAP_SIZE, MIN_MAP_SIZE};
use crate::model::{Steering, Zoom};
use crate::render::MINIMAP_ZOOM;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "tiltmaze")]
#[command(about = "Tilt a marble through a random maze on a 1-bit screen", long_about = None)]
pub(crate) struct Args {
    /// Maze side length in cells
    #[arg(long)]
    pub(crate) size: Option<usize>,

    /// Main view zoom: pixels per maze cell (1-20)
    #[arg(long)]
    pub(crate) zoom: Option<i32>,

    /// Seed for reproducible mazes
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Tick period in milliseconds
    #[arg(long)]
    pub(crate) update_ms: Option<u64>,

    /// Walk through walls
    #[arg(long, default_value_t = false)]
    pub(crate) noclip: bool,

    /// Start in tank steering (forward tilt walks, sideways tilt turns)
    #[arg(long, default_value_t = false)]
    pub(crate) tank: bool,

    /// Print one generated maze as text and exit
    #[arg(long, default_value_t = false)]
    pub(crate) dump: bool,

    /// Log file verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub(crate) log_level: LogLevel,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) zoom: Zoom,
    pub(crate) minimap_zoom: Zoom,
    pub(crate) update_ms: u64,
    pub(crate) map_size: usize,
    pub(crate) noclip: bool,
    pub(crate) steering: Steering,
    /// Milli-g added per tilt key press.
    pub(crate) tilt_step: f32,
    /// Fraction of the lean kept each tick.
    pub(crate) tilt_decay: f32,
    pub(crate) dotted_backdrop: bool,
    pub(crate) seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zoom: Zoom::default(),
            minimap_zoom: Zoom::new(MINIMAP_ZOOM),
            update_ms: 50,
            map_size: DEFAULT_MAP_SIZE,
            noclip: false,
            steering: Steering::Tilt,
            tilt_step: 250.0,
            tilt_decay: 0.85,
            dotted_backdrop: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Clamp every field into a usable range.
    pub(crate) fn sanitized(mut self) -> Self {
        self.map_size = self.map_size.clamp(MIN_MAP_SIZE, MAX_MAP_SIZE);
        self.update_ms = self.update_ms.clamp(10, 1000);
        self.tilt_step = if self.tilt_step.is_finite() {
            self.tilt_step.clamp(1.0, 1000.0)
        } else {
            Settings::default().tilt_step
        };
        self.tilt_decay = if self.tilt_decay.is_finite() {
            self.tilt_decay.clamp(0.0, 1.0)
        } else {
            Settings::default().tilt_decay
        };
        self
    }

    /// Settings for this run: stored values overridden by the command line.
    pub(crate) fn with_args(&self, args: &Args) -> Self {
        let mut s = self.clone();
        if let Some(size) = args.size {
            s.map_size = size;
        }
        if let Some(z) = args.zoom {
            s.zoom = Zoom::new(z);
        }
        if let Some(ms) = args.update_ms {
            s.update_ms = ms;
        }
        if args.seed.is_some() {
            s.seed = args.seed;
        }
        if args.noclip {
            s.noclip = true;
        }
        if args.tank {
            s.steering = Steering::Tank;
        }
        s.sanitized()
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "tiltmaze", "Tiltmaze")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create data dir {}", dir.display()))?;
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("tiltmaze.log"),
    })
}

pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        match serde_json::from_str::<Settings>(&s) {
            Ok(v) => return v.sanitized(),
            Err(e) => log::warn!("ignoring unreadable settings {}: {e}", path.display()),
        }
    }
    Settings::default()
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("could not write {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // Rename-over-existing is not atomic on Windows; drop the old file first.
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}
