use crate::error::ConfigError;
use crate::state::Timing;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub slowness_ms: f64,
    pub horiz_timeslice: f64,
    pub fps_cap: u32,
    pub seed: Option<u64>,
    pub color: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            slowness_ms: timing.slowness_ms,
            horiz_timeslice: timing.horiz_timeslice,
            fps_cap: 60,
            seed: None,
            color: true,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.horiz_timeslice > 0.0 && self.horiz_timeslice < 1.0) {
            return Err(ConfigError::HorizTimeslice(self.horiz_timeslice));
        }
        if !(self.slowness_ms.is_finite() && self.slowness_ms > 0.0) {
            return Err(ConfigError::Slowness(self.slowness_ms));
        }
        if self.fps_cap == 0 {
            return Err(ConfigError::FpsCap);
        }
        Ok(())
    }

    pub fn timing(&self) -> Timing {
        Timing {
            slowness_ms: self.slowness_ms,
            horiz_timeslice: self.horiz_timeslice,
        }
    }
}

/// Default location of `settings.json`, if the platform has a config dir.
pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "pipefall", "Pipefall").map(|p| p.config_dir().join("settings.json"))
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(s) => match serde_json::from_str::<Settings>(&s) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("ignoring malformed settings {}: {e}", path.display());
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}
