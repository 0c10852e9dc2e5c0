//! Configuration for neonveil.
//!
//! Settings live in `config.toml` under the platform configuration
//! directory. Every field has a default, so a partial (or missing) file is
//! always valid.

mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use settings::{
    BoundaryPolicy, DeviceSettings, LogSettings, MotionSettings, ParticleSettings,
    PerformanceSettings, ProjectEntry, RainSettings,
};

/// Environment variable forcing reduced motion (`1` / `true`).
pub const ENV_REDUCED_MOTION: &str = "NEONVEIL_REDUCED_MOTION";
/// Environment variable overriding the network effective type.
pub const ENV_CONNECTION: &str = "NEONVEIL_CONNECTION";

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Interface language (`en` or `fr`).
    pub language: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub motion: MotionSettings,
    pub device: DeviceSettings,
    pub particles: ParticleSettings,
    pub rain: RainSettings,
    pub performance: PerformanceSettings,
    pub log: LogSettings,
    pub ui: UiSettings,
    pub projects: Vec<ProjectEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            motion: MotionSettings::default(),
            device: DeviceSettings::default(),
            particles: ParticleSettings::default(),
            rain: RainSettings::default(),
            performance: PerformanceSettings::default(),
            log: LogSettings::default(),
            ui: UiSettings::default(),
            projects: settings::default_projects(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "neonveil")
}

impl Config {
    /// Default location of the configuration file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Directory for runtime data such as log files.
    pub fn data_dir() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Load from the default location, writing the defaults there on first run.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::default_path() else {
            tracing::debug!("no configuration directory, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            let config = Self::default();
            if let Err(err) = config.save_to(&path) {
                tracing::warn!(%err, "could not write default configuration");
            }
            return Ok(config);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// [`Config::load`] that never fails. An unusable file yields the
    /// defaults together with the reason, to be reported once logging is up.
    pub fn load_or_default() -> (Self, Option<ConfigError>) {
        Self::or_default(Self::load())
    }

    pub fn load_from_or_default(path: &Path) -> (Self, Option<ConfigError>) {
        Self::or_default(Self::load_from(path))
    }

    fn or_default(loaded: Result<Self>) -> (Self, Option<ConfigError>) {
        match loaded {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }

    /// Write the configuration, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, content).map_err(io_err)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_REDUCED_MOTION) {
            self.motion.reduced = matches!(value.trim(), "1" | "true" | "yes");
        }
        if let Some(value) = lookup(ENV_CONNECTION) {
            let value = value.trim();
            self.device.connection = (!value.is_empty()).then(|| value.to_string());
        }
    }

    /// Reject values the effects cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.particles.palette.is_empty() {
            return Err(ConfigError::Invalid("particles.palette is empty".into()));
        }
        let rain = &self.rain;
        if !rain.column_width_px.is_finite() || rain.column_width_px <= 0.0 {
            return Err(ConfigError::Invalid(
                "rain.column_width_px must be a positive number".into(),
            ));
        }
        if !rain.min_speed.is_finite()
            || !rain.max_speed.is_finite()
            || rain.min_speed < 0.0
            || rain.min_speed >= rain.max_speed
        {
            return Err(ConfigError::Invalid(
                "rain speeds must satisfy 0 <= min_speed < max_speed".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.rain.glyph_reroll_chance) {
            return Err(ConfigError::Invalid(
                "rain.glyph_reroll_chance must be within 0..=1".into(),
            ));
        }
        let perf = &self.performance;
        if perf.min_samples == 0 || perf.window < perf.min_samples {
            return Err(ConfigError::Invalid(
                "performance.window must be at least performance.min_samples (> 0)".into(),
            ));
        }
        Ok(())
    }
}
