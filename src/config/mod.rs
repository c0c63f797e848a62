use std::env;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::calendar::{LocalZone, WeekStart, ZoneError};
use crate::schedule::{InputPolicy, RangeValidator};

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "Studycal";
const APP_NAME: &str = "studycal";

pub const CONFIG_ENV: &str = "STUDYCAL_CONFIG";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<CalendarConfig> {
        self.paths.ensure_directories()?;
        if !self.paths.config_file.exists() {
            let default_cfg = CalendarConfig::default();
            self.write_default_config(&default_cfg)?;
            return Ok(default_cfg);
        }

        self.load()
    }

    pub fn load(&self) -> Result<CalendarConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let mut cfg: CalendarConfig = toml::from_str(&raw).context("parsing config toml")?;
        cfg.post_load();
        Ok(cfg)
    }

    fn write_default_config(&self, cfg: &CalendarConfig) -> Result<()> {
        let toml = toml::to_string_pretty(cfg).context("serializing default config")?;
        if let Some(parent) = self.paths.config_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = fs::File::create(&self.paths.config_file)
            .with_context(|| format!("creating config {}", self.paths.config_file.display()))?;
        file.write_all(toml.as_bytes())
            .context("writing default config")?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Result<Self> {
        if let Some(path) = env::var_os(CONFIG_ENV).map(PathBuf::from) {
            return Ok(Self::from_override(path));
        }

        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;
        let config_dir = project_dirs.config_dir().to_path_buf();
        Ok(Self {
            config_file: config_dir.join("config.toml"),
            config_dir,
        })
    }

    /// A file path is used as-is; a directory gets `config.toml` inside it.
    pub fn from_override(path: PathBuf) -> Self {
        if path.is_dir() || path.extension().is_none() {
            return Self {
                config_file: path.join("config.toml"),
                config_dir: path,
            };
        }
        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            config_dir,
            config_file: path,
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.config_dir)
            .with_context(|| format!("creating config directory {}", self.config_dir.display()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub zone: ZoneSetting,
    pub recent_window_days: u32,
    pub input_policy: InputPolicy,
    pub week_start: WeekStart,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            zone: ZoneSetting::Local,
            recent_window_days: 5,
            input_policy: InputPolicy::Lenient,
            week_start: WeekStart::Monday,
        }
    }
}

impl CalendarConfig {
    fn post_load(&mut self) {
        if self.recent_window_days == 0 {
            tracing::warn!("recent_window_days = 0 only shows today");
        }
    }

    /// Resolves the configured zone, falling back to UTC when the local offset is unknown.
    pub fn resolve_zone(&self) -> LocalZone {
        match self.zone.resolve() {
            Ok(zone) => zone,
            Err(err) => {
                tracing::warn!(%err, "falling back to UTC for calendar days");
                LocalZone::UTC
            }
        }
    }

    pub fn validator(&self) -> RangeValidator {
        RangeValidator::new(self.input_policy)
    }
}

/// Which zone calendar days are taken in: `local`, `utc` or a fixed `+HH:MM` offset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ZoneSetting {
    #[default]
    Local,
    Utc,
    Fixed(LocalZone),
}

impl ZoneSetting {
    pub fn resolve(&self) -> Result<LocalZone, ZoneError> {
        match self {
            ZoneSetting::Local => LocalZone::system(),
            ZoneSetting::Utc => Ok(LocalZone::UTC),
            ZoneSetting::Fixed(zone) => Ok(*zone),
        }
    }
}

impl TryFrom<String> for ZoneSetting {
    type Error = ZoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ZoneSetting::Local),
            "utc" | "z" => Ok(ZoneSetting::Utc),
            other => LocalZone::parse_offset(other).map(ZoneSetting::Fixed),
        }
    }
}

impl From<ZoneSetting> for String {
    fn from(value: ZoneSetting) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneSetting::Local => f.write_str("local"),
            ZoneSetting::Utc => f.write_str("utc"),
            ZoneSetting::Fixed(zone) => {
                let (hours, minutes, _) = zone.offset().as_hms();
                let sign = if zone.offset().is_negative() { '-' } else { '+' };
                write!(f, "{sign}{:02}:{:02}", hours.unsigned_abs(), minutes.unsigned_abs())
            }
        }
    }
}
