use crate::errors::{AppError, AppResult};
use crate::models::category::{
    Category, CategoryModel, Decoration, default_categories, default_decorations,
};
use crate::models::settings::{EventSettings, Schedule};
use crate::models::snapshot::RosterSnapshot;
use crate::store::file::save_snapshot;
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

const SNAPSHOT_FILE: &str = "snapshot.json";
const BOARD_FILE: &str = "board.json";
const ACTIVITY_FILE: &str = "activity.log";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the snapshot, the local board and the activity log.
    pub data_dir: String,
    #[serde(flatten)]
    pub event: EventSettings,
    pub schedule: Schedule,
    pub categories: Vec<Category>,
    pub decorations: Vec<Decoration>,
    /// Interval of the liveness check while listening.
    pub heartbeat_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: Self::config_dir().to_string_lossy().to_string(),
            event: EventSettings::default(),
            schedule: Schedule::default(),
            categories: default_categories(),
            decorations: default_decorations(),
            heartbeat_secs: 60,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rgamenight")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rgamenight")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rgamenight.conf")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_yaml(&content).map_err(|e| match e {
            AppError::Config(msg) => AppError::Config(format!("{}: {}", path.display(), msg)),
            other => AppError::Config(format!("{}: {}", path.display(), other)),
        })
    }

    /// Parse and validate a config document. Blank input yields defaults.
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(content)?;
        cfg.event.validate()?;
        Ok(cfg)
    }

    pub fn data_path(&self) -> PathBuf {
        expand_tilde(&self.data_dir)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_path().join(SNAPSHOT_FILE)
    }

    pub fn board_path(&self) -> PathBuf {
        self.data_path().join(BOARD_FILE)
    }

    pub fn activity_path(&self) -> PathBuf {
        self.data_path().join(ACTIVITY_FILE)
    }

    /// Validated category model built from `categories` and `decorations`.
    pub fn model(&self) -> AppResult<CategoryModel> {
        CategoryModel::new(self.categories.clone(), self.decorations.clone())
    }

    /// Create the config directory, the config file (skipped in test mode)
    /// and an empty snapshot.
    pub fn init_all(&self, is_test: bool) -> AppResult<()> {
        if !is_test {
            fs::create_dir_all(Self::config_dir())?;
            let yaml = serde_yaml::to_string(self)?;
            fs::write(Self::config_file(), yaml)?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        fs::create_dir_all(self.data_path())?;
        let snapshot = self.snapshot_path();
        if !snapshot.exists() {
            save_snapshot(&snapshot, &RosterSnapshot::default())?;
        }
        success(format!("Snapshot:    {}", snapshot.display()));

        Ok(())
    }
}
