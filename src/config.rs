use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("nightplan")
}

fn default_model() -> String {
    "claude-haiku-4-5-20251001".to_string()
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlannerConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Model used for timeline suggestions.
    #[serde(default = "default_model")]
    pub suggestion_model: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            suggestion_model: default_model(),
        }
    }
}

impl PlannerConfig {
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join("tasks.json")
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nightplan").join("config.json"))
    }

    /// Read the config file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring bad config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}
