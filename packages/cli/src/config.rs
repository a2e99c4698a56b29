use anyhow::{Context, Result};
use pagecraft_editor::EditorConfig;
use pagecraft_styles::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Theme tokens; the built-in theme when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_path: Option<String>,

    /// Where `export` writes HTML
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Local cache for history snapshots and drafts
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Page title; the schema file stem when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_cache_dir() -> String {
    ".pagecraft".to_string()
}

fn default_pretty() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: None,
            pretty: default_pretty(),
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Cannot read {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid {}", config_path.display()))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn out_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.out_dir)
    }

    pub fn cache_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.cache_dir)
    }

    pub fn theme(&self, cwd: &Path) -> Result<Theme> {
        match &self.theme_path {
            Some(path) => {
                let path = cwd.join(path);
                Theme::load(&path).with_context(|| format!("Cannot load theme {}", path.display()))
            }
            None => Ok(Theme::default()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme_path: None,
            out_dir: default_out_dir(),
            cache_dir: default_cache_dir(),
            editor: EditorConfig::default(),
            export: ExportConfig::default(),
        }
    }
}
