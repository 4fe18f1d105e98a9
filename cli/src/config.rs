use crate::error::{Result, ResultExt};
use changelog::ChangelogConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "modrel.toml";

/// Project settings read from `modrel.toml`; every key is optional
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModrelConfig {
    /// Defaults to the name of the project directory
    pub mod_name: Option<String>,
    pub modfiles_dir: String,
    pub main_branch: String,
    pub remote: String,
    /// Lua global toggled between development and release builds
    pub devmode_flag: String,
    /// File name globs left out of release archives
    pub exclude: Vec<String>,
    pub factorio_path: PathBuf,
    pub userdata_path: Option<PathBuf>,
    pub portal: PortalSettings,
    pub changelog: ChangelogSettings,
}

impl Default for ModrelConfig {
    fn default() -> Self {
        Self {
            mod_name: None,
            modfiles_dir: "modfiles".to_string(),
            main_branch: "master".to_string(),
            remote: "origin".to_string(),
            devmode_flag: "DEV_ACTIVE".to_string(),
            exclude: vec![".*".to_string(), "scenarios".to_string(), "tmp".to_string()],
            factorio_path: PathBuf::from("factorio"),
            userdata_path: None,
            portal: PortalSettings::default(),
            changelog: ChangelogSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortalSettings {
    pub upload_url: String,
    pub images_url: String,
    pub upload_key_env: String,
    pub edit_key_env: String,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            upload_url: portal::DEFAULT_UPLOAD_URL.to_string(),
            images_url: portal::DEFAULT_IMAGES_URL.to_string(),
            upload_key_env: "MOD_UPLOAD_API_KEY".to_string(),
            edit_key_env: "MOD_EDIT_API_KEY".to_string(),
        }
    }
}

/// Overrides for the changelog layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChangelogSettings {
    pub separator_width: Option<usize>,
    pub date_format: Option<String>,
    pub pending_version: Option<String>,
    pub pending_date: Option<String>,
    pub categories: Option<Vec<String>>,
}

impl ChangelogSettings {
    pub fn to_config(&self) -> ChangelogConfig {
        let mut config = ChangelogConfig::default();
        if let Some(width) = self.separator_width {
            config.separator_width = width;
        }
        if let Some(format) = &self.date_format {
            config.date_format = format.clone();
        }
        if let Some(version) = &self.pending_version {
            config.pending_version = version.clone();
        }
        if let Some(date) = &self.pending_date {
            config.pending_date = date.clone();
        }
        if let Some(categories) = &self.categories {
            config.default_categories = categories.clone();
        }
        config
    }
}

impl ModrelConfig {
    /// Load `modrel.toml` from `root`, falling back to defaults when absent
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ModrelConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Game user data directory, defaulting to the platform's standard location
    pub fn userdata_dir(&self) -> Option<PathBuf> {
        if let Some(path) = &self.userdata_path {
            return Some(path.clone());
        }
        if cfg!(target_os = "linux") {
            dirs::home_dir().map(|home| home.join(".factorio"))
        } else {
            dirs::data_dir().map(|data| data.join("factorio"))
        }
    }
}
