use crate::config::ModrelConfig;
use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};

/// A mod project: the directory holding `modfiles/` plus its settings
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    mod_name: String,
    config: ModrelConfig,
}

impl Project {
    /// Use `explicit` as the project root, or search upwards from the
    /// current directory for one containing the modfiles directory
    pub fn locate(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(root) => Self::open(&root),
            None => {
                let cwd = std::env::current_dir()?;
                let defaults = ModrelConfig::default();
                let root = cwd
                    .ancestors()
                    .find(|dir| {
                        let config = ModrelConfig::load(dir).unwrap_or_else(|_| defaults.clone());
                        dir.join(&config.modfiles_dir).is_dir()
                    })
                    .ok_or_else(|| CliError::ProjectNotFound {
                        start: cwd.clone(),
                        dir: defaults.modfiles_dir.clone(),
                    })?;
                Self::open(root)
            }
        }
    }

    pub fn open(root: &Path) -> Result<Self> {
        let root = root.canonicalize().map_err(|e| {
            CliError::Io(e).with_context(format!("Invalid project directory {}", root.display()))
        })?;
        let config = ModrelConfig::load(&root)?;

        if !root.join(&config.modfiles_dir).is_dir() {
            return Err(CliError::ProjectNotFound {
                start: root,
                dir: config.modfiles_dir,
            });
        }

        let mod_name = match &config.mod_name {
            Some(name) => name.clone(),
            None => root
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .ok_or_else(|| CliError::Other("Cannot derive mod name from project path".to_string()))?,
        };

        Ok(Self {
            root,
            mod_name,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mod_name(&self) -> &str {
        &self.mod_name
    }

    pub fn config(&self) -> &ModrelConfig {
        &self.config
    }

    pub fn modfiles_dir(&self) -> PathBuf {
        self.root.join(&self.config.modfiles_dir)
    }

    pub fn info_json(&self) -> PathBuf {
        self.modfiles_dir().join("info.json")
    }

    pub fn changelog(&self) -> PathBuf {
        self.modfiles_dir().join("changelog.txt")
    }

    pub fn control_lua(&self) -> PathBuf {
        self.modfiles_dir().join("control.lua")
    }

    pub fn migrations_dir(&self) -> PathBuf {
        self.modfiles_dir().join("data").join("migrations")
    }

    pub fn masterlist(&self) -> PathBuf {
        self.migrations_dir().join("masterlist.json")
    }

    pub fn migrator(&self) -> PathBuf {
        self.modfiles_dir().join("data").join("handlers").join("migrator.lua")
    }

    pub fn license(&self) -> PathBuf {
        self.root.join("LICENSE.md")
    }

    pub fn locale_dir(&self) -> PathBuf {
        self.root.join("locale")
    }

    pub fn releases_dir(&self) -> PathBuf {
        self.root.join("releases")
    }

    pub fn scenarios_dir(&self) -> PathBuf {
        self.root.join("scenarios")
    }

    pub fn screenshotter_dir(&self) -> PathBuf {
        self.scenarios_dir().join("screenshotter")
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.root.join("screenshots")
    }

    /// `<mod>_<version>`, the name of release archives and their top directory
    pub fn release_name(&self, version: &str) -> String {
        format!("{}_{}", self.mod_name, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn mod_name_defaults_to_directory_name() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("factoryplanner");
        fs::create_dir_all(root.join("modfiles")).unwrap();

        let project = Project::open(&root).unwrap();
        assert_eq!(project.mod_name(), "factoryplanner");
        assert_eq!(project.release_name("1.2.3"), "factoryplanner_1.2.3");
        assert!(project.masterlist().ends_with("modfiles/data/migrations/masterlist.json"));
    }

    #[test]
    fn configured_layout_is_honoured() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("modrel.toml"),
            "mod_name = \"other\"\nmodfiles_dir = \"src\"\n",
        )
        .unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.mod_name(), "other");
        assert!(project.info_json().ends_with("src/info.json"));
    }

    #[test]
    fn missing_modfiles_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = Project::open(dir.path()).unwrap_err();
        assert!(matches!(err, CliError::ProjectNotFound { .. }));
    }
}
