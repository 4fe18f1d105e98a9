//! Fixture helpers shared by the cross-crate integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn separator() -> String {
    "-".repeat(99)
}

/// A changelog with a pending entry on top of two released ones
pub fn pending_changelog() -> String {
    let sep = separator();
    format!(
        "{sep}\n\
         Version: 0.00.00\n\
         Date: 00. 00. 0000\n  \
         Features:\n    - Added recipe search\n  \
         Changes:\n    - \n  \
         Bugfixes:\n    - Fixed crash when opening an empty factory\n\n\
         {sep}\n\
         Version: 1.1.41\n\
         Date: 03. 02. 2026\n  \
         Changes:\n    - \n    - Reworked the compact view\n\n\
         {sep}\n\
         Version: 1.1.40\n\
         Date: 12. 01. 2026\n  \
         Bugfixes:\n    - Fixed a typo\n"
    )
}

/// The part of [`pending_changelog`] below the pending entry
pub fn released_history() -> String {
    let text = pending_changelog();
    let second = text.match_indices(&separator()).nth(1).map(|(i, _)| i).unwrap();
    text[second..].to_string()
}

pub const MIGRATOR: &str = "local migrator = {}

local migration_masterlist = {
    [1] = {version=\"1.1.40\", migration=require(\"data.migrations.migration_1_1_40\")},
    [2] = {version=\"1.1.41\", migration=require(\"data.migrations.migration_1_1_41\")},
}

function migrator.migrate() end

return migrator
";

pub const INFO_JSON: &str = r#"{
    "name": "factoryplanner",
    "version": "1.1.41",
    "title": "Factory Planner",
    "author": "Therenas",
    "factorio_version": "1.1",
    "dependencies": ["base >= 1.1.0"]
}
"#;

/// Mod sources laid out on disk in a temporary directory
pub struct ModFixture {
    _dir: TempDir,
    modfiles: PathBuf,
}

impl ModFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let modfiles = dir.path().join("modfiles");
        fs::create_dir_all(modfiles.join("data/migrations")).unwrap();
        fs::create_dir_all(modfiles.join("data/handlers")).unwrap();

        fs::write(modfiles.join("info.json"), INFO_JSON).unwrap();
        fs::write(modfiles.join("changelog.txt"), pending_changelog()).unwrap();
        fs::write(
            modfiles.join("data/migrations/masterlist.json"),
            "[\n    \"1.1.40\",\n    \"1.1.41\"\n]\n",
        )
        .unwrap();
        fs::write(modfiles.join("data/handlers/migrator.lua"), MIGRATOR).unwrap();

        Self { _dir: dir, modfiles }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.modfiles.join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn write(&self, relative: &str, content: &str) {
        fs::write(self.path(relative), content).unwrap();
    }

    pub fn modfiles(&self) -> &Path {
        &self.modfiles
    }
}

impl Default for ModFixture {
    fn default() -> Self {
        Self::new()
    }
}
