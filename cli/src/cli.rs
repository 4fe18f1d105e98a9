use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "modrel")]
#[command(
    author,
    version,
    about = "Release automation for Factorio mods: changelog, migrations, packaging and publishing"
)]
pub struct Cli {
    /// Project directory (the one containing modfiles/); searched upwards from the current directory by default
    #[clap(long, global = true)]
    pub project: Option<PathBuf>,

    /// Answer yes to the confirmation prompt
    #[clap(short, long, global = true, default_value_t = false)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a release: bump the version, date the changelog and zip the mod
    Release {
        /// Push the release commit and upload the archive to the mod portal
        #[clap(long, default_value_t = false, conflicts_with = "local")]
        publish: bool,

        /// Keep a copy of the archive in the project root and undo the release commit
        #[clap(long, default_value_t = false)]
        local: bool,

        /// Retake screenshots (and replace the portal images when publishing)
        #[clap(long, default_value_t = false)]
        screenshots: bool,

        /// Enable verbose output with additional information
        #[clap(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Start a dev cycle: add a blank changelog entry and enable devmode
    NewDevCycle {
        /// Enable verbose output with additional information
        #[clap(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Add a blank migration for the next release
    NewMigration {
        /// Enable verbose output with additional information
        #[clap(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Retarget the newest migration at the release after the main branch's version
    UpdateMigration {
        /// Enable verbose output with additional information
        #[clap(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Like update-migration, and also adopt the main branch's mod version
    UpdateVersions {
        /// Enable verbose output with additional information
        #[clap(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Run the screenshotter scenario and crop its output
    Screenshots {
        /// Enable verbose output with additional information
        #[clap(short, long, default_value_t = false)]
        verbose: bool,
    },
}

/// What happens to a release once its commit exists
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseMode {
    /// Commit only
    Build,
    Local,
    Publish,
}

impl ReleaseMode {
    pub fn from_flags(publish: bool, local: bool) -> Self {
        match (publish, local) {
            (true, _) => Self::Publish,
            (false, true) => Self::Local,
            (false, false) => Self::Build,
        }
    }
}
