use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Migration for version {0} is already registered")]
    DuplicateVersion(String),

    #[error("Migration file already exists: {0}")]
    Conflict(String),

    #[error("Registry marker line '{0}' not found")]
    MarkerNotFound(String),

    #[error("Masterlist is empty")]
    EmptyMasterlist,

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Failed to parse masterlist: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl MigrationError {
    /// Get a user-friendly message for command line display
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::DuplicateVersion(version) => {
                format!("A migration for {version} is already in the masterlist")
            }
            Self::Conflict(file) => format!("Refusing to overwrite existing migration {file}"),
            Self::MarkerNotFound(marker) => {
                format!("Could not find the registry block opener '{marker}' in the migrator")
            }
            Self::ParseError(e) => format!("masterlist.json is not a JSON array of strings: {e}"),
            _ => format!("{self}"),
        }
    }
}

pub type Result<T> = result::Result<T, MigrationError>;
