use thiserror::Error;

/// Errors that can occur when working with changelogs
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Invalid changelog format: {0}")]
    Format(String),

    #[error("Invalid changelog format at line {0}: {1}")]
    InvalidFormat(usize, String),
}

impl ChangelogError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Format(msg) => format!("Changelog is malformed: {msg}"),
            Self::InvalidFormat(line, msg) => {
                format!("Changelog is malformed at line {line}: {msg}")
            }
        }
    }
}
