use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersionError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("info.json is not a JSON object")]
    NotAnObject,

    #[error("No string \"version\" key in info.json")]
    VersionNotFound,

    #[error("Invalid version '{0}': expected MAJOR.MINOR.PATCH")]
    InvalidFormat(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<VersionError>),
}

impl VersionError {
    /// Add context to an error
    #[must_use]
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    /// Get a user-friendly message for command line display
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not read info.json: {e}"),
            Self::InvalidJson(e) => format!("info.json is not valid JSON: {e}"),
            Self::VersionNotFound => "Could not find a version in info.json".to_string(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
            _ => format!("{self}"),
        }
    }
}

pub type Result<T> = result::Result<T, VersionError>;

/// Helper trait for adding context to results
pub trait ResultExt<T, E> {
    /// Add context to an error result with a string-producing closure
    ///
    /// # Errors
    /// Returns the wrapped error when `self` is an error
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T, E> for result::Result<T, E>
where
    E: Into<VersionError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let version_err: VersionError = err.into();
            version_err.with_context(context())
        })
    }
}
