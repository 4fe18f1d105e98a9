use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Version error: {0}")]
    Version(#[from] version::VersionError),

    #[error("Git error: {0}")]
    Git(#[from] git::GitError),

    #[error("Changelog error: {0}")]
    Changelog(#[from] changelog::ChangelogError),

    #[error("Migration error: {0}")]
    Migration(#[from] migration::MigrationError),

    #[error("Portal error: {0}")]
    Portal(#[from] portal::PortalError),

    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Glob pattern error: {0}")]
    GlobError(#[from] glob::PatternError),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Directory walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Dialoguer error: {0}")]
    DialoguerError(#[from] dialoguer::Error),

    #[error("Project not found: no '{dir}' directory in {start} or its parents")]
    ProjectNotFound { start: PathBuf, dir: String },

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("{0}")]
    Other(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<CliError>),
}

impl CliError {
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    pub fn precondition<S: Into<String>>(message: S) -> Self {
        Self::Precondition(message.into())
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Io(err) => format!("I/O operation failed: {err}"),
            Self::Version(err) => err.user_message(),
            Self::Git(err) => err.user_message(),
            Self::Changelog(err) => err.user_message(),
            Self::Migration(err) => err.user_message(),
            Self::Portal(err) => err.user_message(),
            Self::JsonParseError(err) => format!("Failed to parse JSON: {err}"),
            Self::ConfigError(err) => format!("Invalid modrel.toml: {err}"),
            Self::GlobError(err) => format!("Invalid glob pattern: {err}"),
            Self::RegexError(err) => format!("Invalid regular expression: {err}"),
            Self::WalkError(err) => format!("Failed to read directory: {err}"),
            Self::ImageError(err) => format!("Failed to process image: {err}"),
            Self::DialoguerError(err) => format!("UI interaction error: {err}"),
            Self::ProjectNotFound { start, dir } => format!(
                "No '{}' directory found in {} or any parent directory (use --project)",
                dir,
                start.display()
            ),
            Self::Precondition(msg) => format!("{msg}, aborting"),
            Self::Other(msg) => msg.clone(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

pub trait ResultExt<T, E> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: Into<CliError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let cli_err: CliError = err.into();
            cli_err.with_context(context())
        })
    }
}
