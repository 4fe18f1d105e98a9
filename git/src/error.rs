use thiserror::Error;

/// Errors from the version-control collaborator
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git2 error: {0}")]
    Git2Error(#[from] git2::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Branch not found: {0}")]
    BranchNotFound(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("git {command} failed: {stderr}")]
    CommandError { command: String, stderr: String },

    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    #[error("File '{path}' not found on branch '{branch}'")]
    FileNotFound { branch: String, path: String },

    #[error("{0}: {1}")]
    WithContext(String, Box<GitError>),
}

impl GitError {
    /// Add context to an error
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        GitError::WithContext(context.into(), Box::new(self))
    }

    /// Get a user-friendly message for command line display
    pub fn user_message(&self) -> String {
        match self {
            GitError::Git2Error(e) => {
                // git2 appends "; class=..; code=.." which is noise on a terminal
                let msg = e.to_string();
                let main_msg = msg.split(';').next().unwrap_or(&msg).trim();
                format!("Git error: {}", main_msg)
            }
            GitError::IoError(e) => format!("I/O error: {}", e),
            GitError::BranchNotFound(branch) => format!("Branch '{}' not found", branch),
            GitError::RepositoryError(msg) => format!("Repository error: {}", msg),
            GitError::CommandError { command, stderr } => {
                format!("'git {}' failed: {}", command, stderr)
            }
            GitError::Utf8Error(e) => format!("File is not valid UTF-8: {}", e),
            GitError::FileNotFound { branch, path } => {
                format!("'{}' does not exist on branch '{}'", path, branch)
            }
            GitError::WithContext(ctx, err) => format!("{}: {}", ctx, err.user_message()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GitError>;
