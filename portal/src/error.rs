use thiserror::Error;

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

/// Errors raised while talking to the mod portal
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Portal responded with status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Missing API key: environment variable '{0}' is not set")]
    MissingApiKey(String),

    #[error("Unexpected portal response: {0}")]
    InvalidResponse(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<PortalError>),
}

impl PortalError {
    /// Create a remote error from a status code and response body
    pub fn remote<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Add context to an error
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        PortalError::WithContext(context.into(), Box::new(self))
    }

    /// Get a user-friendly message for command line display
    pub fn user_message(&self) -> String {
        match self {
            PortalError::Io(e) => format!("I/O error: {}", e),
            PortalError::Http(e) => format!("Could not reach the mod portal: {}", e),
            PortalError::Remote { status, body } => {
                format!("Mod portal rejected the request ({}): {}", status, body.trim())
            }
            PortalError::MissingApiKey(var) => {
                format!("Set the '{}' environment variable to an API key", var)
            }
            PortalError::InvalidResponse(msg) => format!("Unexpected portal response: {}", msg),
            PortalError::WithContext(ctx, err) => format!("{}: {}", ctx, err.user_message()),
        }
    }
}
