//! Error kinds surfaced by every assistant operation.
//!
//! Nothing here is retried: each variant reaches the caller (and the CLI)
//! with a human-readable message.

/// Errors produced by the assistant library.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// A required argument was missing or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A credential or config file problem, detected before any remote call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The LLM call failed or returned content we could not use.
    #[error("remote service error ({service}): {message}")]
    RemoteService { service: String, message: String },

    /// No code template matches the requested app type / feature.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// The deployment platform rejected the push.
    #[error("deployment to {platform} failed: {message}")]
    Deployment { platform: String, message: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history store error: {0}")]
    History(String),
}

impl AssistantError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn remote(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteService {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn deployment(platform: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deployment {
            platform: platform.into(),
            message: message.into(),
        }
    }

    /// Stable short name of the error kind, used in logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Configuration(_) => "configuration",
            Self::RemoteService { .. } => "remote_service",
            Self::TemplateNotFound(_) => "template_not_found",
            Self::Deployment { .. } => "deployment",
            Self::Io(_) => "io",
            Self::History(_) => "history",
        }
    }

    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput(_) => 2,
            Self::Configuration(_) => 3,
            Self::RemoteService { .. } => 4,
            Self::TemplateNotFound(_) => 5,
            Self::Deployment { .. } => 6,
            Self::Io(_) | Self::History(_) => 1,
        }
    }
}

impl From<rusqlite::Error> for AssistantError {
    fn from(e: rusqlite::Error) -> Self {
        Self::History(e.to_string())
    }
}

pub type Result<T, E = AssistantError> = std::result::Result<T, E>;
