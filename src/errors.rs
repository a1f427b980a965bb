use thiserror::Error;

/// Failures reported by the customer backend client.
///
/// Lookups by id do not distinguish "not found" from transport failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Failed to fetch customers")]
    ListFailed,
    #[error("Failed to fetch customer with ID {id}")]
    FetchFailed { id: String },
    #[error("Failed to create customer {status_text}")]
    CreateFailed { status_text: String },
    #[error("Invalid API base URL `{0}`")]
    InvalidBaseUrl(String),
    #[error("Unable to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Errors raised by the wizard state machine.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("`{action}` is not available on the {step} step")]
    UnexpectedStep {
        action: &'static str,
        step: &'static str,
    },
    #[error("Customer record is incomplete: `{0}` is missing")]
    IncompleteRecord(&'static str),
    #[error(transparent)]
    Submission(#[from] ApiError),
}

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unable to determine a configuration directory")]
    NoConfigDir,
    #[error("Unknown configuration key `{0}`")]
    UnknownKey(String),
    #[error("Invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },
}
