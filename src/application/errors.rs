//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Extension error: {0}")]
    Extension(#[from] HostError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors reported by the extension host when applying a lifecycle action.
///
/// `AlreadyLoaded` and `NotLoaded` are non-fatal state mismatches the
/// lifecycle manager resolves on its own; everything else is a per-unit
/// failure that ends up in the batch report.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("extension `{0}` is already loaded")]
    AlreadyLoaded(String),

    #[error("extension `{0}` is not loaded")]
    NotLoaded(String),

    #[error("no extension named `{0}` is registered")]
    Unknown(String),

    #[error("{0}")]
    Setup(SetupError),
}

impl HostError {
    /// User-facing `Kind: detail` text for a fatal host failure.
    ///
    /// Setup errors report their innermost cause; other variants report
    /// their own kind tag.
    pub fn failure_text(&self) -> String {
        match self {
            HostError::Setup(err) => err.innermost().to_string(),
            HostError::Unknown(_) => format!("ExtensionNotFound: {}", self),
            HostError::AlreadyLoaded(_) => format!("ExtensionAlreadyLoaded: {}", self),
            HostError::NotLoaded(_) => format!("ExtensionNotLoaded: {}", self),
        }
    }
}

/// Failure raised from an extension's setup or teardown hook.
///
/// `kind` is the class of failure ("ConfigError", "IoError", ...) and
/// `cause` is the wrapped original error, when one exists.
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct SetupError {
    pub kind: String,
    pub message: String,
    pub cause: Option<Box<SetupError>>,
}

impl SetupError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: SetupError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Walk the cause chain down to the original error.
    pub fn innermost(&self) -> &SetupError {
        let mut err = self;
        while let Some(cause) = &err.cause {
            err = cause;
        }
        err
    }
}

/// Image pipeline errors
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("The given URL is invalid.")]
    InvalidUrl,

    #[error("The given URL ({url}) can't be accessed (status {status}).")]
    Unreachable { url: String, status: u16 },

    #[error("The given URL ({url}) leads to an invalid image.")]
    Undecodable { url: String },

    #[error("The provided data is not a valid SVG.")]
    InvalidSvg,

    #[error("'{0}' is not one of the supported formats (png, jpeg, webp).")]
    UnsupportedFormat(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
