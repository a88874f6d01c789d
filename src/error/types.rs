//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for svcupdate operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PublishError {
    /// Argument Error - wrong number or shape of command-line arguments
    #[error("Argument error: {message}")]
    Argument { message: String },

    /// Configuration Error - missing credentials or invalid publish profile
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Authentication Error - portal sign-in failed
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// Invalid Input Error - the map document could not be opened
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Draft Error - draft generation, parsing or serialization failed
    #[error("Draft error: {message}")]
    Draft { message: String },

    /// Analysis Error - the draft has structural errors
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    /// Staging Error - the draft could not be compiled into a service definition
    #[error("Staging error: {message}")]
    Staging { message: String },

    /// Upload Error - the service definition could not be uploaded
    #[error("Upload error: {message}")]
    Upload { message: String },

    /// Filesystem Error - file operation failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },
}

impl PublishError {
    /// Get the process exit code for this error
    ///
    /// Every failure of a run is reported the same way, so all kinds map to 1.
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Argument { .. }
            | Self::Configuration { .. }
            | Self::Authentication { .. }
            | Self::InvalidInput { .. }
            | Self::Draft { .. }
            | Self::Analysis { .. }
            | Self::Staging { .. }
            | Self::Upload { .. }
            | Self::Filesystem { .. } => 1,
        }
    }

    /// Create an argument error
    #[inline]
    pub fn argument<S: Into<String>>(message: S) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an authentication error
    #[inline]
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    #[inline]
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a draft error
    #[inline]
    pub fn draft<S: Into<String>>(message: S) -> Self {
        Self::Draft {
            message: message.into(),
        }
    }

    /// Create an analysis error
    #[inline]
    pub fn analysis<S: Into<String>>(message: S) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    /// Create a staging error
    #[inline]
    pub fn staging<S: Into<String>>(message: S) -> Self {
        Self::Staging {
            message: message.into(),
        }
    }

    /// Create an upload error
    #[inline]
    pub fn upload<S: Into<String>>(message: S) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }
}
