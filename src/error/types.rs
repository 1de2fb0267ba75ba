//! Custom error types with exit codes

use thiserror::Error;

/// Error kinds raised while declaring or binding arguments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArgError {
    /// Definition Error - illegal argument ordering or command shape
    #[error("Definition error: {message}")]
    Definition { message: String },

    /// Invalid Choice Error - a token is not among the allowed values
    #[error(
        "Invalid choice '{value}' for {argument}, expected one of: {}",
        choices.join(", ")
    )]
    InvalidChoice {
        argument: String,
        value: String,
        choices: Vec<String>,
    },

    /// Missing Required Error - required arguments left without a value
    #[error("Missing required arguments: {}", arguments.join(", "))]
    MissingRequired { arguments: Vec<String> },

    /// Unexpected Arguments Error - more tokens than the arguments accept
    #[error("Unexpected arguments: {}", values.join(", "))]
    UnexpectedArguments { values: Vec<String> },
}

impl ArgError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Definition { .. } => 70,
            Self::InvalidChoice { .. }
            | Self::MissingRequired { .. }
            | Self::UnexpectedArguments { .. } => 2,
        }
    }

    /// Create a definition error
    #[inline]
    pub fn definition<S: Into<String>>(message: S) -> Self {
        Self::Definition {
            message: message.into(),
        }
    }

    /// Create an invalid choice error
    #[inline]
    pub fn invalid_choice<A, V>(argument: A, value: V, choices: Vec<String>) -> Self
    where
        A: Into<String>,
        V: Into<String>,
    {
        Self::InvalidChoice {
            argument: argument.into(),
            value: value.into(),
            choices,
        }
    }

    /// Create a missing required arguments error
    #[inline]
    #[must_use]
    pub const fn missing_required(arguments: Vec<String>) -> Self {
        Self::MissingRequired { arguments }
    }

    /// Create an unexpected arguments error
    #[inline]
    #[must_use]
    pub const fn unexpected_arguments(values: Vec<String>) -> Self {
        Self::UnexpectedArguments { values }
    }
}
