//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use profilekit_kube::KubeError;
use thiserror::Error;

use crate::exit_codes;

const DECODE_HELP: &str =
    "documents need apiVersion config.kio.kasten.io/v1alpha1, kind Profile and metadata.name";

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// The input document could not be decoded
    #[error("Invalid document: {message}")]
    #[diagnostic(code(profilekit::cli::decode))]
    Decode {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The named resource does not exist
    #[error("{message}")]
    #[diagnostic(
        code(profilekit::cli::not_found),
        help("list the namespace to see which profiles exist")
    )]
    NotFound { message: String },

    /// Create collided with an existing resource
    #[error("{message}")]
    #[diagnostic(
        code(profilekit::cli::already_exists),
        help("use `profilekit update` to replace an existing profile")
    )]
    AlreadyExists { message: String },

    /// Update lost an optimistic-concurrency race
    #[error("{message}")]
    #[diagnostic(
        code(profilekit::cli::conflict),
        help("re-run the command, or pass --conflict-retries to retry automatically")
    )]
    Conflict { message: String },

    /// Remote access failed
    #[error("{message}")]
    #[diagnostic(code(profilekit::cli::access))]
    Access {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A remote call exceeded its timeout
    #[error("{message}")]
    #[diagnostic(code(profilekit::cli::timeout), help("raise the limit with --timeout"))]
    Timeout { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(profilekit::cli::io))]
    Io { message: String },

    /// Bad flags or configuration
    #[error("{message}")]
    #[diagnostic(code(profilekit::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(profilekit::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Decode { .. } => exit_codes::DECODE_ERROR,
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AlreadyExists { .. } => exit_codes::ALREADY_EXISTS,
            CliError::Conflict { .. } => exit_codes::CONFLICT,
            CliError::Access { .. } => exit_codes::ACCESS_ERROR,
            CliError::Timeout { .. } => exit_codes::TIMEOUT,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Config { .. } => exit_codes::ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an IO error for a named input
    pub fn io_at(source: &str, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", source, err),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        let message = err.to_string();
        match err {
            KubeError::Decode(_) => CliError::Decode {
                message: message
                    .strip_prefix("invalid document: ")
                    .unwrap_or(&message)
                    .to_string(),
                help: Some(DECODE_HELP.to_string()),
            },
            KubeError::NamespaceMismatch { .. } => CliError::Decode {
                message,
                help: Some(
                    "drop metadata.namespace from the document or pass the matching -n"
                        .to_string(),
                ),
            },
            KubeError::NotFound { .. } => CliError::NotFound { message },
            KubeError::AlreadyExists { .. } => CliError::AlreadyExists { message },
            KubeError::Conflict { .. } => CliError::Conflict { message },
            KubeError::Timeout(_) => CliError::Timeout { message },
            KubeError::InvalidConfig(_) => CliError::Config {
                message,
                help: Some("check --kubeconfig, --context and the KUBECONFIG variable".to_string()),
            },
            _ => CliError::Access {
                message,
                help: None,
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
