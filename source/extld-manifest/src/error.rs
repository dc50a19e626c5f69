use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

/// The error kinds from the core's error-handling design: invalid argument,
/// unknown extension, ambiguous registration, build failure, sticky adaptive
/// build failure, adaptive-generation failure, and destroyed-director calls.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
pub enum ExtensionError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("no extension named '{name}' is registered{}", format_scan_errors(.scan_errors))]
    Unknown { name: String, scan_errors: Vec<String> },

    #[error("ambiguous registration: {message}")]
    Ambiguous { message: String },

    #[error("failed to build extension '{name}': {message}")]
    BuildFailure { name: String, message: String },

    #[error("adaptive instance build failed and will not be retried: {cause}")]
    AdaptiveBuildFailure {
        #[source]
        cause: Arc<ExtensionError>,
    },

    #[error("cannot generate adaptive dispatch for method '{method}'")]
    GeneratorFailure { method: String },

    #[error("the director has been destroyed")]
    Destroyed,

    #[error("no director in the ancestor chain resolves scope for this contract")]
    ScopeNotResolved,
}

fn format_scan_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!(" (scan errors: {})", errors.join("; "))
    }
}

impl ExtensionError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }

    pub fn unknown(name: impl Into<String>, scan_errors: Vec<String>) -> Self {
        Self::Unknown { name: name.into(), scan_errors }
    }

    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::Ambiguous { message: message.into() }
    }

    pub fn build_failure(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BuildFailure { name: name.into(), message: message.into() }
    }

    pub fn generator_failure(method: impl Into<String>) -> Self {
        Self::GeneratorFailure { method: method.into() }
    }

    pub fn sticky(cause: Arc<ExtensionError>) -> Self {
        Self::AdaptiveBuildFailure { cause }
    }
}
