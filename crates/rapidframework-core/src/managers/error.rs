//! Error types for package-manager resolution and invocation

use std::fmt;
use thiserror::Error;

/// Errors surfaced by the registry and the installer
///
/// Installer detection failures never show up here: they are recovered
/// inside the detector and resolve to the default manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// The bundled registry resource is not shipped with this build
    #[error("Configuration file '{0}' not found")]
    ResourceNotFound(String),

    /// The registry resource exists but does not match the expected shape
    #[error("Invalid package manager configuration '{resource}': {reason}")]
    SchemaError { resource: String, reason: String },

    /// The active manager has no entry in the registry
    #[error("Package manager '{0}' not found in configuration")]
    UnknownManager(String),

    /// The package-manager subprocess failed and the policy is to abort
    #[error(transparent)]
    Subprocess(#[from] SubprocessFailure),
}

/// How a package-manager invocation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The process could not be started (binary missing, permissions, ...)
    Spawn(String),
    /// The process ran and exited unsuccessfully; `None` when killed by a signal
    Exit(Option<i32>),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Spawn(reason) => write!(f, "could not be started: {}", reason),
            FailureKind::Exit(Some(code)) => write!(f, "exited with status {}", code),
            FailureKind::Exit(None) => write!(f, "was terminated by a signal"),
        }
    }
}

/// A failed package-manager invocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{command}` {kind}")]
pub struct SubprocessFailure {
    /// The command line that was run, space separated
    pub command: String,
    pub kind: FailureKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subprocess_failure_message() {
        let failure = SubprocessFailure {
            command: "uv add requests".to_string(),
            kind: FailureKind::Exit(Some(2)),
        };
        assert_eq!(failure.to_string(), "`uv add requests` exited with status 2");

        let err: ManagerError = failure.into();
        assert!(err.to_string().contains("exited with status 2"));
    }

    #[test]
    fn test_spawn_failure_message() {
        let kind = FailureKind::Spawn("No such file or directory".to_string());
        assert_eq!(
            kind.to_string(),
            "could not be started: No such file or directory"
        );
    }
}
