// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the estate binary.

use std::path::{Path, PathBuf};

use estate_api::{StoreError, TokenError};
use thiserror::Error;

/// Result type alias for estate-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the estate binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A command needs a seed file and none was given.
    #[error("Configuration error: no users file given")]
    MissingUsersFile,

    /// Initialization error.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// Runtime error.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// API error.
    #[error("API error: {0}")]
    Api(#[from] estate_api::ApiError),

    /// The seed file could not be turned into an account store.
    #[error("Seed file {} rejected", .path.display())]
    SeedFile {
        /// Seed file path.
        path: PathBuf,
        /// What was wrong with it.
        #[source]
        source: StoreError,
    },

    /// Account store error outside seed loading.
    #[error("Account store error: {0}")]
    Store(#[from] StoreError),

    /// Token codec error.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Creates a runtime error.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Creates an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Attributes a store failure to the seed file it came from.
    pub fn seed_file(path: &Path, source: StoreError) -> Self {
        Self::SeedFile {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::MissingUsersFile => 1,
            Self::Initialization(_) => 2,
            Self::Runtime(_) => 3,
            Self::Io(_) => 4,
            Self::SeedFile { .. } | Self::Store(_) => 5,
            Self::Api(_) => 6,
            Self::Token(_) => 7,
        }
    }

    /// Suggests how to fix the error, when there is an obvious fix.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingUsersFile => Some("pass --users-file or set ESTATE_USERS_FILE"),
            Self::Token(TokenError::MissingSecret) => {
                Some("set JWT_SECRET or drop --require-secret")
            }
            Self::SeedFile { source, .. } => match source {
                StoreError::InvalidRecord { .. } => {
                    Some("generate password hashes with `estate hash-password`")
                }
                StoreError::DuplicateEmail(_) | StoreError::DuplicateId(_) => {
                    Some("every account needs its own email and user_id")
                }
                StoreError::Seed { .. } | StoreError::Parse(_) => {
                    Some("see demos/users.yaml for the expected layout")
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Renders an error, its cause chain and a hint, one line each.
pub fn render_error(error: &BinError) -> Vec<String> {
    let mut lines = vec![format!("Error: {}", error)];

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        lines.push(format!("  Caused by: {}", cause));
        source = cause.source();
    }

    if let Some(hint) = error.hint() {
        lines.push(format!("  Hint: {}", hint));
    }

    lines
}

/// Reports an error on stderr.
pub fn report_error(error: &BinError) {
    for line in render_error(error) {
        eprintln!("{}", line);
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BinError::config("test error");
        assert_eq!(err.to_string(), "Configuration error: test error");
        assert!(err.hint().is_none());
    }

    #[test]
    fn test_seed_file_error_names_path_and_cause() {
        let err = BinError::seed_file(
            Path::new("/srv/estate/users.yaml"),
            StoreError::DuplicateEmail("dup@estate.test".to_string()),
        );

        assert_eq!(err.exit_code(), 5);
        assert_eq!(
            render_error(&err),
            vec![
                "Error: Seed file /srv/estate/users.yaml rejected".to_string(),
                "  Caused by: duplicate account email: dup@estate.test".to_string(),
                "  Hint: every account needs its own email and user_id".to_string(),
            ]
        );
    }

    #[test]
    fn test_hints() {
        assert_eq!(
            BinError::MissingUsersFile.hint(),
            Some("pass --users-file or set ESTATE_USERS_FILE")
        );
        assert!(BinError::from(TokenError::MissingSecret)
            .hint()
            .is_some_and(|h| h.contains("JWT_SECRET")));
        assert!(BinError::from(TokenError::Expired).hint().is_none());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BinError::config("test").exit_code(), 1);
        assert_eq!(BinError::MissingUsersFile.exit_code(), 1);
        assert_eq!(BinError::init("test").exit_code(), 2);
        assert_eq!(BinError::runtime("test").exit_code(), 3);
        assert_eq!(BinError::io("test").exit_code(), 4);
        assert_eq!(
            BinError::from(StoreError::Hash("bad params".to_string())).exit_code(),
            5
        );
        assert_eq!(BinError::from(TokenError::MissingSecret).exit_code(), 7);
    }
}
