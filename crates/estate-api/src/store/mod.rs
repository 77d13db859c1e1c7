// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account storage used by the login handler.

mod account;
mod memory;
mod password;
mod seed;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use account::{Account, STATUS_ACTIVE};
pub use memory::InMemoryUserStore;
pub use password::{
    hash_password, hash_password_blocking, is_argon2_phc, verify_password,
    verify_password_blocking, verify_password_decoy,
};
pub use seed::{load_accounts, parse_accounts, SeedAccount};

// =============================================================================
// StoreError
// =============================================================================

/// Account store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Two accounts share an email.
    #[error("duplicate account email: {0}")]
    DuplicateEmail(String),

    /// Two accounts share an id.
    #[error("duplicate account id: {0}")]
    DuplicateId(i64),

    /// Seed file could not be read or parsed.
    #[error("failed to load accounts from {}: {}", .path.display(), .message)]
    Seed {
        /// Seed file path.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },

    /// Seed content is not valid YAML for an account list.
    #[error("failed to parse accounts: {0}")]
    Parse(String),

    /// A seed record is incomplete.
    #[error("invalid account record {index}: {message}")]
    InvalidRecord {
        /// Position in the seed list.
        index: usize,
        /// What is wrong.
        message: String,
    },

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

// =============================================================================
// UserStore
// =============================================================================

/// Read access to accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds an account by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Lists all accounts ordered by id.
    async fn list(&self) -> Result<Vec<Account>, StoreError>;
}
