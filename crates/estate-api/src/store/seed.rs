// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! YAML account seed files.
//!
//! ```yaml
//! users:
//!   - user_id: 1
//!     email: admin@estate.com
//!     full_name: Estate Admin
//!     role: Admin
//!     role_id: 1
//!     password_hash: "$argon2id$v=19$..."
//!   - user_id: 2
//!     email: resident@estate.com
//!     role_id: 2
//!     password: change-me
//! ```
//!
//! Keys are snake_case. A record carries either a `password_hash` (Argon2 PHC
//! string) or a plaintext `password`, which is hashed at load time. Hashes
//! from other schemes, such as bcrypt `$2b$` strings, are rejected: re-hash
//! those passwords with `estate hash-password`.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{hash_password, is_argon2_phc, Account, StoreError, STATUS_ACTIVE};

/// One account record as written in a seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedAccount {
    /// Numeric account id.
    pub user_id: i64,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// National identity number.
    #[serde(default)]
    pub national_id: Option<String>,
    /// Stored role name.
    #[serde(default)]
    pub role: Option<String>,
    /// Stored role id.
    #[serde(default)]
    pub role_id: Option<i32>,
    /// Account status. Defaults to "Active".
    #[serde(default)]
    pub status: Option<String>,
    /// Argon2 PHC string.
    #[serde(default)]
    pub password_hash: Option<String>,
    /// Plaintext password, hashed on load.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    users: Vec<SeedAccount>,
}

/// Parses seed records from YAML text.
pub fn parse_accounts(content: &str) -> Result<Vec<SeedAccount>, StoreError> {
    let file: SeedFile = parse_yaml(content).map_err(|e| StoreError::Parse(e.to_string()))?;
    Ok(file.users)
}

/// Reads a seed file and turns its records into accounts.
pub async fn load_accounts(path: impl AsRef<Path>) -> Result<Vec<Account>, StoreError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::Seed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let records = parse_accounts(&content).map_err(|e| StoreError::Seed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut accounts = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        accounts.push(into_account(index, record).await?);
    }

    tracing::info!(path = %path.display(), count = accounts.len(), "Loaded seed accounts");
    Ok(accounts)
}

async fn into_account(index: usize, record: SeedAccount) -> Result<Account, StoreError> {
    if record.email.trim().is_empty() {
        return Err(StoreError::InvalidRecord {
            index,
            message: "email is empty".to_string(),
        });
    }

    let password_hash = match (record.password_hash, record.password) {
        (Some(hash), _) if !hash.is_empty() => {
            if !is_argon2_phc(&hash) {
                return Err(StoreError::InvalidRecord {
                    index,
                    message: format!(
                        "{} has a password_hash that is not an Argon2 PHC string",
                        record.email
                    ),
                });
            }
            hash
        }
        (_, Some(plain)) if !plain.is_empty() => hash_password(plain).await?,
        _ => {
            return Err(StoreError::InvalidRecord {
                index,
                message: format!("{} has neither password nor password_hash", record.email),
            })
        }
    };

    Ok(Account {
        user_id: record.user_id,
        username: record.username,
        email: record.email,
        full_name: record.full_name,
        phone: record.phone,
        national_id: record.national_id,
        role_name: record.role,
        role_id: record.role_id,
        status: record.status.unwrap_or_else(|| STATUS_ACTIVE.to_string()),
        password_hash,
    })
}

fn parse_yaml<T: DeserializeOwned>(content: &str) -> Result<T, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::auth::Role;
    use crate::store::verify_password_blocking;

    const SEED: &str = r#"
users:
  - user_id: 1
    email: admin@estate.com
    full_name: Estate Admin
    role: Admin
    role_id: 1
    password: admin-pass
  - user_id: 2
    email: resident@estate.com
    role_id: 2
    national_id: "30111222"
    password: resident-pass
    status: Pending
"#;

    #[test]
    fn test_parse_accounts() {
        let records = parse_accounts(SEED).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].role.as_deref(), Some("Admin"));
        assert_eq!(records[1].national_id.as_deref(), Some("30111222"));
        assert!(records[1].role.is_none());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(matches!(parse_accounts("users: [: :"), Err(StoreError::Parse(_))));
    }

    #[tokio::test]
    async fn test_load_accounts_hashes_plaintext() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let accounts = load_accounts(file.path()).await.unwrap();
        assert_eq!(accounts.len(), 2);

        let admin = &accounts[0];
        assert_eq!(admin.role(), Role::Admin);
        assert!(admin.is_active());
        assert!(verify_password_blocking("admin-pass", &admin.password_hash));

        let resident = &accounts[1];
        assert_eq!(resident.role(), Role::Resident);
        assert!(!resident.is_active());
    }

    #[tokio::test]
    async fn test_record_without_password_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"users:\n  - user_id: 9\n    email: x@estate.com\n").unwrap();

        let err = load_accounts(file.path()).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { index: 0, .. }));
    }

    #[tokio::test]
    async fn test_bcrypt_hash_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
users:
  - user_id: 1
    email: ok@estate.com
    password: fine
  - user_id: 2
    email: migrated@estate.com
    password_hash: "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy"
"#,
        )
        .unwrap();

        let err = load_accounts(file.path()).await.unwrap_err();
        match err {
            StoreError::InvalidRecord { index, message } => {
                assert_eq!(index, 1);
                assert!(message.contains("migrated@estate.com"), "{message}");
                assert!(message.contains("Argon2"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_accounts("/nonexistent/estate-users.yaml").await.unwrap_err();
        assert!(matches!(err, StoreError::Seed { .. }));
    }
}
