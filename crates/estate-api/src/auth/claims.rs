// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity claims embedded in bearer tokens.
//!
//! Field names on the wire (`userId`, `ResidentID`, `NationalID`, ...) are the
//! ones the browser client already reads, so they are pinned with serde
//! renames rather than following Rust naming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::{derive_resident_id, Role};

// =============================================================================
// SubjectId
// =============================================================================

/// Account identifier. Numeric for database-backed accounts, textual otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectId {
    /// Numeric identifier.
    Int(i64),
    /// Opaque string identifier.
    Text(String),
}

impl From<i64> for SubjectId {
    fn from(id: i64) -> Self {
        SubjectId::Int(id)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        SubjectId::Text(id.to_string())
    }
}

impl From<String> for SubjectId {
    fn from(id: String) -> Self {
        SubjectId::Text(id)
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectId::Int(id) => write!(f, "{}", id),
            SubjectId::Text(id) => f.write_str(id),
        }
    }
}

// =============================================================================
// IdentityClaims
// =============================================================================

/// Identity minted at login and carried unchanged for the token's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Account identifier.
    #[serde(rename = "userId")]
    pub user_id: SubjectId,

    /// Resident identifier, present only for residents.
    #[serde(rename = "ResidentID", default)]
    pub resident_id: Option<SubjectId>,

    /// Normalized role tag.
    #[serde(default)]
    pub role: Role,

    /// Stored numeric role id.
    #[serde(rename = "roleId", default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i32>,

    /// Display name.
    #[serde(rename = "fullName", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// National identity number.
    #[serde(rename = "NationalID", default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
}

impl IdentityClaims {
    /// Creates claims for an account, deriving the resident id from the role.
    pub fn new(user_id: impl Into<SubjectId>, role: Role) -> Self {
        let user_id = user_id.into();
        let resident_id = derive_resident_id(role, &user_id);

        Self {
            user_id,
            resident_id,
            role,
            role_id: Some(role.id()),
            full_name: None,
            email: None,
            national_id: None,
        }
    }

    /// Sets the display name.
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the national id.
    pub fn with_national_id(mut self, national_id: impl Into<String>) -> Self {
        self.national_id = Some(national_id.into());
        self
    }
}

// =============================================================================
// TokenClaims
// =============================================================================

/// The signed token payload: identity plus envelope timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Identity carried by the token.
    #[serde(flatten)]
    pub identity: IdentityClaims,

    /// Issued at (Unix timestamp). Zero when the token omits it.
    #[serde(default)]
    pub iat: i64,

    /// Expiration (Unix timestamp).
    pub exp: i64,

    /// Token id. Empty when the token omits it.
    #[serde(default)]
    pub jti: String,
}

impl TokenClaims {
    /// Returns the issue time.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Returns the expiry time.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns `true` once `now` is past the expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

// =============================================================================
// Tests
// =============================================================================
