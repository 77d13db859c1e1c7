// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role tags and identity normalization.
//!
//! Stored accounts carry free-form role names ("Admin", "SECURITY", ...) and a
//! numeric role id. Everything past the login boundary works with the closed
//! [`Role`] enum produced here.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::SubjectId;

// =============================================================================
// Role
// =============================================================================

/// Canonical role tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Estate administrator.
    Admin,
    /// Gate and visitor security staff.
    Security,
    /// Resident of the estate. Fallback for anything unrecognized.
    #[default]
    Resident,
}

impl Role {
    /// All roles, in privilege order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Security, Role::Resident];

    /// Returns the lowercase role tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Security => "security",
            Role::Resident => "resident",
        }
    }

    /// Strict parse, case-insensitive. Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "security" => Some(Role::Security),
            "resident" => Some(Role::Resident),
            _ => None,
        }
    }

    /// Stored numeric id for this role.
    pub fn id(&self) -> i32 {
        match self {
            Role::Admin => 1,
            Role::Resident => 2,
            Role::Security => 3,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// Unknown or null role strings decode as `Resident` instead of failing, so a
// token minted with an odd role name still yields a well-formed identity.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(normalize_role(raw.as_deref()))
    }
}

// =============================================================================
// Normalizer
// =============================================================================

/// Maps a raw role name to its canonical tag.
///
/// Lowercases the input. Empty, absent, or unrecognized names yield
/// [`Role::Resident`].
pub fn normalize_role(raw: Option<&str>) -> Role {
    raw.and_then(Role::parse).unwrap_or(Role::Resident)
}

/// Maps a stored numeric role id to its canonical tag.
///
/// Unknown ids yield [`Role::Resident`]. The id never decides an account's
/// role; it is only compared against the stored name.
pub fn role_from_id(role_id: Option<i32>) -> Role {
    match role_id {
        Some(1) => Role::Admin,
        Some(3) => Role::Security,
        _ => Role::Resident,
    }
}

/// Returns the resident identifier for an account.
///
/// Only resident accounts carry one; it is the account's own subject id.
pub fn derive_resident_id(role: Role, user_id: &SubjectId) -> Option<SubjectId> {
    match role {
        Role::Resident => Some(user_id.clone()),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
