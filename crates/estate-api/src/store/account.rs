// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Stored account records.

use serde::Serialize;

use crate::auth::{normalize_role, IdentityClaims, Role};

/// Status value of accounts allowed to sign in.
pub const STATUS_ACTIVE: &str = "Active";

/// An account as held by the user store.
///
/// Serializes with the field names the admin screens read. The password hash
/// is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Numeric account id.
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Email, unique per store.
    pub email: String,
    /// Display name.
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// National identity number.
    #[serde(rename = "NationalID")]
    pub national_id: Option<String>,
    /// Stored role name, free-form.
    #[serde(rename = "roleName")]
    pub role_name: Option<String>,
    /// Stored numeric role id.
    #[serde(rename = "roleId")]
    pub role_id: Option<i32>,
    /// Account status, e.g. "Active".
    pub status: String,
    /// Argon2 PHC string.
    #[serde(skip)]
    pub password_hash: String,
}

impl Account {
    /// Creates an active account with the given id, email and password hash.
    pub fn new(user_id: i64, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            user_id,
            username: None,
            email: email.into(),
            full_name: None,
            phone: None,
            national_id: None,
            role_name: None,
            role_id: None,
            status: STATUS_ACTIVE.to_string(),
            password_hash: password_hash.into(),
        }
    }

    /// Sets the stored role name.
    pub fn with_role_name(mut self, role: impl Into<String>) -> Self {
        self.role_name = Some(role.into());
        self
    }

    /// Sets the stored role id.
    pub fn with_role_id(mut self, role_id: i32) -> Self {
        self.role_id = Some(role_id);
        self
    }

    /// Sets the display name.
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Sets the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the national id.
    pub fn with_national_id(mut self, national_id: impl Into<String>) -> Self {
        self.national_id = Some(national_id.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Resolved canonical role.
    ///
    /// Only the stored name counts. A missing or unrecognized name resolves
    /// to resident whatever `role_id` says.
    pub fn role(&self) -> Role {
        normalize_role(self.role_name.as_deref())
    }

    /// Returns `true` if the account may sign in.
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_ACTIVE)
    }

    /// Builds the claims minted for this account at login.
    pub fn identity_claims(&self) -> IdentityClaims {
        let mut claims = IdentityClaims::new(self.user_id, self.role())
            .with_email(self.email.clone());
        claims.full_name = self.full_name.clone();
        claims.national_id = self.national_id.clone();
        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SubjectId;

    #[test]
    fn test_role_resolution() {
        let by_name = Account::new(1, "a@estate.com", "x").with_role_name("Admin");
        assert_eq!(by_name.role(), Role::Admin);

        let neither = Account::new(3, "r@estate.com", "x");
        assert_eq!(neither.role(), Role::Resident);
    }

    #[test]
    fn test_role_id_never_grants_a_role() {
        let unknown_name = Account::new(9, "su@estate.com", "x")
            .with_role_name("Superuser")
            .with_role_id(1);
        assert_eq!(unknown_name.role(), Role::Resident);

        let id_only = Account::new(10, "id@estate.com", "x").with_role_id(1);
        assert_eq!(id_only.role(), Role::Resident);

        let blank = Account::new(11, "blank@estate.com", "x")
            .with_role_name("  ")
            .with_role_id(3);
        assert_eq!(blank.role(), Role::Resident);

        let claims = unknown_name.identity_claims();
        assert_eq!(claims.role, Role::Resident);
        assert_eq!(claims.role_id, Some(2));
        assert_eq!(claims.resident_id, Some(SubjectId::Int(9)));
    }

    #[test]
    fn test_identity_claims() {
        let account = Account::new(17, "jane@estate.com", "x")
            .with_role_name("RESIDENT")
            .with_full_name("Jane")
            .with_national_id("12345678");

        let claims = account.identity_claims();
        assert_eq!(claims.user_id, SubjectId::Int(17));
        assert_eq!(claims.resident_id, Some(SubjectId::Int(17)));
        assert_eq!(claims.role, Role::Resident);
        assert_eq!(claims.role_id, Some(2));
        assert_eq!(claims.full_name.as_deref(), Some("Jane"));
        assert_eq!(claims.email.as_deref(), Some("jane@estate.com"));
    }

    #[test]
    fn test_status_and_serialization() {
        let account = Account::new(4, "x@estate.com", "secret-hash").with_status("Suspended");
        assert!(!account.is_active());
        assert!(Account::new(5, "y@estate.com", "h").with_status("active").is_active());

        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["userId"], 4);
        assert!(value.get("password_hash").is_none());
        assert!(!value.to_string().contains("secret-hash"));
    }
}
