// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request identity context.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::claims::{SubjectId, TokenClaims};
use super::role::{derive_resident_id, Role};

/// Identity attached to a request after successful authentication.
///
/// Rebuilt from the verified token on every request and dropped when the
/// request completes. Handlers read it through the
/// [`CurrentIdentity`](crate::extractors::CurrentIdentity) extractor.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityContext {
    /// Request ID for tracing.
    #[serde(rename = "requestId")]
    pub request_id: Uuid,
    /// Account identifier.
    #[serde(rename = "userId")]
    pub user_id: SubjectId,
    /// Resident identifier, present only for residents.
    #[serde(rename = "ResidentID")]
    pub resident_id: Option<SubjectId>,
    /// Normalized role.
    pub role: Role,
    /// Stored numeric role id.
    #[serde(rename = "roleId")]
    pub role_id: Option<i32>,
    /// Display name.
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// National identity number.
    #[serde(rename = "NationalID")]
    pub national_id: Option<String>,
    /// Token expiry.
    #[serde(rename = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl IdentityContext {
    /// Projects verified token claims into a request context.
    pub fn from_claims(claims: &TokenClaims) -> Self {
        let identity = &claims.identity;
        // A resident token minted without ResidentID still gets one.
        let resident_id = derive_resident_id(identity.role, &identity.user_id);

        Self {
            request_id: Uuid::now_v7(),
            user_id: identity.user_id.clone(),
            resident_id,
            role: identity.role,
            role_id: identity.role_id,
            full_name: identity.full_name.clone(),
            email: identity.email.clone(),
            national_id: identity.national_id.clone(),
            expires_at: claims.expires_at(),
        }
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns `true` if the context has the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Returns `true` if the context has any of the given roles.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Returns `true` for administrators.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::IdentityClaims;

    fn token_claims(identity: IdentityClaims) -> TokenClaims {
        TokenClaims {
            identity,
            iat: 1_700_000_000,
            exp: 1_700_086_400,
            jti: "jti".to_string(),
        }
    }

    #[test]
    fn test_from_claims() {
        let claims = token_claims(IdentityClaims::new(3, Role::Security).with_email("gate@estate.com"));
        let ctx = IdentityContext::from_claims(&claims);

        assert_eq!(ctx.user_id, SubjectId::Int(3));
        assert_eq!(ctx.role, Role::Security);
        assert!(ctx.resident_id.is_none());
        assert_eq!(ctx.email.as_deref(), Some("gate@estate.com"));
        assert_eq!(ctx.expires_at.map(|t| t.timestamp()), Some(1_700_086_400));
    }

    #[test]
    fn test_resident_id_rederived() {
        let mut identity = IdentityClaims::new(8, Role::Resident);
        identity.resident_id = None;

        let ctx = IdentityContext::from_claims(&token_claims(identity));
        assert_eq!(ctx.resident_id, Some(SubjectId::Int(8)));
    }

    #[test]
    fn test_role_checks() {
        let ctx = IdentityContext::from_claims(&token_claims(IdentityClaims::new(1, Role::Admin)));

        assert!(ctx.is_admin());
        assert!(ctx.has_any_role(&[Role::Admin, Role::Security]));
        assert!(!ctx.has_any_role(&[Role::Resident]));
        assert!(!ctx.has_any_role(&[]));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let claims = token_claims(IdentityClaims::new(1, Role::Admin));
        let a = IdentityContext::from_claims(&claims);
        let b = IdentityContext::from_claims(&claims);
        assert_ne!(a.request_id, b.request_id);
    }
}
