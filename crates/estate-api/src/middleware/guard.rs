// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role guard middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{IdentityContext, Role};
use crate::error::AuthError;

// =============================================================================
// RoleGuardLayer
// =============================================================================

/// Layer that admits only identities holding one of the allowed roles.
///
/// Must sit inside [`AuthLayer`](super::AuthLayer). Only the role in the
/// verified identity context is consulted.
#[derive(Clone)]
pub struct RoleGuardLayer {
    allowed: Arc<[Role]>,
}

impl RoleGuardLayer {
    /// Creates a guard from canonical roles.
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        let mut roles: Vec<Role> = Vec::new();
        for role in allowed {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        Self {
            allowed: roles.into(),
        }
    }

    /// Returns the allowed roles.
    pub fn allowed(&self) -> &[Role] {
        &self.allowed
    }
}

/// Guard admitting any of the named roles, compared case-insensitively.
///
/// Names that are not a known role are ignored and logged.
pub fn require_role<I, R>(allowed: I) -> RoleGuardLayer
where
    I: IntoIterator<Item = R>,
    R: AsRef<str>,
{
    let roles = allowed.into_iter().filter_map(|name| {
        let name = name.as_ref();
        let role = Role::parse(name);
        if role.is_none() {
            tracing::warn!(role = name, "Ignoring unknown role in guard definition");
        }
        role
    });
    RoleGuardLayer::new(roles)
}

/// Guard admitting administrators only.
pub fn require_admin() -> RoleGuardLayer {
    RoleGuardLayer::new([Role::Admin])
}

/// Guard admitting administrators and security staff.
pub fn require_admin_or_security() -> RoleGuardLayer {
    RoleGuardLayer::new([Role::Admin, Role::Security])
}

impl<S> Layer<S> for RoleGuardLayer {
    type Service = RoleGuard<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RoleGuard {
            inner,
            allowed: self.allowed.clone(),
        }
    }
}

// =============================================================================
// RoleGuard
// =============================================================================

/// Middleware enforcing a role set.
#[derive(Clone)]
pub struct RoleGuard<S> {
    inner: S,
    allowed: Arc<[Role]>,
}

impl<S> Service<Request<Body>> for RoleGuard<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let allowed = self.allowed.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match authorize(req.extensions().get::<IdentityContext>(), &allowed) {
                Ok(()) => inner.call(req).await,
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}

/// Decides whether `ctx` may continue past a guard allowing `allowed`.
pub fn authorize(ctx: Option<&IdentityContext>, allowed: &[Role]) -> Result<(), AuthError> {
    let Some(ctx) = ctx else {
        tracing::warn!(allowed = ?allowed, "No identity context, denying access");
        return Err(AuthError::MissingContext);
    };

    if ctx.has_any_role(allowed) {
        return Ok(());
    }

    tracing::warn!(
        request_id = %ctx.request_id,
        user_id = %ctx.user_id,
        role = %ctx.role,
        allowed = ?allowed,
        "Access denied"
    );
    Err(AuthError::InsufficientRole { role: ctx.role })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::{IdentityClaims, TokenClaims};

    fn context(role: Role) -> IdentityContext {
        IdentityContext::from_claims(&TokenClaims {
            identity: IdentityClaims::new(10, role),
            iat: 0,
            exp: i64::MAX / 2,
            jti: "guard".to_string(),
        })
    }

    fn request(ctx: Option<IdentityContext>) -> Request<Body> {
        let mut req = Request::builder().uri("/api/users").body(Body::empty()).unwrap();
        if let Some(ctx) = ctx {
            req.extensions_mut().insert(ctx);
        }
        req
    }

    fn counting_service(
        calls: Arc<AtomicUsize>,
    ) -> impl Service<
        Request<Body>,
        Response = Response,
        Error = Infallible,
        Future = impl Future<Output = Result<Response, Infallible>> + Send,
    > + Clone
           + Send {
        tower::service_fn(move |_req: Request<Body>| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(Response::new(Body::empty()))
            }
        })
    }

    #[test]
    fn test_require_role_parses_case_insensitively() {
        let guard = require_role(["Admin", "SECURITY", "janitor"]);
        assert_eq!(guard.allowed(), &[Role::Admin, Role::Security]);

        assert_eq!(require_admin().allowed(), &[Role::Admin]);
        assert_eq!(require_admin_or_security().allowed(), &[Role::Admin, Role::Security]);
    }

    #[test]
    fn test_authorize() {
        let allowed = [Role::Admin];
        assert!(authorize(Some(&context(Role::Admin)), &allowed).is_ok());
        assert!(matches!(
            authorize(Some(&context(Role::Resident)), &allowed),
            Err(AuthError::InsufficientRole { role: Role::Resident })
        ));
        assert!(matches!(authorize(None, &allowed), Err(AuthError::MissingContext)));
        assert!(authorize(Some(&context(Role::Admin)), &[]).is_err());
    }

    #[tokio::test]
    async fn test_admin_passes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = require_admin().layer(counting_service(calls.clone()));

        let response = service.oneshot(request(Some(context(Role::Admin)))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resident_denied() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = require_admin().layer(counting_service(calls.clone()));

        let response = service.oneshot(request(Some(context(Role::Resident)))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Access denied"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_context_denied() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = require_admin_or_security().layer(counting_service(calls.clone()));

        let response = service.oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_security_allowed_on_shared_route() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = require_admin_or_security().layer(counting_service(calls.clone()));

        let response = service.oneshot(request(Some(context(Role::Security)))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
