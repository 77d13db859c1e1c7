// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token authentication middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{IdentityContext, TokenCodec};
use crate::error::AuthError;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for bearer token authentication.
///
/// On success the verified [`IdentityContext`] is stored in the request
/// extensions. Failures answer 401 without calling the inner service.
/// Pre-flight `OPTIONS` requests pass through untouched.
#[derive(Clone)]
pub struct AuthLayer {
    codec: Arc<TokenCodec>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            codec: self.codec.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for bearer token authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    codec: Arc<TokenCodec>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let codec = self.codec.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match authenticate(&codec, &req) {
                Ok(Some(ctx)) => {
                    tracing::debug!(
                        request_id = %ctx.request_id,
                        user_id = %ctx.user_id,
                        role = %ctx.role,
                        "Request authenticated"
                    );
                    req.extensions_mut().insert(ctx);
                    inner.call(req).await
                }
                Ok(None) => inner.call(req).await,
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}

// =============================================================================
// Authentication
// =============================================================================

/// Runs the authentication decision for one request.
///
/// Returns `Ok(None)` for pre-flight requests, the identity context for a
/// valid token, and the rejection reason otherwise.
pub fn authenticate<B>(
    codec: &TokenCodec,
    req: &Request<B>,
) -> Result<Option<IdentityContext>, AuthError> {
    if req.method() == Method::OPTIONS {
        return Ok(None);
    }

    let Some(token) = extract_bearer_token(req) else {
        tracing::debug!(path = %req.uri().path(), "No bearer token provided");
        return Err(AuthError::NoToken);
    };

    match codec.verify(token) {
        Ok(claims) => Ok(Some(IdentityContext::from_claims(&claims))),
        Err(e) => {
            tracing::debug!(
                path = %req.uri().path(),
                kind = e.kind(),
                error = %e,
                "Token verification failed"
            );
            Err(AuthError::InvalidToken(e))
        }
    }
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::{HeaderValue, StatusCode};
    use chrono::Duration;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::{IdentityClaims, JwtConfig, ManualClock, Role, TokenError};

    fn codec() -> (Arc<TokenCodec>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = TokenCodec::new(&JwtConfig::new("middleware-secret"), clock.clone()).unwrap();
        (Arc::new(codec), clock)
    }

    fn request(method: Method, auth: Option<&str>) -> Request<Body> {
        let mut req = Request::builder()
            .method(method)
            .uri("/api/auth/me")
            .body(Body::empty())
            .unwrap();
        if let Some(value) = auth {
            req.headers_mut()
                .insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        req
    }

    /// Inner service that counts calls and reports whether a context was attached.
    fn counting_service(
        calls: Arc<AtomicUsize>,
    ) -> impl Service<
        Request<Body>,
        Response = Response,
        Error = Infallible,
        Future = impl Future<Output = Result<Response, Infallible>> + Send,
    > + Clone
           + Send {
        tower::service_fn(move |req: Request<Body>| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let body = match req.extensions().get::<IdentityContext>() {
                    Some(ctx) => ctx.role.to_string(),
                    None => "anonymous".to_string(),
                };
                Ok::<_, Infallible>(Response::new(Body::from(body)))
            }
        })
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        assert!(extract_bearer_token(&request(Method::GET, None)).is_none());
        assert!(extract_bearer_token(&request(Method::GET, Some("Basic abc"))).is_none());
        assert!(extract_bearer_token(&request(Method::GET, Some("bearer abc"))).is_none());
        assert!(extract_bearer_token(&request(Method::GET, Some("Bearer    "))).is_none());
        assert_eq!(
            extract_bearer_token(&request(Method::GET, Some("Bearer mytoken123"))),
            Some("mytoken123")
        );
    }

    #[test]
    fn test_authenticate_outcomes() {
        let (codec, clock) = codec();
        let token = codec.issue(&IdentityClaims::new(4, Role::Security)).unwrap();
        let header = format!("Bearer {}", token);

        assert!(matches!(authenticate(&codec, &request(Method::OPTIONS, None)), Ok(None)));
        assert!(matches!(authenticate(&codec, &request(Method::GET, None)), Err(AuthError::NoToken)));

        let ctx = authenticate(&codec, &request(Method::GET, Some(&header))).unwrap().unwrap();
        assert_eq!(ctx.role, Role::Security);

        clock.advance(Duration::days(15));
        assert!(matches!(
            authenticate(&codec, &request(Method::GET, Some(&header))),
            Err(AuthError::InvalidToken(TokenError::Expired))
        ));
    }

    #[tokio::test]
    async fn test_missing_token_rejected_without_calling_handler() {
        let (codec, _) = codec();
        let calls = Arc::new(AtomicUsize::new(0));
        let service = AuthLayer::new(codec).layer(counting_service(calls.clone()));

        let response = service.oneshot(request(Method::GET, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let (codec, _) = codec();
        let calls = Arc::new(AtomicUsize::new(0));
        let service = AuthLayer::new(codec).layer(counting_service(calls.clone()));

        let response = service
            .oneshot(request(Method::GET, Some("Bearer not.a.jwt")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_token_attaches_context() {
        let (codec, _) = codec();
        let token = codec.issue(&IdentityClaims::new(1, Role::Admin)).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let service = AuthLayer::new(codec).layer(counting_service(calls.clone()));

        let response = service
            .oneshot(request(Method::GET, Some(&format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "admin");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_options_passes_without_context() {
        let (codec, _) = codec();
        let calls = Arc::new(AtomicUsize::new(0));
        let service = AuthLayer::new(codec).layer(counting_service(calls.clone()));

        let response = service.oneshot(request(Method::OPTIONS, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
