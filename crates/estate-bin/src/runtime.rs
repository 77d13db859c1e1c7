// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Service runtime orchestration.
//!
//! Turns CLI settings into an [`ApiConfig`], loads the seed accounts, and runs
//! the [`ApiServer`] until the [`ShutdownCoordinator`] fires.

use std::sync::Arc;
use std::time::Duration;

use estate_api::auth::TokenCodec;
use estate_api::store::load_accounts;
use estate_api::{ApiConfig, ApiServer, InMemoryUserStore, JwtConfig};
use tracing::{info, warn};

use crate::cli::ServerArgs;
use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// ServiceRuntime
// =============================================================================

/// Owns the configuration and shutdown coordination of a running service.
pub struct ServiceRuntime {
    config: ApiConfig,
    shutdown: ShutdownCoordinator,
}

impl ServiceRuntime {
    /// Creates a new runtime.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Returns a handle to the shutdown coordinator.
    pub fn shutdown(&self) -> ShutdownCoordinator {
        self.shutdown.clone()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Loads accounts, starts the server and serves until shutdown.
    pub async fn run(self) -> BinResult<()> {
        info!("Starting estate access service v{}", estate_api::VERSION);

        let codec = TokenCodec::with_system_clock(&self.config.jwt)?;
        let users = load_user_store(&self.config).await?;
        let account_count = users.len().await;

        let server = ApiServer::builder()
            .config(self.config.clone())
            .codec(Arc::new(codec))
            .users(Arc::new(users))
            .build()?;

        info!(
            addr = %server.addr(),
            accounts = account_count,
            "Estate access service is ready"
        );

        let signals = self.shutdown.listen_for_signals();
        let result = server
            .run_with_shutdown(self.shutdown.shutdown_signal())
            .await;
        signals.abort();

        info!("Estate access service shutdown complete");
        result.map_err(BinError::from)
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the service runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config: Option<ApiConfig>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the configuration from command-line settings.
    pub fn server_args(mut self, args: &ServerArgs) -> Self {
        self.config = Some(api_config_from_args(args));
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<ServiceRuntime> {
        let config = self
            .config
            .ok_or_else(|| BinError::config("No configuration provided"))?;

        config
            .jwt
            .token_ttl()
            .map_err(|e| BinError::config(e.to_string()))?;

        Ok(ServiceRuntime::new(config))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Maps command-line settings onto an [`ApiConfig`].
pub fn api_config_from_args(args: &ServerArgs) -> ApiConfig {
    let jwt = JwtConfig {
        secret: args.jwt_secret.clone(),
        ..JwtConfig::default()
    }
    .with_require_secret(args.require_secret)
    .with_token_ttl_days(args.token_ttl_days);

    let mut config = ApiConfig::new()
        .with_host(args.host)
        .with_port(args.port)
        .with_jwt(jwt)
        .with_request_timeout(Duration::from_secs(args.request_timeout));

    if let Some(path) = &args.users_file {
        config = config.with_users_file(path);
    }

    config
}

/// Builds the in-memory account store from the configured seed file.
///
/// Without a seed file the store is empty and every login fails.
pub async fn load_user_store(config: &ApiConfig) -> BinResult<InMemoryUserStore> {
    let Some(path) = &config.users_file else {
        warn!("No users file configured, starting with an empty account store");
        return Ok(InMemoryUserStore::new());
    };

    let accounts = load_accounts(path)
        .await
        .map_err(|e| BinError::seed_file(path, e))?;
    InMemoryUserStore::from_accounts(accounts).map_err(|e| BinError::seed_file(path, e))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use clap::Parser;

    use estate_api::StoreError;

    use super::*;
    use crate::cli::Cli;

    const SEED: &str = r#"
users:
  - user_id: 1
    email: admin@estate.com
    role: Admin
    role_id: 1
    password: admin-pass
  - user_id: 2
    email: resident@estate.com
    role_id: 2
    password: resident-pass
"#;

    fn seed_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_config_from_args() {
        let cli = Cli::parse_from([
            "estate",
            "--host",
            "127.0.0.1",
            "--port",
            "7000",
            "--jwt-secret",
            "abc",
            "--token-ttl-days",
            "3",
            "--users-file",
            "users.yaml",
        ]);

        let config = api_config_from_args(&cli.server);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:7000");
        assert_eq!(config.jwt.secret.as_deref(), Some("abc"));
        assert_eq!(config.jwt.token_ttl_secs, 3 * 86_400);
        assert!(!config.jwt.require_secret);
        assert_eq!(config.users_file.as_deref(), Some(std::path::Path::new("users.yaml")));
    }

    #[test]
    fn test_builder_requires_config() {
        assert!(RuntimeBuilder::new().build().is_err());
    }

    #[test]
    fn test_builder_rejects_out_of_range_ttl() {
        for days in ["0", "3651", "100000000", "9223372036854775807"] {
            let cli = Cli::parse_from(["estate", "--token-ttl-days", days]);
            let err = RuntimeBuilder::new()
                .server_args(&cli.server)
                .build()
                .err()
                .unwrap();
            assert_eq!(err.exit_code(), 1, "{days}");
            assert!(err.to_string().contains("token lifetime"), "{days}: {err}");
        }

        let cli = Cli::parse_from(["estate", "--token-ttl-days", "3650"]);
        assert!(RuntimeBuilder::new().server_args(&cli.server).build().is_ok());
    }

    #[tokio::test]
    async fn test_load_user_store_from_seed() {
        let file = seed_file(SEED);
        let config = ApiConfig::new().with_users_file(file.path());

        let store = load_user_store(&config).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_load_user_store_without_file() {
        let store = load_user_store(&ApiConfig::new()).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_load_user_store_missing_file() {
        let config = ApiConfig::new().with_users_file("/nonexistent/users.yaml");
        let err = load_user_store(&config).await.unwrap_err();
        assert!(
            matches!(err, BinError::SeedFile { source: StoreError::Seed { .. }, .. }),
            "{err:?}"
        );
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("/nonexistent/users.yaml"));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let config = ApiConfig::new()
            .with_host("127.0.0.1".parse().unwrap())
            .with_port(0)
            .with_jwt(JwtConfig::new("runtime-test-secret"));
        let runtime = RuntimeBuilder::new().config(config).build().unwrap();

        runtime.shutdown().initiate_shutdown();

        tokio::time::timeout(Duration::from_secs(5), runtime.run())
            .await
            .expect("runtime should stop")
            .unwrap();
    }
}
