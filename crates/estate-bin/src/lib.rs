// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # estate-bin
//!
//! CLI binary for the estate access service.
//!
//! - CLI argument parsing with clap, with environment variable fallbacks
//! - Service runtime orchestration and graceful shutdown
//! - Logging initialization
//! - Commands: `serve`, `validate`, `hash-password`
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! JWT_SECRET=change-me estate --users-file users.yaml
//!
//! # Check a seed file
//! estate validate -u users.yaml
//!
//! # Hash a password for a seed file
//! estate hash-password 'correct horse'
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{RuntimeBuilder, ServiceRuntime};
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
