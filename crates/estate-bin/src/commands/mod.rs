// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `serve`: start the HTTP server
//! - `validate`: check the account seed file
//! - `hash-password`: hash a password for a seed file

mod hash_password;
mod serve;
mod validate;

pub use hash_password::hash_password;
pub use serve::serve;
pub use validate::validate;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Serve => serve::serve(&cli).await,
        Commands::Validate(args) => validate::validate(&cli, args).await,
        Commands::HashPassword(args) => hash_password::hash_password(args).await,
    }
}
