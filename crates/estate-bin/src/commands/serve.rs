// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `serve` command.

use tracing::info;

use crate::cli::Cli;
use crate::error::BinResult;
use crate::runtime::RuntimeBuilder;

/// Executes the `serve` command to start the service.
pub async fn serve(cli: &Cli) -> BinResult<()> {
    info!("Starting estate access service...");

    let runtime = RuntimeBuilder::new().server_args(&cli.server).build()?;

    runtime.run().await
}
