// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use estate_api::auth::{role_from_id, Role};
use estate_api::store::{load_accounts, Account};
use estate_api::InMemoryUserStore;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Executes the `validate` command against the configured seed file.
pub async fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let path = cli
        .server
        .users_file
        .as_ref()
        .ok_or(BinError::MissingUsersFile)?;

    let accounts = load_accounts(path)
        .await
        .map_err(|e| BinError::seed_file(path, e))?;
    // Duplicate emails and ids are rejected here, exactly as at startup.
    InMemoryUserStore::from_accounts(accounts.clone()).map_err(|e| BinError::seed_file(path, e))?;

    let mut warnings = collect_warnings(&accounts);
    if cli.server.jwt_secret.as_deref().map_or(true, str::is_empty) {
        warnings.push("JWT_SECRET is not set, tokens would be signed with the fallback secret".to_string());
    }

    match args.format {
        OutputFormat::Text => {
            println!("✓ Users file is valid: {}", path.display());
            println!();
            println!("Accounts: {}", accounts.len());
            for account in &accounts {
                println!(
                    "  {:>4}  {:<32} {:<9} {}",
                    account.user_id,
                    account.email,
                    account.role(),
                    account.status
                );
            }

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }
        }
        OutputFormat::Json => {
            let rows: Vec<_> = accounts
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "userId": a.user_id,
                        "email": a.email,
                        "role": a.role(),
                        "status": a.status,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "valid": true,
                "users_file": path.display().to_string(),
                "accounts": rows,
                "warnings": warnings,
            });
            let rendered = serde_json::to_string_pretty(&output)
                .map_err(|e| BinError::runtime(format!("failed to render output: {}", e)))?;
            println!("{}", rendered);
        }
    }

    Ok(())
}

/// Flags records that load fine but probably do not behave as intended.
fn collect_warnings(accounts: &[Account]) -> Vec<String> {
    let mut warnings = Vec::new();

    for account in accounts {
        if !account.is_active() {
            warnings.push(format!(
                "{} has status {:?} and cannot sign in",
                account.email, account.status
            ));
        }

        if let Some(name) = account.role_name.as_deref() {
            if Role::parse(name).is_none() {
                warnings.push(format!(
                    "{} has unrecognized role {:?}, resolved to {}",
                    account.email,
                    name,
                    account.role()
                ));
            }
        }

        if let Some(role_id) = account.role_id {
            if role_from_id(Some(role_id)) != account.role() {
                warnings.push(format!(
                    "{} has role id {} which is ignored; the account resolves to {}",
                    account.email,
                    role_id,
                    account.role()
                ));
            }
        }
    }

    if !accounts.iter().any(|a| a.role() == Role::Admin) {
        warnings.push("no admin account is defined".to_string());
    }

    warnings
}
