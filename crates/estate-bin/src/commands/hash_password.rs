// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `hash-password` command.

use std::io::BufRead;

use crate::cli::HashPasswordArgs;
use crate::error::{BinError, BinResult};

/// Prints an Argon2 PHC string for the given password.
pub async fn hash_password(args: HashPasswordArgs) -> BinResult<()> {
    let password = read_password(&args)?;
    let hash = estate_api::store::hash_password(password).await?;
    println!("{}", hash);
    Ok(())
}

fn read_password(args: &HashPasswordArgs) -> BinResult<String> {
    let password = if args.stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_string()
    } else {
        args.password.clone().unwrap_or_default()
    };

    if password.is_empty() {
        return Err(BinError::config("password must not be empty"));
    }

    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_password_from_args() {
        let args = HashPasswordArgs {
            password: Some("hunter2".to_string()),
            stdin: false,
        };
        assert_eq!(read_password(&args).unwrap(), "hunter2");
    }

    #[test]
    fn test_empty_password_rejected() {
        let args = HashPasswordArgs {
            password: Some(String::new()),
            stdin: false,
        };
        assert_eq!(read_password(&args).unwrap_err().exit_code(), 1);
    }
}
