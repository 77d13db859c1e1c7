// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built accounts, secrets and codecs. Every fixture account shares one
//! password so the Argon2 hash is computed once per test binary.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, TimeZone, Utc};
use estate_api::auth::{IdentityClaims, ManualClock, Role, TokenCodec};
use estate_api::store::hash_password_blocking;
use estate_api::{Account, InMemoryUserStore, JwtConfig};

/// Signing secret used by the harness.
pub const TEST_SECRET: &str = "estate-integration-test-secret";

/// Password of every fixture account.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// A fixed instant the manual clock starts from.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0)
        .single()
        .expect("valid fixture instant")
}

/// Argon2 hash of [`TEST_PASSWORD`], computed once.
pub fn test_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password_blocking(TEST_PASSWORD).expect("hash fixture password"))
}

// =============================================================================
// Account Fixtures
// =============================================================================

/// Fixture providing the standard seed accounts.
pub struct AccountFixtures;

impl AccountFixtures {
    /// Email of the admin account.
    pub const ADMIN_EMAIL: &'static str = "admin@estate.test";
    /// Email of the security account.
    pub const SECURITY_EMAIL: &'static str = "guard@estate.test";
    /// Email of the resident account.
    pub const RESIDENT_EMAIL: &'static str = "resident@estate.test";
    /// Email of the suspended account.
    pub const SUSPENDED_EMAIL: &'static str = "suspended@estate.test";
    /// Email of the account whose role name is not recognized.
    pub const LEGACY_EMAIL: &'static str = "legacy@estate.test";

    /// Admin account, stored with a capitalized role name.
    pub fn admin() -> Account {
        Account::new(1, Self::ADMIN_EMAIL, test_password_hash())
            .with_role_name("Admin")
            .with_role_id(1)
            .with_full_name("Estate Admin")
            .with_phone("0700000001")
            .with_national_id("NID-0001")
    }

    /// Security account, stored with a lowercase role name.
    pub fn security() -> Account {
        Account::new(7, Self::SECURITY_EMAIL, test_password_hash())
            .with_role_name("security")
            .with_role_id(3)
            .with_full_name("Gate Guard")
    }

    /// Resident account.
    pub fn resident() -> Account {
        Account::new(42, Self::RESIDENT_EMAIL, test_password_hash())
            .with_role_name("RESIDENT")
            .with_role_id(2)
            .with_full_name("Jane Resident")
            .with_phone("0700000042")
            .with_national_id("NID-0042")
    }

    /// Resident account that may not sign in.
    pub fn suspended() -> Account {
        Account::new(43, Self::SUSPENDED_EMAIL, test_password_hash())
            .with_role_id(2)
            .with_status("Suspended")
    }

    /// Account with an unrecognized role name next to the admin role id.
    pub fn legacy() -> Account {
        Account::new(50, Self::LEGACY_EMAIL, test_password_hash())
            .with_role_name("Caretaker")
            .with_role_id(1)
    }

    /// All fixture accounts.
    pub fn all() -> Vec<Account> {
        vec![
            Self::admin(),
            Self::security(),
            Self::resident(),
            Self::suspended(),
            Self::legacy(),
        ]
    }

    /// A store seeded with [`AccountFixtures::all`].
    pub fn store() -> InMemoryUserStore {
        InMemoryUserStore::from_accounts(Self::all()).expect("fixture accounts are unique")
    }
}

// =============================================================================
// Codec Fixtures
// =============================================================================

/// Fixture providing codecs bound to a controllable clock.
pub struct CodecFixtures;

impl CodecFixtures {
    /// Codec configuration with [`TEST_SECRET`].
    pub fn config() -> JwtConfig {
        JwtConfig::new(TEST_SECRET)
    }

    /// A manual clock starting at [`epoch`].
    pub fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(epoch()))
    }

    /// A codec reading time from `clock`.
    pub fn codec_with(config: &JwtConfig, clock: Arc<ManualClock>) -> TokenCodec {
        TokenCodec::new(config, clock).expect("codec from fixture config")
    }

    /// A codec with [`TEST_SECRET`] and its clock.
    pub fn codec() -> (TokenCodec, Arc<ManualClock>) {
        let clock = Self::clock();
        (Self::codec_with(&Self::config(), clock.clone()), clock)
    }

    /// Identity claims of a resident with every optional field filled.
    pub fn resident_claims() -> IdentityClaims {
        AccountFixtures::resident().identity_claims()
    }

    /// Identity claims for `role` with a string subject id.
    pub fn claims_with_text_subject(role: Role) -> IdentityClaims {
        IdentityClaims::new("ext-7781", role).with_email("ext@estate.test")
    }
}
