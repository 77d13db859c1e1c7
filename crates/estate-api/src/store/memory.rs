// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory account store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Account, StoreError, UserStore};

/// Accounts held in memory, keyed by lowercased email.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a list of accounts.
    ///
    /// Fails on duplicate emails (case-insensitive) or duplicate ids.
    pub fn from_accounts(accounts: Vec<Account>) -> Result<Self, StoreError> {
        let mut by_email = HashMap::with_capacity(accounts.len());
        let mut ids = HashSet::with_capacity(accounts.len());

        for account in accounts {
            if !ids.insert(account.user_id) {
                return Err(StoreError::DuplicateId(account.user_id));
            }
            let key = email_key(&account.email);
            if by_email.contains_key(&key) {
                return Err(StoreError::DuplicateEmail(account.email));
            }
            by_email.insert(key, account);
        }

        Ok(Self {
            accounts: RwLock::new(by_email),
        })
    }

    /// Returns the number of accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Returns `true` if the store holds no accounts.
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(&email_key(email)).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        accounts.sort_by_key(|a| a.user_id);
        Ok(accounts)
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: i64, email: &str) -> Account {
        Account::new(id, email, "hash")
    }

    #[tokio::test]
    async fn test_find_by_email_ignores_case() {
        let store = InMemoryUserStore::from_accounts(vec![account(1, "Admin@Estate.com")]).unwrap();

        let found = store.find_by_email("admin@estate.com").await.unwrap();
        assert_eq!(found.map(|a| a.user_id), Some(1));

        let found = store.find_by_email(" ADMIN@ESTATE.COM ").await.unwrap();
        assert!(found.is_some());

        assert!(store.find_by_email("nobody@estate.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_ordered() {
        let store = InMemoryUserStore::from_accounts(vec![
            account(3, "c@estate.com"),
            account(1, "a@estate.com"),
            account(2, "b@estate.com"),
        ])
        .unwrap();

        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|a| a.user_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicates_rejected() {
        let dup_email = InMemoryUserStore::from_accounts(vec![
            account(1, "a@estate.com"),
            account(2, "A@estate.com"),
        ]);
        assert!(matches!(dup_email, Err(StoreError::DuplicateEmail(_))));

        let dup_id = InMemoryUserStore::from_accounts(vec![
            account(1, "a@estate.com"),
            account(1, "b@estate.com"),
        ]);
        assert!(matches!(dup_id, Err(StoreError::DuplicateId(1))));
    }

    #[tokio::test]
    async fn test_len() {
        assert!(InMemoryUserStore::new().is_empty().await);

        let store = InMemoryUserStore::from_accounts(vec![
            account(1, "a@estate.com"),
            account(2, "b@estate.com"),
        ])
        .unwrap();
        assert!(!store.is_empty().await);
        assert_eq!(store.len().await, 2);
    }
}
