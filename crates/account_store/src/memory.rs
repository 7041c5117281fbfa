//! In-memory account store for tests and single-node dev mode.

use std::collections::HashMap;

use async_trait::async_trait;
use identity::UserAccount;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{AccountStore, StoreError, StoreResult};

/// In-memory account store.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<Uuid, UserAccount>>,
}

impl MemoryAccountStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, account: UserAccount) -> StoreResult<UserAccount> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.id()) {
            return Err(StoreError::already_exists(account.id().to_string()));
        }
        accounts.insert(account.id(), account.clone());
        Ok(account)
    }

    async fn save(&self, account: UserAccount) -> StoreResult<UserAccount> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.id(), account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).filter(|a| a.is_active()).cloned())
    }

    async fn find_by_id_any(&self, id: Uuid) -> StoreResult<Option<UserAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.email().as_str() == email)
            .cloned())
    }

    async fn count_active(&self) -> StoreResult<u64> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().filter(|a| a.is_active()).count() as u64)
    }
}
