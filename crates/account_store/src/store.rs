//! Account store contract.

use async_trait::async_trait;
use identity::UserAccount;
use uuid::Uuid;

use crate::StoreResult;

/// Storage contract for the `UserAccount` aggregate.
///
/// Create-or-update semantics keyed by the aggregate id. One requirement
/// beyond plain CRUD: `insert` must be atomic per id, so that two
/// concurrent first-seen synchronizations for the same external id cannot
/// both succeed. The loser gets `StoreError::AlreadyExists`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Creates a new account. Fails with `AlreadyExists` on a duplicate id.
    async fn insert(&self, account: UserAccount) -> StoreResult<UserAccount>;

    /// Upserts an account keyed by id, returning the persisted aggregate.
    async fn save(&self, account: UserAccount) -> StoreResult<UserAccount>;

    /// Gets an active account by id.
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserAccount>>;

    /// Gets an account by id, including inactive accounts.
    async fn find_by_id_any(&self, id: Uuid) -> StoreResult<Option<UserAccount>>;

    /// Gets an account by email, including inactive accounts.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>>;

    /// Counts active accounts.
    async fn count_active(&self) -> StoreResult<u64>;
}
