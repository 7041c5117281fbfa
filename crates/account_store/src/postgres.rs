//! PostgreSQL account store.
//!
//! Persisted layout: two related records per user (`user_accounts` and
//! `user_profiles`) plus a `user_roles` membership table, all keyed by the
//! provider's subject UUID. The primary key on `user_accounts.id` is the
//! enforcement point for the create-once guarantee consumed by `insert`.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use identity::{AvatarUrl, DisplayName, Email, Location, UserAccount, UserProfile, UserRole};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{AccountStore, StoreError, StoreResult};

type AccountRow = (Uuid, String, bool, DateTime<Utc>, DateTime<Utc>);
type ProfileRow = (
    String,
    Option<String>,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// PostgreSQL-backed account store.
#[derive(Clone)]
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    /// Creates a new store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Initializes the schema.
    pub async fn init(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_accounts (
                id UUID PRIMARY KEY,
                email VARCHAR(254) NOT NULL,
                active BOOLEAN NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_profiles (
                user_id UUID PRIMARY KEY REFERENCES user_accounts (id) ON DELETE CASCADE,
                display_name VARCHAR(100) NOT NULL,
                location VARCHAR(100),
                avatar_url VARCHAR(500),
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_roles (
                user_id UUID NOT NULL REFERENCES user_accounts (id) ON DELETE CASCADE,
                role VARCHAR(50) NOT NULL,
                PRIMARY KEY (user_id, role)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_user_accounts_email
            ON user_accounts (email)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn write_profile_and_roles(
        tx: &mut Transaction<'_, Postgres>,
        account: &UserAccount,
    ) -> StoreResult<()> {
        let profile = account.profile();
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, display_name, location, avatar_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                location = EXCLUDED.location,
                avatar_url = EXCLUDED.avatar_url,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(profile.user_id())
        .bind(profile.display_name().as_str())
        .bind(profile.location().map(|l| l.as_str()))
        .bind(profile.avatar_url().map(|u| u.as_str()))
        .bind(profile.created_at())
        .bind(profile.updated_at())
        .execute(&mut **tx)
        .await?;

        // Role sync is authoritative replacement, so rewrite the set.
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(account.id())
            .execute(&mut **tx)
            .await?;

        for role in account.roles() {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
                .bind(account.id())
                .bind(role.as_str())
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    async fn load(&self, row: AccountRow) -> StoreResult<UserAccount> {
        let (id, email, active, created_at, updated_at) = row;

        let profile_row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT display_name, location, avatar_url, created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let (display_name, location, avatar_url, profile_created, profile_updated) = profile_row
            .ok_or_else(|| StoreError::Other(format!("Account {id} has no profile row")))?;

        let role_rows: Vec<(String,)> =
            sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        let roles: HashSet<UserRole> = role_rows
            .iter()
            .map(|(name,)| UserRole::from_claim(name))
            .collect();

        let profile = UserProfile::from_parts(
            id,
            DisplayName::new(display_name).map_err(|e| StoreError::Other(e.to_string()))?,
            location
                .map(Location::new)
                .transpose()
                .map_err(|e| StoreError::Other(e.to_string()))?,
            avatar_url
                .map(AvatarUrl::new)
                .transpose()
                .map_err(|e| StoreError::Other(e.to_string()))?,
            profile_created,
            profile_updated,
        );

        Ok(UserAccount::from_parts(
            id,
            Email::new(email).map_err(|e| StoreError::Other(e.to_string()))?,
            profile,
            roles,
            active,
            created_at,
            updated_at,
        ))
    }

    async fn load_optional(&self, row: Option<AccountRow>) -> StoreResult<Option<UserAccount>> {
        match row {
            Some(row) => Ok(Some(self.load(row).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn insert(&self, account: UserAccount) -> StoreResult<UserAccount> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO user_accounts (id, email, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(account.id())
        .bind(account.email().as_str())
        .bind(account.is_active())
        .bind(account.created_at())
        .bind(account.updated_at())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // A concurrent synchronization won the race for this id.
            return Err(StoreError::already_exists(account.id().to_string()));
        }

        Self::write_profile_and_roles(&mut tx, &account).await?;
        tx.commit().await?;

        Ok(account)
    }

    async fn save(&self, account: UserAccount) -> StoreResult<UserAccount> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO user_accounts (id, email, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                active = EXCLUDED.active,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(account.id())
        .bind(account.email().as_str())
        .bind(account.is_active())
        .bind(account.created_at())
        .bind(account.updated_at())
        .execute(&mut *tx)
        .await?;

        Self::write_profile_and_roles(&mut tx, &account).await?;
        tx.commit().await?;

        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserAccount>> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, active, created_at, updated_at
            FROM user_accounts
            WHERE id = $1 AND active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.load_optional(row).await
    }

    async fn find_by_id_any(&self, id: Uuid) -> StoreResult<Option<UserAccount>> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, active, created_at, updated_at
            FROM user_accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.load_optional(row).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, active, created_at, updated_at
            FROM user_accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        self.load_optional(row).await
    }

    async fn count_active(&self) -> StoreResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_accounts WHERE active = TRUE")
                .fetch_one(&self.pool)
                .await?;
        Ok(count as u64)
    }
}
