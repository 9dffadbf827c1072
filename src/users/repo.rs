use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Account, NewAccount, ProfileChanges, PublicUser};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Persistence for accounts. Uniqueness of `email` is enforced here, not by
/// callers.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;

    /// The one lookup that reads the credential column.
    async fn find_credentials_by_email(&self, email: &str) -> anyhow::Result<Option<Account>>;

    async fn create(&self, account: NewAccount) -> Result<PublicUser, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<PublicUser>>;

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> anyhow::Result<Option<PublicUser>>;

    /// All accounts, newest first.
    async fn list(&self) -> anyhow::Result<Vec<PublicUser>>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await
        .context("check email exists")?;
        Ok(exists)
    }

    async fn find_credentials_by_email(&self, email: &str) -> anyhow::Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, first_name, last_name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find account by email")?;
        Ok(account)
    }

    async fn create(&self, account: NewAccount) -> Result<PublicUser, StoreError> {
        let res = sqlx::query_as::<_, PublicUser>(
            r#"
            INSERT INTO users (id, email, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.password_hash)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateEmail),
            Err(e) => Err(anyhow::Error::new(e).context("insert account").into()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<PublicUser>> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, email, first_name, last_name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find account by id")?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> anyhow::Result<Option<PublicUser>> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            UPDATE users
               SET first_name = COALESCE($2, first_name),
                   last_name  = COALESCE($3, last_name),
                   updated_at = GREATEST(now(), updated_at)
             WHERE id = $1
            RETURNING id, email, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .fetch_optional(&self.db)
        .await
        .context("update profile")?;
        Ok(user)
    }

    async fn list(&self) -> anyhow::Result<Vec<PublicUser>> {
        let users = sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, email, first_name, last_name, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list accounts")?;
        Ok(users)
    }
}
