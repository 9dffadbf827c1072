//! In-process `AccountStore` used by the test suites. It enforces the same
//! unique-email constraint as the `users_email_key` index.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{AccountStore, StoreError};
use super::repo_types::{Account, NewAccount, ProfileChanges, PublicUser};

#[derive(Default)]
pub struct MemoryAccountStore {
    rows: Mutex<Vec<Account>>,
}

impl MemoryAccountStore {
    fn rows(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Vec<Account>>> {
        self.rows
            .lock()
            .map_err(|_| anyhow::anyhow!("account store poisoned"))
    }

    /// Removes an account; production has no delete path.
    pub fn remove(&self, id: Uuid) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.retain(|a| a.id != id);
        }
    }

    pub fn credential_of(&self, email: &str) -> Option<String> {
        let rows = self.rows.lock().ok()?;
        rows.iter()
            .find(|a| a.email == email)
            .map(|a| a.password_hash.clone())
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        Ok(self.rows()?.iter().any(|a| a.email == email))
    }

    async fn find_credentials_by_email(&self, email: &str) -> anyhow::Result<Option<Account>> {
        Ok(self.rows()?.iter().find(|a| a.email == email).cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<PublicUser, StoreError> {
        let mut rows = self.rows()?;
        if rows.iter().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let now = OffsetDateTime::now_utc();
        let row = Account {
            id: account.id,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row.into_public())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<PublicUser>> {
        Ok(self
            .rows()?
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .map(Account::into_public))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> anyhow::Result<Option<PublicUser>> {
        let mut rows = self.rows()?;
        let Some(row) = rows.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(first_name) = changes.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            row.last_name = last_name;
        }
        row.updated_at = row.updated_at.max(OffsetDateTime::now_utc());
        Ok(Some(row.clone().into_public()))
    }

    async fn list(&self) -> anyhow::Result<Vec<PublicUser>> {
        // Newest insert first among equal timestamps.
        let mut users: Vec<PublicUser> = self
            .rows()?
            .iter()
            .rev()
            .cloned()
            .map(Account::into_public)
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }
}
