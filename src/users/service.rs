use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, warn};
use uuid::Uuid;

use super::repo::AccountStore;
use super::repo_types::{ProfileChanges, PublicUser};
use crate::error::AppError;
use crate::state::AppState;

/// Profile reads and updates for already-authenticated callers.
#[derive(Clone)]
pub struct UserService {
    accounts: Arc<dyn AccountStore>,
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.accounts.clone())
    }
}

impl UserService {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    pub async fn profile(&self, id: Uuid) -> Result<PublicUser, AppError> {
        self.accounts.find_by_id(id).await?.ok_or_else(|| {
            warn!(user_id = %id, "profile vanished");
            AppError::NotFound
        })
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<PublicUser, AppError> {
        let user = self
            .accounts
            .update_profile(id, changes)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %id, "profile vanished before update");
                AppError::NotFound
            })?;
        info!(user_id = %id, "profile updated");
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<PublicUser>, AppError> {
        Ok(self.accounts.list().await?)
    }
}
