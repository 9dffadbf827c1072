use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use lazy_static::lazy_static;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{AuthPayload, LoginRequest, RegisterRequest};
use super::jwt::TokenService;
use super::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::state::AppState;
use crate::users::repo::{AccountStore, StoreError};
use crate::users::repo_types::NewAccount;

lazy_static! {
    // Verified against when the email is unknown, so both login failures
    // cost one Argon2 verification.
    static ref DUMMY_HASH: Option<String> = hash_password("dummy-password-0").ok();
}

/// Registration and login.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
}

impl FromRef<AppState> for AccountService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.accounts.clone(), state.tokens.clone())
    }
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>, tokens: Arc<TokenService>) -> Self {
        Self { accounts, tokens }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthPayload, AppError> {
        // Fast path; the unique constraint below is what actually decides.
        if self.accounts.email_exists(&req.email).await? {
            warn!(email = %req.email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_blocking(req.password).await?;

        let account = NewAccount {
            id: Uuid::new_v4(),
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash,
        };
        let user = match self.accounts.create(account).await {
            Ok(u) => u,
            Err(StoreError::DuplicateEmail) => {
                warn!("email registered concurrently");
                return Err(AppError::DuplicateEmail);
            }
            Err(StoreError::Other(e)) => return Err(AppError::Internal(e)),
        };

        let token = self.tokens.issue(user.id)?;
        info!(user_id = %user.id, "user registered");
        Ok(AuthPayload { user, token })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthPayload, AppError> {
        let account = self.accounts.find_credentials_by_email(&req.email).await?;

        let stored = match &account {
            Some(a) => Some(a.password_hash.clone()),
            None => DUMMY_HASH.clone(),
        };
        let ok = match stored {
            Some(hash) => verify_blocking(req.password, hash).await?,
            None => false,
        };

        let account = match account {
            Some(a) if ok => a,
            Some(a) => {
                warn!(user_id = %a.id, "login invalid password");
                return Err(AppError::InvalidCredentials);
            }
            None => {
                warn!("login unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(account.id)?;
        info!(user_id = %account.id, "user logged in");
        Ok(AuthPayload {
            user: account.into_public(),
            token,
        })
    }
}

async fn hash_blocking(secret: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&secret))
        .await
        .context("hash task panicked")?
}

async fn verify_blocking(secret: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&secret, &hash))
        .await
        .context("verify task panicked")
}
