use axum::{extract::State, routing::post, Router};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthPayload, LoginRequest, RegisterRequest},
        service::AccountService,
    },
    error::AppError,
    response::ApiResponse,
    state::AppState,
    validation::ValidatedJson,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(accounts, payload))]
pub async fn register(
    State(accounts): State<AccountService>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<ApiResponse<AuthPayload>, AppError> {
    let out = accounts.register(payload).await?;
    Ok(ApiResponse::created("User registered successfully", out))
}

#[instrument(skip(accounts, payload))]
pub async fn login(
    State(accounts): State<AccountService>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<AuthPayload>, AppError> {
    let out = accounts.login(payload).await?;
    Ok(ApiResponse::ok("Login successful", out))
}
