use axum::{
    extract::State,
    middleware,
    routing::get,
    Extension, Router,
};
use tracing::instrument;

use crate::{
    auth::gate::{require_auth, CurrentUser},
    error::AppError,
    response::ApiResponse,
    state::AppState,
    users::{dto::UpdateProfileRequest, repo_types::PublicUser, service::UserService},
    validation::ValidatedJson,
};

/// Every route here sits behind the authentication gate.
pub fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/profile", get(get_profile).put(update_profile))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[instrument(skip(users, user), fields(user_id = %user.id))]
pub async fn get_profile(
    State(users): State<UserService>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<ApiResponse<PublicUser>, AppError> {
    let profile = users.profile(user.id).await?;
    Ok(ApiResponse::ok("Profile retrieved", profile))
}

#[instrument(skip(users, user, payload), fields(user_id = %user.id))]
pub async fn update_profile(
    State(users): State<UserService>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> Result<ApiResponse<PublicUser>, AppError> {
    let updated = users.update_profile(user.id, payload.into()).await?;
    Ok(ApiResponse::ok("Profile updated successfully", updated))
}

#[instrument(skip(users, _user))]
pub async fn list_users(
    State(users): State<UserService>,
    Extension(_user): Extension<CurrentUser>,
) -> Result<ApiResponse<Vec<PublicUser>>, AppError> {
    let all = users.list().await?;
    Ok(ApiResponse::ok("Users retrieved", all))
}
