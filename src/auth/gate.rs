//! Authentication gate for protected routes.
//!
//! Clients send `Authorization: Bearer <token>`. The scheme is matched
//! case-insensitively and stripped; anything else counts as no token. Every
//! failure (no header, wrong scheme, bad/expired/malformed token, account
//! gone) ends in the same `Unauthenticated` response.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;
use crate::users::repo_types::PublicUser;

/// The resolved caller, stored in request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub PublicUser);

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves the request's token to a stored account.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<PublicUser, AppError> {
    let token = bearer_token(headers).ok_or_else(|| {
        debug!("no bearer token");
        AppError::Unauthenticated
    })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        debug!(reason = %e, "token rejected");
        AppError::Unauthenticated
    })?;

    match state.accounts.find_by_id(claims.sub).await? {
        Some(user) => Ok(user),
        None => {
            debug!(user_id = %claims.sub, "token subject has no account");
            Err(AppError::Unauthenticated)
        }
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
