//! Identity middleware.

use std::sync::Arc;

use align_store::{AlignStore, StoreError};
use auth::{AuthError, AuthResult, Claims};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use entities::User;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// The user a request acts as. Inserted into request extensions by
/// [`identity_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Builds a new user record from token claims.
fn user_from_claims(claims: Claims) -> AuthResult<User> {
    let user_id = claims.user_id()?;
    let mut user = User::new(claims.email).with_id(user_id);
    user.display_name = claims.name;
    user.first_name = claims.given_name;
    user.last_name = claims.family_name;
    user.profile_image_url = claims.picture;
    Ok(user)
}

/// Extracts the bearer token from the Authorization header.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Returns the user with `email`, creating it if needed.
pub async fn ensure_local_user<S: AlignStore>(store: &S, email: &str) -> ServerResult<User> {
    if let Some(user) = store.get_user_by_email(email).await? {
        return Ok(user);
    }

    match store.create_user(User::new(email).with_display_name("Local User")).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, email, "Created local user");
            Ok(user)
        }
        // Lost a race with a concurrent request.
        Err(StoreError::AlreadyExists { .. }) => store
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| ServerError::not_found("User")),
        Err(e) => Err(e.into()),
    }
}

/// Returns the user named by validated token claims, creating it the first
/// time the subject is seen.
pub async fn upsert_token_user<S: AlignStore>(store: &S, claims: Claims) -> ServerResult<User> {
    let candidate = user_from_claims(claims)?;
    if let Some(user) = store.get_user(candidate.id).await? {
        return Ok(user);
    }

    let user_id = candidate.id;
    match store.create_user(candidate).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Registered user from token");
            Ok(user)
        }
        Err(StoreError::AlreadyExists { .. }) => match store.get_user(user_id).await? {
            Some(user) => Ok(user),
            // The email belongs to a different subject.
            None => Err(ServerError::Conflict(
                "Email is already registered to another user".to_string(),
            )),
        },
        Err(e) => Err(e.into()),
    }
}

/// Resolves the caller and stores a [`CurrentUser`] in the request
/// extensions.
///
/// In single-user mode every request acts as the configured local user. In
/// multi-user mode a valid bearer token is required.
pub async fn identity_middleware<S: AlignStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> ServerResult<Response> {
    let user = if !state.auth_enabled() {
        ensure_local_user(&state.store, &state.config.local_user_email).await?
    } else {
        let jwt_manager = state.jwt_manager.as_ref().ok_or_else(|| {
            ServerError::Internal("JWT manager not configured but auth is enabled".to_string())
        })?;
        let token = extract_token(request.headers()).ok_or(AuthError::MissingToken)?;
        let claims = jwt_manager.validate_token(token)?;
        upsert_token_user(&state.store, claims).await?
    };

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
