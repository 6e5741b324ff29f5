use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{RegisterRequest, TokenRequest, TokenResponse, UserPublic},
        jwt::JwtKeys,
        password::{hash_password, normalize_email, validate_registration, verify_password},
        repo::DuplicateEmail,
        repo_types::NewUser,
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/token", post(token))
}

fn duplicate_email() -> ApiError {
    ApiError::BadRequest("User with this email already exists".into())
}

fn bad_credentials() -> ApiError {
    ApiError::Unauthorized("Incorrect email or password".into())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserPublic>)> {
    payload.email = validate_registration(&payload.email, &payload.password).map_err(|e| {
        warn!(error = %e, "registration rejected");
        e
    })?;

    // Ensure email is not taken
    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(duplicate_email());
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal(e)
    })?;

    let full_name = payload
        .full_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let user = state
        .users
        .create(NewUser {
            email: payload.email,
            full_name,
            password_hash,
        })
        .await
        .map_err(|e| match e.downcast_ref::<DuplicateEmail>() {
            // lost a race with a concurrent registration
            Some(dup) => {
                warn!(email = %dup.0, "email already registered");
                duplicate_email()
            }
            None => ApiError::Internal(e),
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(UserPublic::new(user, Vec::new()))))
}

#[instrument(skip(state, form))]
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let email = normalize_email(&form.username);

    let user = match state.users.find_by_email(&email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(bad_credentials());
        }
    };

    if !user.is_active {
        warn!(user_id = %user.id, "login inactive user");
        return Err(bad_credentials());
    }

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(bad_credentials());
    }

    let access_token = JwtKeys::from_ref(&state).sign(user.id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Internal(e)
    })?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".into(),
    }))
}
