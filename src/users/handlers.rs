use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{CurrentUser, UserPublic},
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me))
        .route("/users/me/favorites", get(list_favorites))
        .route(
            "/users/me/favorites/:movie_id",
            post(add_favorite).delete(remove_favorite),
        )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<UserPublic>> {
    let favorites = state.favorites.list(user.id).await?;
    Ok(Json(UserPublic::new(user, favorites)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_favorites(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<i64>>> {
    Ok(Json(state.favorites.list(user.id).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn add_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(movie_id): Path<i64>,
) -> ApiResult<Json<UserPublic>> {
    if state.movies.get(movie_id).await?.is_none() {
        warn!(movie_id, "favorite for unknown movie");
        return Err(ApiError::NotFound(format!(
            "Movie with ID {} not found.",
            movie_id
        )));
    }

    state.favorites.add(user.id, movie_id).await?;
    let favorites = state.favorites.list(user.id).await?;
    info!(movie_id, "favorite added");
    Ok(Json(UserPublic::new(user, favorites)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(movie_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.favorites.remove(user.id, movie_id).await?;
    info!(movie_id, "favorite removed");
    Ok(StatusCode::NO_CONTENT)
}
