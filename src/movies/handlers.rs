use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{model::Movie, services};
use crate::{
    error::{ApiError, ApiResult},
    preferences::UserPreferences,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub movies: Vec<Movie>,
}

pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", post(recommendations))
        .route("/movies", get(list_movies))
        .route("/movies/:movie_id", get(get_movie))
}

#[instrument(skip(state, prefs), fields(genres = ?prefs.genres, language = %prefs.language, duration = prefs.duration))]
pub async fn recommendations(
    State(state): State<AppState>,
    Json(prefs): Json<UserPreferences>,
) -> ApiResult<Json<RecommendationResponse>> {
    let rec = services::recommend(state.movies.as_ref(), &prefs).await?;
    Ok(Json(RecommendationResponse { movies: rec.movies }))
}

#[instrument(skip(state))]
pub async fn list_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<Movie>>> {
    Ok(Json(state.movies.list_all().await?))
}

#[instrument(skip(state))]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> ApiResult<Json<Movie>> {
    state
        .movies
        .get(movie_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Movie with ID {} not found.", movie_id)))
}
