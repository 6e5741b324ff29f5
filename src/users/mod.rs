pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub use repo::{FavoriteRepo, MemoryFavoriteRepo, PgFavoriteRepo};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
