pub mod filter;
pub mod handlers;
pub mod model;
pub mod repo;
pub mod seed;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use filter::MovieFilter;
pub use model::Movie;
pub use repo::{MemoryMovieRepo, MovieRepo, PgMovieRepo};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::movie_routes())
}
