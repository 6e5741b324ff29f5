use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;

pub use dto::{RegisterRequest, TokenResponse, UserPublic};
pub use extractors::CurrentUser;
pub use repo::{DuplicateEmail, MemoryUserRepo, PgUserRepo, UserRepo};
pub use repo_types::User;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
