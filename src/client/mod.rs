//! HTTP client for the FlickAI API, plus a login session on top of it.

pub mod api;
pub mod error;
pub mod session;

pub use api::{ApiClient, ClientConfig};
pub use error::{ClientError, Result};
pub use session::Session;
