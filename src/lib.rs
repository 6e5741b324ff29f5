pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod movies;
pub mod preferences;
pub mod questionnaire;
pub mod state;
pub mod users;
