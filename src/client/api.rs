use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, warn};

use super::error::{ClientError, Result};
use crate::{
    auth::{RegisterRequest, TokenResponse, UserPublic},
    movies::Movie,
    preferences::UserPreferences,
};

pub const BASE_URL_ENV: &str = "FLICKAI_API_BASE_URL";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api/v1";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into()))
    }
}

/// Recommendation payload; older servers sent a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecommendationBody {
    Wrapped { movies: Vec<Movie> },
    Bare(Vec<Movie>),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Stateless wrapper around the HTTP endpoints. Tokens are passed in by the caller.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(config.base_url));
        }

        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("flickai/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let url = self.url("/auth/token");
        debug!(url = %url, email = %email, "login");
        let res = self
            .http
            .post(&url)
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;
        json_or_error(res).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<UserPublic> {
        let url = self.url("/auth/register");
        debug!(url = %url, email = %req.email, "register");
        let res = self.http.post(&url).json(req).send().await?;
        json_or_error(res).await
    }

    pub async fn current_user(&self, token: &str) -> Result<UserPublic> {
        let res = self
            .http
            .get(self.url("/users/me"))
            .bearer_auth(token)
            .send()
            .await?;
        json_or_error(res).await
    }

    pub async fn favorites(&self, token: &str) -> Result<Vec<i64>> {
        let res = self
            .http
            .get(self.url("/users/me/favorites"))
            .bearer_auth(token)
            .send()
            .await?;
        json_or_error(res).await
    }

    /// Returns the updated user when the server sends one back.
    pub async fn add_favorite(&self, token: &str, movie_id: i64) -> Result<Option<UserPublic>> {
        let res = self
            .http
            .post(self.url(&format!("/users/me/favorites/{}", movie_id)))
            .bearer_auth(token)
            .send()
            .await?;
        optional_json_or_error(res).await
    }

    pub async fn remove_favorite(&self, token: &str, movie_id: i64) -> Result<()> {
        let res = self
            .http
            .delete(self.url(&format!("/users/me/favorites/{}", movie_id)))
            .bearer_auth(token)
            .send()
            .await?;
        optional_json_or_error::<serde_json::Value>(res).await?;
        Ok(())
    }

    /// A response of unexpected shape is logged and yields no movies.
    pub async fn recommend(&self, prefs: &UserPreferences) -> Result<Vec<Movie>> {
        let url = self.url("/recommendations");
        debug!(url = %url, genres = ?prefs.genres, "requesting recommendations");
        let res = self.http.post(&url).json(prefs).send().await?;
        let res = check_status(res).await?;
        let bytes = res.bytes().await?;
        match serde_json::from_slice::<RecommendationBody>(&bytes) {
            Ok(RecommendationBody::Wrapped { movies }) | Ok(RecommendationBody::Bare(movies)) => {
                Ok(movies)
            }
            Err(e) => {
                warn!(error = %e, "recommendation response has no movies array");
                Ok(Vec::new())
            }
        }
    }
}

async fn check_status(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let text = res.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .map(|b| match b.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|| format!("Request failed with status: {}", status.as_u16()));

    if status == StatusCode::UNAUTHORIZED {
        warn!(detail = %detail, "unauthorized");
        return Err(ClientError::Unauthorized(detail));
    }
    Err(ClientError::Status {
        status: status.as_u16(),
        detail,
    })
}

async fn json_or_error<T: DeserializeOwned>(res: Response) -> Result<T> {
    let res = check_status(res).await?;
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

async fn optional_json_or_error<T: DeserializeOwned>(res: Response) -> Result<Option<T>> {
    let res = check_status(res).await?;
    if res.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let bytes = res.bytes().await?;
    if bytes.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| ClientError::MalformedResponse(e.to_string()))
}
