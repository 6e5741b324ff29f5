use tracing::{info, warn};

use super::api::ApiClient;
use super::error::{ClientError, Result};
use crate::auth::{RegisterRequest, UserPublic};

/// Client-side login state: token, profile and the favorite id set.
///
/// Any 401 from an authenticated call tears the session down.
pub struct Session {
    api: ApiClient,
    token: Option<String>,
    user: Option<UserPublic>,
    favorites: Vec<i64>,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            token: None,
            user: None,
            favorites: Vec::new(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserPublic> {
        self.user.as_ref()
    }

    pub fn favorites(&self) -> &[i64] {
        &self.favorites
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_favorite(&self, movie_id: i64) -> bool {
        self.favorites.contains(&movie_id)
    }

    /// Obtains a token, then loads the profile and favorites. A profile
    /// failure leaves the session logged out; a favorites failure only
    /// leaves the set empty.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&UserPublic> {
        self.logout();

        let token = self.api.login(email, password).await?;
        let user = match self.api.current_user(&token.access_token).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "failed to load profile after login");
                return Err(e);
            }
        };

        let favorites = match self.api.favorites(&token.access_token).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "failed to load favorites");
                Vec::new()
            }
        };

        info!(email = %user.email, favorites = favorites.len(), "logged in");
        self.token = Some(token.access_token);
        self.favorites = favorites;
        Ok(self.user.insert(user))
    }

    /// Creates the account; does not log in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<UserPublic> {
        let req = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.map(str::to_string),
        };
        self.api.register(&req).await
    }

    pub async fn add_favorite(&mut self, movie_id: i64) -> Result<()> {
        let token = self.token.clone().ok_or(ClientError::NotAuthenticated)?;
        match self.api.add_favorite(&token, movie_id).await {
            // the response body is ignored; the local set only tracks our own edits
            Ok(_) => {
                if !self.is_favorite(movie_id) {
                    self.favorites.push(movie_id);
                }
                if let Some(user) = self.user.as_mut() {
                    if !user.favorite_movie_ids.contains(&movie_id) {
                        user.favorite_movie_ids.push(movie_id);
                    }
                }
                Ok(())
            }
            Err(e) => Err(self.handle_error(e)),
        }
    }

    pub async fn remove_favorite(&mut self, movie_id: i64) -> Result<()> {
        let token = self.token.clone().ok_or(ClientError::NotAuthenticated)?;
        match self.api.remove_favorite(&token, movie_id).await {
            Ok(()) => {
                self.favorites.retain(|id| *id != movie_id);
                if let Some(user) = self.user.as_mut() {
                    user.favorite_movie_ids.retain(|id| *id != movie_id);
                }
                Ok(())
            }
            Err(e) => Err(self.handle_error(e)),
        }
    }

    /// Re-fetches the favorite set from the server.
    pub async fn refresh_favorites(&mut self) -> Result<&[i64]> {
        let token = self.token.clone().ok_or(ClientError::NotAuthenticated)?;
        match self.api.favorites(&token).await {
            Ok(ids) => {
                self.favorites = ids;
                Ok(&self.favorites)
            }
            Err(e) => Err(self.handle_error(e)),
        }
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.user = None;
        self.favorites.clear();
    }

    fn handle_error(&mut self, e: ClientError) -> ClientError {
        if e.is_unauthorized() {
            warn!("session rejected by server; logging out");
            self.logout();
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use serde_json::json;
    use wiremock::{
        matchers::{body_string_contains, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const USER_ID: &str = "5f1d7c3e-2b1a-4c55-9a57-0f3f3c9d2a11";

    fn user_json(favs: &[i64]) -> serde_json::Value {
        json!({
            "id": USER_ID,
            "email": "ana@example.com",
            "full_name": "Ana",
            "is_active": true,
            "favorite_movie_ids": favs,
        })
    }

    async fn mount_login(server: &MockServer, favs: &[i64]) {
        Mock::given(method("POST"))
            .and(path("/auth/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "access_token": "tok", "token_type": "bearer" })),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(favs)))
            .mount(server)
            .await;
    }

    fn session(server: &MockServer) -> Session {
        Session::new(ApiClient::new(ClientConfig::new(server.uri())).unwrap())
    }

    #[tokio::test]
    async fn login_loads_profile_and_favorites() {
        let server = MockServer::start().await;
        mount_login(&server, &[1, 2]).await;
        Mock::given(method("GET"))
            .and(path("/users/me/favorites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
            .mount(&server)
            .await;

        let mut s = session(&server);
        let user = s.login("ana@example.com", "hunter2hunter2").await.unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert!(s.is_authenticated());
        assert_eq!(s.token(), Some("tok"));
        assert!(s.is_favorite(1));
        assert!(!s.is_favorite(3));
    }

    #[tokio::test]
    async fn invalid_credentials_leave_session_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/token"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "detail": "Incorrect email or password" })),
            )
            .mount(&server)
            .await;

        let mut s = session(&server);
        let err = s.login("ana@example.com", "wrong").await.unwrap_err();
        match err {
            ClientError::Unauthorized(detail) => assert_eq!(detail, "Incorrect email or password"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!s.is_authenticated());
        assert!(s.token().is_none());
    }

    #[tokio::test]
    async fn profile_failure_aborts_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "access_token": "tok", "token_type": "bearer" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut s = session(&server);
        assert!(s.login("ana@example.com", "hunter2hunter2").await.is_err());
        assert!(!s.is_authenticated());
        assert!(s.token().is_none());
    }

    #[tokio::test]
    async fn favorites_failure_degrades_to_empty() {
        let server = MockServer::start().await;
        mount_login(&server, &[]).await;
        Mock::given(method("GET"))
            .and(path("/users/me/favorites"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut s = session(&server);
        s.login("ana@example.com", "hunter2hunter2").await.unwrap();
        assert!(s.is_authenticated());
        assert!(s.favorites().is_empty());
    }

    #[tokio::test]
    async fn add_then_remove_restores_set() {
        let server = MockServer::start().await;
        mount_login(&server, &[1]).await;
        Mock::given(method("GET"))
            .and(path("/users/me/favorites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/users/me/favorites/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(&[1, 7])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/users/me/favorites/7"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let mut s = session(&server);
        s.login("ana@example.com", "hunter2hunter2").await.unwrap();
        let before = s.favorites().to_vec();

        s.add_favorite(7).await.unwrap();
        assert!(s.is_favorite(7));
        s.remove_favorite(7).await.unwrap();
        assert!(!s.is_favorite(7));
        assert_eq!(s.favorites(), before.as_slice());
        assert_eq!(s.user().unwrap().favorite_movie_ids, vec![1]);
    }

    #[tokio::test]
    async fn add_ignores_server_favorite_list() {
        let server = MockServer::start().await;
        mount_login(&server, &[1, 5]).await;
        Mock::given(method("GET"))
            .and(path("/users/me/favorites"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/users/me/favorites/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(&[1, 5, 7])))
            .expect(2)
            .mount(&server)
            .await;

        let mut s = session(&server);
        s.login("ana@example.com", "hunter2hunter2").await.unwrap();
        assert!(s.favorites().is_empty());

        s.add_favorite(7).await.unwrap();
        assert_eq!(s.favorites(), &[7]);
        s.add_favorite(7).await.unwrap();
        assert_eq!(s.favorites(), &[7]);
    }

    #[tokio::test]
    async fn register_does_not_log_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_string_contains("\"full_name\":\"Ana\""))
            .respond_with(ResponseTemplate::new(201).set_body_json(user_json(&[])))
            .expect(1)
            .mount(&server)
            .await;

        let s = session(&server);
        let user = s
            .register("ana@example.com", "hunter2hunter2", Some("Ana"))
            .await
            .unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert!(!s.is_authenticated());
        assert!(s.token().is_none());
        assert!(s.favorites().is_empty());
    }

    #[tokio::test]
    async fn register_surfaces_server_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "detail": "User with this email already exists" })),
            )
            .mount(&server)
            .await;

        let s = session(&server);
        match s.register("ana@example.com", "hunter2hunter2", None).await {
            Err(ClientError::Status { status, detail }) => {
                assert_eq!(status, 400);
                assert_eq!(detail, "User with this email already exists");
            }
            other => panic!("unexpected {:?}", other.map(|u| u.email)),
        }
        assert!(!s.is_authenticated());
    }

    #[tokio::test]
    async fn failed_add_keeps_state() {
        let server = MockServer::start().await;
        mount_login(&server, &[]).await;
        Mock::given(method("GET"))
            .and(path("/users/me/favorites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/users/me/favorites/99"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "detail": "Movie with ID 99 not found." })),
            )
            .mount(&server)
            .await;

        let mut s = session(&server);
        s.login("ana@example.com", "hunter2hunter2").await.unwrap();
        let err = s.add_favorite(99).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));
        assert!(!s.is_favorite(99));
        assert!(s.is_authenticated());
    }

    #[tokio::test]
    async fn unauthorized_tears_down_session() {
        let server = MockServer::start().await;
        mount_login(&server, &[]).await;
        Mock::given(method("GET"))
            .and(path("/users/me/favorites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/users/me/favorites/3"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "detail": "Could not validate credentials" })),
            )
            .mount(&server)
            .await;

        let mut s = session(&server);
        s.login("ana@example.com", "hunter2hunter2").await.unwrap();
        let err = s.remove_favorite(3).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!s.is_authenticated());
        assert!(s.token().is_none());
    }

    #[tokio::test]
    async fn favorite_ops_need_login() {
        let server = MockServer::start().await;
        let mut s = session(&server);
        assert!(matches!(
            s.add_favorite(1).await,
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(
            s.refresh_favorites().await,
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn logout_clears_everything() {
        let server = MockServer::start().await;
        mount_login(&server, &[5]).await;
        Mock::given(method("GET"))
            .and(path("/users/me/favorites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([5])))
            .mount(&server)
            .await;

        let mut s = session(&server);
        s.login("ana@example.com", "hunter2hunter2").await.unwrap();
        s.logout();
        assert!(!s.is_authenticated());
        assert!(s.favorites().is_empty());
        assert!(s.user().is_none());
    }
}
