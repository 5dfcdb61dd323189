// --- File: crates/vasool_common/src/auth.rs ---
//! Authentication collaborator: signs the session in and out against the
//! backend's `/auth` endpoints. It is the only writer of the session token.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::VasoolError;
use crate::http::client::BackendClient;
use crate::logging::log_result;
use crate::session::Session;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub company: Option<String>,
}

/// Body returned by `/auth/login` and `/auth/signup`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "user_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Clone)]
pub struct AuthClient {
    backend: BackendClient,
    session: Arc<Session>,
}

impl AuthClient {
    pub fn new(backend: BackendClient, session: Arc<Session>) -> Self {
        Self { backend, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<Option<UserProfile>, VasoolError> {
        info!("Logging in as {}", request.email);
        let result = self.sign_in_with("/auth/login", request).await;
        log_result(result, "Signed in", "Sign-in failed")
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<Option<UserProfile>, VasoolError> {
        info!("Signing up {}", request.email);
        let result = self.sign_in_with("/auth/signup", request).await;
        log_result(result, "Account created", "Sign-up failed")
    }

    async fn sign_in_with<B: Serialize>(
        &self,
        path: &str,
        request: &B,
    ) -> Result<Option<UserProfile>, VasoolError> {
        let response: TokenResponse = self.backend.post_json(path, request, None).await?;
        self.session.sign_in(&response.access_token)?;
        Ok(response.user)
    }

    /// Profile of the signed-in user. A rejected token signs the session out.
    pub async fn me(&self) -> Result<UserProfile, VasoolError> {
        let token = self.session.require_token()?;
        match self.backend.get_json("/auth/me", Some(&token)).await {
            Ok(profile) => Ok(profile),
            Err(failure) if failure.is_unauthorized() => {
                warn!("Backend rejected the session token, signing out");
                self.session.sign_out()?;
                Err(failure.into())
            }
            Err(failure) => Err(failure.into()),
        }
    }

    pub fn logout(&self) -> Result<(), VasoolError> {
        self.session.sign_out()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, session: Arc<Session>) -> AuthClient {
        let backend = BackendClient::with_client(Client::new(), format!("{}/api", server.uri()));
        AuthClient::new(backend, session)
    }

    #[tokio::test]
    async fn test_login_stores_token_in_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt-abc",
                "token_type": "bearer",
                "user": {"id": "u1", "email": "ops@acme.in", "name": "Ops"}
            })))
            .mount(&server)
            .await;

        let session = Arc::new(Session::in_memory(None));
        let auth = client_for(&server, session.clone());

        let user = auth
            .login(&LoginRequest {
                email: "ops@acme.in".to_string(),
                password: "pw".to_string(),
            })
            .await
            .expect("login should succeed");

        assert_eq!(user.map(|u| u.id).as_deref(), Some("u1"));
        assert_eq!(session.token().as_deref(), Some("jwt-abc"));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let session = Arc::new(Session::in_memory(None));
        let auth = client_for(&server, session.clone());

        let err = auth
            .login(&LoginRequest {
                email: "ops@acme.in".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, VasoolError::AuthError(ref m) if m == "Invalid credentials"));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_me_signs_out_on_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
            .mount(&server)
            .await;

        let session = Arc::new(Session::in_memory(Some("stale")));
        let auth = client_for(&server, session.clone());

        assert!(auth.me().await.is_err());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_me_without_session_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let auth = client_for(&server, Arc::new(Session::in_memory(None)));
        assert!(matches!(auth.me().await, Err(VasoolError::AuthError(_))));
    }
}
