use std::sync::Arc;

use chrono::Utc;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::ActiveSession;
use crate::client::{ClientError, ClientGuard, CredentialStore, StoredSession, Verdict};
use crate::forms::LoginForm;
use crate::models::AdminProfile;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    admin: AdminProfile,
    token: String,
}

#[derive(Debug, Deserialize)]
struct AdminResponse {
    admin: AdminProfile,
}

#[derive(Debug, Deserialize)]
struct SessionsResponse {
    #[serde(default)]
    list: Vec<ActiveSession>,
}

#[derive(Debug, Deserialize)]
struct ForceLogoutResponse {
    had_active_session: bool,
}

/// Typed client for the `/admin` endpoints. Every response passes through
/// the guard before the body is looked at.
pub struct AdminApiClient<S: CredentialStore> {
    base_url: String,
    http: reqwest::Client,
    guard: Arc<ClientGuard<S>>,
}

impl<S: CredentialStore> AdminApiClient<S> {
    pub fn new(base_url: impl Into<String>, guard: Arc<ClientGuard<S>>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            guard,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn guard(&self) -> &Arc<ClientGuard<S>> {
        &self.guard
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match self.guard.inspect(status, &body) {
            Verdict::Passed => serde_json::from_slice(&body)
                .map_err(|err| ClientError::Decode(format!("{status}: {err}"))),
            Verdict::LoggedOut(reason) => Err(ClientError::LoggedOut(reason)),
            Verdict::Rejected {
                status, message, ..
            } => Err(ClientError::Rejected { status, message }),
        }
    }

    /// Authenticated call. Without a usable credential the request goes out
    /// bare and the server's verdict decides.
    async fn send_authorized<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        self.dispatch(self.guard.authorize(request)).await
    }

    #[tracing::instrument(name = "Admin API login.", skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminProfile, ClientError> {
        let form = LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .dispatch(self.http.post(self.url("/admin/login")).json(&form))
            .await?;

        self.guard.remember(&StoredSession {
            token: response.token,
            admin: response.admin.clone(),
            server_url: self.base_url.clone(),
            saved_at: Utc::now(),
        })?;
        Ok(response.admin)
    }

    /// Local state is cleared even when the server cannot be reached.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = match self.guard.token() {
            Some(token) => self
                .dispatch::<serde_json::Value>(
                    self.http.post(self.url("/admin/logout")).bearer_auth(token),
                )
                .await
                .map(|_| ()),
            None => Ok(()),
        };
        self.guard.clear(None);

        match result {
            Err(ClientError::LoggedOut(_)) => Ok(()),
            other => other,
        }
    }

    pub async fn validate(&self) -> Result<AdminProfile, ClientError> {
        let response: AdminResponse = self
            .send_authorized(self.http.get(self.url("/admin/validate-token")))
            .await?;
        Ok(response.admin)
    }

    pub async fn sessions(&self) -> Result<Vec<ActiveSession>, ClientError> {
        let response: SessionsResponse = self
            .send_authorized(self.http.get(self.url("/admin/sessions")))
            .await?;
        Ok(response.list)
    }

    /// Returns whether the target had a tracked session.
    pub async fn force_logout(&self, admin_id: &str) -> Result<bool, ClientError> {
        let path = format!(
            "/admin/sessions/{}/force-logout",
            urlencoding::encode(admin_id)
        );
        let response: ForceLogoutResponse = self
            .send_authorized(self.http.post(self.url(&path)))
            .await?;
        Ok(response.had_active_session)
    }
}
