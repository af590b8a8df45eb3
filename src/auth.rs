use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

const IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

#[derive(Debug, Deserialize)]
struct RefreshTokenResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    local_id: String,
}

#[derive(Debug, Clone)]
struct CachedToken {
    id_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Session {
    refresh_token: String,
    user_id: Option<String>,
    cached: Option<CachedToken>,
}

/// Firebase email/password session that hands out fresh ID tokens.
#[derive(Clone)]
pub struct FirebaseAuth {
    client: Client,
    api_key: String,
    session: Arc<Mutex<Session>>,
}

fn expiry(expires_in: &str) -> DateTime<Utc> {
    let secs: i64 = expires_in.parse().unwrap_or(DEFAULT_EXPIRES_IN_SECS);
    Utc::now() + Duration::seconds(secs)
}

impl FirebaseAuth {
    /// Resume a session from a stored refresh token.
    pub fn new(api_key: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            session: Arc::new(Mutex::new(Session {
                refresh_token: refresh_token.into(),
                ..Session::default()
            })),
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_email(api_key: &str, email: &str, password: &str) -> Result<Self> {
        let client = Client::new();
        let url = format!("{IDENTITY_URL}:signInWithPassword?key={api_key}");

        let resp = client
            .post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Sign-in failed: {} - {}", status, body));
        }

        let sign_in: SignInResponse = resp.json().await?;
        tracing::info!(user_id = %sign_in.local_id, "signed in");

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            session: Arc::new(Mutex::new(Session {
                refresh_token: sign_in.refresh_token,
                user_id: Some(sign_in.local_id),
                cached: Some(CachedToken {
                    id_token: sign_in.id_token,
                    expires_at: expiry(&sign_in.expires_in),
                }),
            })),
        })
    }

    pub async fn get_id_token(&self) -> Result<String> {
        {
            let session = self.session.lock().await;
            if let Some(ref token) = session.cached {
                if token.expires_at > Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) {
                    return Ok(token.id_token.clone());
                }
            }
        }

        self.refresh_id_token().await
    }

    /// Firebase uid of the signed-in user.
    pub async fn get_user_id(&self) -> Result<String> {
        if let Some(uid) = self.session.lock().await.user_id.clone() {
            return Ok(uid);
        }
        self.refresh_id_token().await?;
        self.session
            .lock()
            .await
            .user_id
            .clone()
            .ok_or_else(|| anyhow!("token refresh returned no user id"))
    }

    async fn refresh_id_token(&self) -> Result<String> {
        let refresh_token = self.session.lock().await.refresh_token.clone();
        let url = format!("{SECURE_TOKEN_URL}?key={}", self.api_key);

        let resp = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &refresh_token),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Failed to refresh token: {} - {}", status, body));
        }

        let token_resp: RefreshTokenResponse = resp.json().await?;
        tracing::debug!(user_id = %token_resp.user_id, "refreshed id token");

        let mut session = self.session.lock().await;
        session.refresh_token = token_resp.refresh_token;
        session.user_id = Some(token_resp.user_id);
        session.cached = Some(CachedToken {
            id_token: token_resp.id_token.clone(),
            expires_at: expiry(&token_resp.expires_in),
        });

        Ok(token_resp.id_token)
    }
}
