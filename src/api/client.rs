//! Blocking HTTP client for the iBroadcast service.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;

use super::{ApiError, RemoteLibrary};

/// Client label sent with the login handshake and each upload.
pub const CLIENT_NAME: &str = "rust uploader script";

/// Login/status endpoint.
const LOGIN_URL: &str = "https://json.ibroadcast.com/s/JSON/status";

/// Manifest and upload endpoint.
const SYNC_URL: &str = "https://sync.ibroadcast.com";

/// Authenticated session state returned by [`ApiClient::login`].
#[derive(Debug, Clone)]
pub struct Session {
    /// Server-assigned user identifier
    pub user_id: String,
    /// Session token for subsequent requests
    pub token: String,
    /// File extensions the server accepts, with leading dots
    pub supported_extensions: HashSet<String>,
}

/// Blocking API client holding a reqwest client and the endpoint URLs.
pub struct ApiClient {
    client: Client,
    login_url: String,
    sync_url: String,
}

impl ApiClient {
    /// Create a client against the production endpoints.
    ///
    /// Only a connect timeout is set; uploads of large files may
    /// legitimately take minutes, so there is no overall request timeout.
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .user_agent(CLIENT_NAME)
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: LOGIN_URL.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            login_url: LOGIN_URL.to_string(),
            sync_url: SYNC_URL.to_string(),
        })
    }

    /// Override the endpoint URLs. Used by tests that point the client at
    /// a local server.
    #[must_use]
    pub fn with_endpoints(mut self, login_url: &str, sync_url: &str) -> Self {
        self.login_url = login_url.to_string();
        self.sync_url = sync_url.to_string();
        self
    }

    /// Verify credentials and capture the session plus the supported
    /// extension set.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let body = serde_json::json!({
            "mode": "status",
            "email_address": email,
            "password": password,
            "version": "0.2",
            "client": CLIENT_NAME,
            "supported_types": 1,
        });

        let response = self
            .client
            .post(&self.login_url)
            .json(&body)
            .send()
            .map_err(|source| ApiError::Transport {
                endpoint: self.login_url.clone(),
                source,
            })?;
        let value: Value = response.json().map_err(|source| ApiError::Transport {
            endpoint: self.login_url.clone(),
            source,
        })?;

        // Bad credentials produce a response without a user object rather
        // than an HTTP error.
        let user = match value.get("user") {
            Some(user) => user,
            None => return Err(ApiError::LoginFailed),
        };
        let user_id = user
            .get("id")
            .and_then(scalar_to_string)
            .ok_or(ApiError::LoginFailed)?;
        let token = user
            .get("token")
            .and_then(scalar_to_string)
            .ok_or(ApiError::LoginFailed)?;

        let supported_extensions = value
            .get("supported")
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::UnexpectedResponse {
                endpoint: self.login_url.clone(),
                detail: "missing supported extension list".to_string(),
            })?
            .iter()
            .filter_map(|item| item.get("extension"))
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();

        Ok(Session {
            user_id,
            token,
            supported_extensions,
        })
    }
}

impl RemoteLibrary for ApiClient {
    fn fetch_manifest(&self, session: &Session) -> Result<HashSet<String>, ApiError> {
        let body = format!("user_id={}&token={}", session.user_id, session.token);
        let response = self
            .client
            .post(&self.sync_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .map_err(|source| ApiError::Transport {
                endpoint: self.sync_url.clone(),
                source,
            })?;
        let value: Value = response.json().map_err(|source| ApiError::Transport {
            endpoint: self.sync_url.clone(),
            source,
        })?;

        let manifest = value
            .get("md5")
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::UnexpectedResponse {
                endpoint: self.sync_url.clone(),
                detail: "missing md5 array".to_string(),
            })?
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        Ok(manifest)
    }

    fn upload(&self, session: &Session, file: &Path, relative: &str) -> Result<(), ApiError> {
        let handle = File::open(file).map_err(|source| ApiError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| relative.to_string());

        let part = multipart::Part::reader(handle).file_name(file_name);
        let form = multipart::Form::new()
            .part("file", part)
            .text("file_path", relative.to_string())
            .text("method", CLIENT_NAME)
            .text("user_id", session.user_id.clone())
            .text("token", session.token.clone());

        let response = self
            .client
            .post(&self.sync_url)
            .multipart(form)
            .send()
            .map_err(|source| ApiError::Transport {
                endpoint: self.sync_url.clone(),
                source,
            })?;

        // The service signals success with a plain 200; anything else is
        // a rejected upload.
        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(ApiError::UploadRejected {
                status: response.status().as_u16(),
            })
        }
    }
}

/// Render a JSON string or number as a string; the server has returned
/// the user id in both shapes over time.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
