//! reqwest-backed gateway client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{ApiError, Backend};
use crate::config::ClientConfig;
use crate::models::{AuditEvent, ChatTurn, TokenPair, User, Visitor, VisitorId};
use crate::storage::{ACCESS_TOKEN_KEY, Storage};

/// HTTP client bound to one backend base URL.
///
/// The bearer credential is read from storage while building each request, so
/// a credential rotated mid-session is picked up by the next call.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn Storage>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    history: &'a [ChatTurn],
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    reply: String,
}

#[derive(Serialize)]
struct RegisterDeviceRequest<'a> {
    registration_id: &'a str,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn Storage>) -> Result<Self, ApiError> {
        Url::parse(&config.api_base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.api_base_url)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a resource path (`/visitors/`) against the base URL.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))
    }

    /// Build a request with the current credential attached.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.store.get(ACCESS_TOKEN_KEY)?
            && !token.is_empty()
        {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = resp.bytes().await?;
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Self::send(self.request(Method::GET, path)?).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        Self::send(self.request(Method::POST, path)?.json(body)).await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Self::send(self.request(Method::POST, path)?).await
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let list: Option<Vec<T>> = self.get(path).await?;
        Ok(list.unwrap_or_default())
    }

    async fn visitor_action(&self, id: VisitorId, action: &str) -> Result<Visitor, ApiError> {
        self.post_empty(&format!("/visitors/{id}/{action}/")).await
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn obtain_token(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        self.post("/token/", &LoginRequest { username, password })
            .await
    }

    async fn list_visitors(&self) -> Result<Vec<Visitor>, ApiError> {
        self.get_list("/visitors/").await
    }

    async fn check_in(&self, id: VisitorId) -> Result<Visitor, ApiError> {
        self.visitor_action(id, "checkin").await
    }

    async fn check_out(&self, id: VisitorId) -> Result<Visitor, ApiError> {
        self.visitor_action(id, "checkout").await
    }

    async fn approve(&self, id: VisitorId) -> Result<Visitor, ApiError> {
        self.visitor_action(id, "approve").await
    }

    async fn deny(&self, id: VisitorId) -> Result<Visitor, ApiError> {
        self.visitor_action(id, "deny").await
    }

    async fn list_events(&self) -> Result<Vec<AuditEvent>, ApiError> {
        self.get_list("/events/").await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_list("/users/").await
    }

    async fn chat(&self, history: &[ChatTurn]) -> Result<String, ApiError> {
        let resp: ChatResponse = self.post("/chat/", &ChatRequest { history }).await?;
        Ok(resp.reply)
    }

    async fn register_push_token(&self, registration_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post("/register-fcm/", &RegisterDeviceRequest { registration_id })
            .await?;
        Ok(())
    }
}
