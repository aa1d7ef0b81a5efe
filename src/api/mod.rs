//! HTTP transport and the per-resource endpoint functions.
//!
//! Every request goes to the single configured base URL with a static Basic
//! authentication header. Failures are never retried or swallowed; a `401` is
//! logged before it is handed back to the caller like any other error.

use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

pub mod accounts;
pub mod adapters;
pub mod budgets;
pub mod categories;
pub mod groups;
pub mod payees;
pub mod transactions;

/// Query string pairs appended to a request.
pub type Query<'a> = &'a [(&'a str, String)];

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&basic_auth(username, password))
            .map_err(|e| ApiError::Transport(format!("invalid credentials header: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ApiError::from)?;

        Ok(ApiClient { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, query: Query<'_>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        if query.is_empty() {
            builder
        } else {
            builder.query(query)
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::error!("Unauthorized: please check your credentials ({})", response.url());
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response_body(status.as_u16(), &body));
        }

        Ok(response)
    }

    /// Reads the body as JSON, `None` when the server sent nothing.
    async fn read_optional(response: Response) -> Result<Option<Value>, ApiError> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path, query)).await?;
        Self::read_json(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, query: Query<'_>, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::POST, path, query).json(body))
            .await?;
        Self::read_json(response).await
    }

    pub async fn put_json<B, T>(&self, path: &str, query: Query<'_>, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::PUT, path, query).json(body))
            .await?;
        Self::read_json(response).await
    }

    pub async fn patch_json<B>(&self, path: &str, query: Query<'_>, body: &B) -> Result<Option<Value>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .send(self.request(Method::PATCH, path, query).json(body))
            .await?;
        Self::read_optional(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<Option<Value>, ApiError> {
        let response = self.send(self.request(Method::DELETE, path, &[])).await?;
        Self::read_optional(response).await
    }

    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
        form: Form,
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::PUT, path, query).multipart(form))
            .await?;
        Self::read_json(response).await
    }
}

fn basic_auth(username: &str, password: &str) -> String {
    let token = general_purpose::STANDARD.encode(format!("{}:{}", username, password));
    format!("Basic {}", token)
}
