//! Storefront API client.
//!
//! [`ShopApi`] is the seam the cart/checkout engine talks through;
//! [`HttpShopClient`] implements it over `reqwest`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use lesson_shop_core::{Lesson, LessonId, LessonPatch, NewOrder, OrderCreated, OrderId};

use crate::config::ClientConfig;

/// Errors from storefront API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ClientError {
    /// Status code returned by the server, if the request got that far.
    #[must_use]
    pub const fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Operations the client needs from the storefront.
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// `GET /lessons`
    async fn list_lessons(&self) -> Result<Vec<Lesson>, ClientError>;

    /// `GET /search?q=<text>`
    async fn search_lessons(&self, text: &str) -> Result<Vec<Lesson>, ClientError>;

    /// `PUT /lessons/{id}` with `{"spaces": n}`. Returns the updated lesson.
    async fn update_spaces(&self, id: LessonId, spaces: u32) -> Result<Lesson, ClientError>;

    /// `POST /orders`. Returns the new order's id.
    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, ClientError>;
}

/// HTTP client for the storefront API.
#[derive(Clone)]
pub struct HttpShopClient {
    inner: Arc<HttpShopClientInner>,
}

struct HttpShopClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpShopClient {
    /// Create a new client for the configured base URL.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            inner: Arc::new(HttpShopClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
            }),
        }
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request and decode a JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Storefront API returned non-success status"
            );
            return Err(ClientError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse storefront API response"
            );
            ClientError::Parse(e)
        })
    }
}

#[async_trait]
impl ShopApi for HttpShopClient {
    #[instrument(skip(self))]
    async fn list_lessons(&self) -> Result<Vec<Lesson>, ClientError> {
        let url = self.endpoint("lessons")?;
        self.execute(self.inner.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn search_lessons(&self, text: &str) -> Result<Vec<Lesson>, ClientError> {
        let mut url = self.endpoint("search")?;
        url.query_pairs_mut().append_pair("q", text);
        self.execute(self.inner.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn update_spaces(&self, id: LessonId, spaces: u32) -> Result<Lesson, ClientError> {
        let url = self.endpoint(&format!("lessons/{id}"))?;
        let patch = LessonPatch::spaces(spaces);
        self.execute(self.inner.client.put(url).json(&patch)).await
    }

    #[instrument(skip(self, order), fields(units = order.lesson_ids.len()))]
    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, ClientError> {
        let url = self.endpoint("orders")?;
        let created: OrderCreated = self.execute(self.inner.client.post(url).json(order)).await?;
        Ok(created.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpShopClient {
        HttpShopClient::new(&ClientConfig::new(base).unwrap())
    }

    #[test]
    fn test_endpoints_respect_base_path() {
        let client = client("http://localhost:3000/shop");
        assert_eq!(
            client.endpoint("lessons").unwrap().as_str(),
            "http://localhost:3000/shop/lessons"
        );

        let id = LessonId::generate();
        assert_eq!(
            client.endpoint(&format!("lessons/{id}")).unwrap().as_str(),
            format!("http://localhost:3000/shop/lessons/{id}")
        );
    }

    #[test]
    fn test_search_text_is_query_encoded() {
        let client = client("http://localhost:3000");
        let mut url = client.endpoint("search").unwrap();
        url.query_pairs_mut().append_pair("q", "art & music");
        assert_eq!(url.query(), Some("q=art+%26+music"));
    }

    #[test]
    fn test_status_accessor() {
        let err = ClientError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    }
}
