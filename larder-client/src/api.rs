//! Bearer-authenticated JSON client for the grocery backend.

use anyhow::Context;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use larder_core::{
    GroceryItem, GroceryItemPatch, MonthlySummary, NewGroceryItem, NewPantryItem,
    PantryCreateResponse, PantryItem, ProductItem, ProductSearch, PurchaseRecord,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(
        "Unable to connect to the service. Check that the backend is running and your API URL is correct ({base_url})."
    )]
    Connect {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("could not decode response from {path}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid API URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    /// True when no response was received at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, ApiError::Connect { .. })
    }
}

/// User-facing message for a failed response: the backend's `error`
/// field when it sends one, otherwise a generic status line.
pub fn error_message(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<serde_json::Value>,
    }

    let api_message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .filter(|s| !s.trim().is_empty());

    api_message.unwrap_or_else(|| format!("API request failed ({status})"))
}

/// Decode a response body; an empty body or JSON `null` yields the default.
pub fn decode_body<T: DeserializeOwned + Default>(path: &str, body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
}

#[derive(Serialize)]
struct FinalizeRequest {
    clear_list: bool,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url.trim()).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL plus `segments`, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let path = url.path().to_string();
        tracing::debug!(%method, path = %path, "api request");

        let mut req = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token));
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|source| ApiError::Connect {
            base_url: self.base_url.to_string(),
            source,
        })?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|source| ApiError::Connect {
            base_url: self.base_url.to_string(),
            source,
        })?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &String::from_utf8_lossy(&bytes));
            tracing::warn!(path = %path, status = status.as_u16(), error = %message, "api request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        decode_body(&path, &bytes)
    }

    async fn get<T: DeserializeOwned + Default>(&self, url: Url) -> Result<T, ApiError> {
        self.send::<(), T>(Method::GET, url, None).await
    }

    pub async fn list_grocery(&self) -> Result<Vec<GroceryItem>, ApiError> {
        self.get(self.endpoint(&["api", "grocery-items"])?).await
    }

    pub async fn create_grocery(&self, item: &NewGroceryItem) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "grocery-items"])?;
        let _: serde_json::Value = self.send(Method::POST, url, Some(item)).await?;
        Ok(())
    }

    pub async fn update_grocery(&self, id: &str, patch: &GroceryItemPatch) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "grocery-items", id])?;
        let _: serde_json::Value = self.send(Method::PATCH, url, Some(patch)).await?;
        Ok(())
    }

    pub async fn delete_grocery(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "grocery-items", id])?;
        let _: serde_json::Value = self.send::<(), _>(Method::DELETE, url, None).await?;
        Ok(())
    }

    /// Snapshot the list into a purchase record and clear it, server-side.
    pub async fn finalize(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "grocery-items", "finalize"])?;
        let body = FinalizeRequest { clear_list: true };
        let _: serde_json::Value = self.send(Method::POST, url, Some(&body)).await?;
        Ok(())
    }

    pub async fn list_pantry(&self) -> Result<Vec<PantryItem>, ApiError> {
        self.get(self.endpoint(&["api", "pantry"])?).await
    }

    /// The backend may merge the new entry into an existing one.
    pub async fn create_pantry(&self, item: &NewPantryItem) -> Result<PantryCreateResponse, ApiError> {
        let url = self.endpoint(&["api", "pantry"])?;
        self.send(Method::POST, url, Some(item)).await
    }

    pub async fn update_pantry(&self, id: &str, item: &NewPantryItem) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "pantry", id])?;
        let _: serde_json::Value = self.send(Method::PATCH, url, Some(item)).await?;
        Ok(())
    }

    pub async fn delete_pantry(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "pantry", id])?;
        let _: serde_json::Value = self.send::<(), _>(Method::DELETE, url, None).await?;
        Ok(())
    }

    pub async fn purchase_history(&self) -> Result<Vec<PurchaseRecord>, ApiError> {
        self.get(self.endpoint(&["api", "purchase-history"])?).await
    }

    pub async fn monthly_summary(&self) -> Result<Option<MonthlySummary>, ApiError> {
        self.get(self.endpoint(&["api", "analytics", "monthly-summary"])?).await
    }

    pub async fn products(&self, limit: usize) -> Result<Vec<ProductItem>, ApiError> {
        let mut url = self.endpoint(&["api", "products"])?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        self.get(url).await
    }

    pub async fn search_products(&self, query: &str, limit: usize) -> Result<Vec<ProductItem>, ApiError> {
        let mut url = self.endpoint(&["api", "products"])?;
        url.query_pairs_mut()
            .append_pair("search", query.trim())
            .append_pair("limit", &limit.to_string());
        self.get(url).await
    }
}

/// Synchronous product search over an [`ApiClient`], for the smart-fill chain.
pub struct BlockingSearch<'a> {
    client: &'a ApiClient,
}

impl<'a> BlockingSearch<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }
}

impl ProductSearch for BlockingSearch<'_> {
    fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<ProductItem>> {
        // Called from inside the CLI's runtime: nested block_on would panic,
        // so hop off the worker with block_in_place.
        let fut = self.client.search_products(query, limit);
        let found = if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(fut))
        } else {
            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(fut)
        };
        Ok(found?)
    }
}
