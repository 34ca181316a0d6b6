use anyhow::Context;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::format::{MessageResponse, PinRequest, PinnedResourcesView};
use crate::types::{ResourceId, ResourceKind};

/// Thin HTTP client for the pinned resources API
pub struct PinsClient {
    base_url: url::Url,
    token: Option<String>,
    http: reqwest::Client,
}

impl PinsClient {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base_url = url::Url::parse(base_url).with_context(|| format!("invalid server URL '{}'", base_url))?;
        Ok(Self {
            base_url,
            token,
            http: reqwest::Client::new(),
        })
    }

    fn request(&self, method: Method, path: &str) -> anyhow::Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    fn require_token(&self) -> anyhow::Result<()> {
        if self.token.is_none() {
            anyhow::bail!("no token provided; pass --token or set PINS_TOKEN");
        }
        Ok(())
    }

    pub async fn list(&self) -> anyhow::Result<PinnedResourcesView> {
        self.require_token()?;
        let response = self.request(Method::GET, "/pinned-resources/")?.send().await?;
        decode(response).await
    }

    pub async fn pin(&self, request: &PinRequest) -> anyhow::Result<PinnedResourcesView> {
        self.require_token()?;
        let response = self
            .request(Method::POST, "/pinned-resources/")?
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn unpin(&self, id: ResourceId, kind: ResourceKind) -> anyhow::Result<MessageResponse> {
        self.require_token()?;
        let response = self
            .request(Method::DELETE, &format!("/pinned-resources/{}/", id))?
            .query(&[("resource_type", kind.tag())])
            .send()
            .await?;
        decode(response).await
    }

    pub async fn health(&self) -> anyhow::Result<Value> {
        let response = self.request(Method::GET, "/health")?.send().await?;
        // 503 still carries a useful body
        Ok(response.json().await?)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> anyhow::Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    let message = body
        .get("Error")
        .and_then(Value::as_str)
        .unwrap_or("request failed");
    anyhow::bail!("{} ({})", message, status)
}
