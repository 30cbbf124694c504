use crate::error::NostrError;
use crate::event::Event;
use crate::filter::Filter;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Read and write access to the social network.
#[async_trait]
pub trait NostrClient: Send + Sync {
    /// Newest event matching `filter`, if any.
    async fn fetch_event(&self, filter: &Filter) -> Result<Option<Event>, NostrError>;

    /// Broadcast a signed event.
    async fn publish(&self, event: &Event) -> Result<(), NostrError>;
}

/// HTTP client for the wallet gateway's relay bridge.
#[derive(Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// `base_url` is the gateway root, e.g. `https://api.lawallet.ar`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NostrError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, NostrError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(NostrError::Server {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl NostrClient for GatewayClient {
    async fn fetch_event(&self, filter: &Filter) -> Result<Option<Event>, NostrError> {
        let url = format!("{}/nostr/query", self.base_url);
        debug!(url = %url, ?filter, "querying gateway");

        let response = self.client.post(&url).json(filter).send().await?;
        let events: Vec<Event> = Self::check(response).await?.json().await?;

        Ok(events.into_iter().max_by_key(|event| event.created_at))
    }

    async fn publish(&self, event: &Event) -> Result<(), NostrError> {
        let url = format!("{}/nostr/publish", self.base_url);
        let response = self.client.post(&url).json(event).send().await?;
        Self::check(response).await?;

        info!(id = %event.id, kind = event.kind, "published event");
        Ok(())
    }
}
