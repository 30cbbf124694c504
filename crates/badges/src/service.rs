use crate::error::ClaimError;
use async_trait::async_trait;
use lawallet_nostr::Event;
use lawallet_scan_core::Credential;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Remote service that hands out badge awards.
#[async_trait]
pub trait BadgeService: Send + Sync {
    /// Ask `origin` to award `badge_id` to `credential`. Returns the award event.
    async fn request_badge(
        &self,
        origin: &str,
        credential: &Credential,
        badge_id: &str,
    ) -> Result<Event, ClaimError>;
}

/// Badge service reached over `POST {origin}/api/badge/request`.
pub struct HttpBadgeService {
    client: Client,
}

impl HttpBadgeService {
    pub fn new(timeout: Duration) -> Result<Self, ClaimError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClaimError::Remote(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl BadgeService for HttpBadgeService {
    async fn request_badge(
        &self,
        origin: &str,
        credential: &Credential,
        badge_id: &str,
    ) -> Result<Event, ClaimError> {
        let url = format!("{}/api/badge/request", origin.trim_end_matches('/'));

        let mut body = serde_json::to_value(credential).map_err(|e| ClaimError::Remote(e.to_string()))?;
        body["badgeId"] = json!(badge_id);
        debug!(url = %url, badge_id, "requesting badge");

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ClaimError::Timeout
            } else {
                ClaimError::Remote(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ClaimError::Remote(format!("{}: {}", status, text)));
        }

        let mut json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClaimError::Remote(e.to_string()))?;

        let message = json
            .get_mut("message")
            .map(serde_json::Value::take)
            .ok_or_else(|| ClaimError::Remote("No message in badge response".to_string()))?;

        serde_json::from_value(message)
            .map_err(|e| ClaimError::Remote(format!("Invalid badge award: {}", e)))
    }
}
