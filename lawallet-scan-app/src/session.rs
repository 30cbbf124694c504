//! Per-scanner state machine.
//!
//! `Idle -> {navigate | AwaitingUrlConfirm | AwaitingBadgeConfirm} -> Idle`.
//! A pending confirmation is only left through its own confirm or cancel
//! action; scans that arrive meanwhile are dropped.

use lawallet_badges::{BadgeClaimer, ClaimError};
use lawallet_scan_core::{classify, ClassifiedOutcome, Identity, ScanContext, WalletConfig};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingUrlConfirm {
        url: String,
    },
    AwaitingBadgeConfirm {
        url: String,
        /// Message from the last failed claim attempt, shown with the retry.
        last_error: Option<String>,
    },
}

/// Something the surrounding UI has to carry out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "target", rename_all = "snake_case")]
pub enum Effect {
    Navigate(String),
    OpenExternal(String),
    BadgeClaimed(String),
}

pub struct ScanSession {
    config: Arc<WalletConfig>,
    identity: Identity,
    claimer: Option<Arc<BadgeClaimer>>,
    state: SessionState,
}

impl ScanSession {
    pub fn new(config: Arc<WalletConfig>, identity: Identity) -> Self {
        Self {
            config,
            identity,
            claimer: None,
            state: SessionState::Idle,
        }
    }

    /// Enable badge claiming.
    pub fn with_claimer(mut self, claimer: Arc<BadgeClaimer>) -> Self {
        self.claimer = Some(claimer);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Handle one decoded scan.
    pub fn on_scan(&mut self, data: &str) -> Option<Effect> {
        if !self.is_idle() {
            debug!("scan dropped while a confirmation is pending");
            return None;
        }

        let ctx = ScanContext::new(&self.config, &self.identity);
        match classify(data, &ctx) {
            ClassifiedOutcome::Navigate { path } => {
                info!("Navigating to {}", path);
                Some(Effect::Navigate(path))
            }
            ClassifiedOutcome::PendingExternalUrl { url } => {
                self.state = SessionState::AwaitingUrlConfirm { url };
                None
            }
            ClassifiedOutcome::PendingBadgeClaim { url } => {
                self.state = SessionState::AwaitingBadgeConfirm {
                    url,
                    last_error: None,
                };
                None
            }
            ClassifiedOutcome::Ignored => None,
        }
    }

    /// Confirm the pending external URL.
    pub fn open_url(&mut self) -> Option<Effect> {
        let SessionState::AwaitingUrlConfirm { url } = &self.state else {
            return None;
        };
        let effect = Effect::OpenExternal(url.clone());
        self.state = SessionState::Idle;
        Some(effect)
    }

    /// Dismiss whichever confirmation is pending.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            debug!("confirmation cancelled");
        }
        self.state = SessionState::Idle;
    }

    /// Confirm the pending badge claim. The session returns to idle only when
    /// the claim was published; on failure the prompt stays up with the error.
    pub async fn claim_badge(&mut self) -> Result<Option<Effect>, ClaimError> {
        let SessionState::AwaitingBadgeConfirm { url, .. } = &self.state else {
            return Ok(None);
        };
        let url = url.clone();

        let result = match &self.claimer {
            Some(claimer) => {
                claimer
                    .claim(&url, &self.identity, &self.config.lightning_domain)
                    .await
            }
            None => Err(ClaimError::Unavailable),
        };

        match result {
            Ok(receipt) => {
                self.state = SessionState::Idle;
                Ok(Some(Effect::BadgeClaimed(receipt.address)))
            }
            Err(err) => {
                warn!("Badge claim failed: {}", err);
                self.state = SessionState::AwaitingBadgeConfirm {
                    url,
                    last_error: Some(err.to_string()),
                };
                Err(err)
            }
        }
    }
}
