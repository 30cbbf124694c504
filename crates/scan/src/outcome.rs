use serde::{Deserialize, Serialize};

/// The single effect a scan produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClassifiedOutcome {
    /// Follow an internal route.
    Navigate { path: String },
    /// Foreign URL, opened only after the user confirms.
    PendingExternalUrl { url: String },
    /// Claim-badge link, claimed only after the user confirms.
    PendingBadgeClaim { url: String },
    /// Neither a usable URL nor a supported payment string.
    Ignored,
}

impl ClassifiedOutcome {
    pub fn navigate(path: impl Into<String>) -> Self {
        Self::Navigate { path: path.into() }
    }

    pub fn external(url: impl Into<String>) -> Self {
        Self::PendingExternalUrl { url: url.into() }
    }

    pub fn badge_claim(url: impl Into<String>) -> Self {
        Self::PendingBadgeClaim { url: url.into() }
    }
}
