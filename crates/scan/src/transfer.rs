//! Payment-string detection for non-URL scans.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const LIGHTNING_PREFIX: &str = "lightning:";

static LIGHTNING_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9._%+-]+@([a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,})$")
        .expect("lightning address pattern compiles")
});

static LNURL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^lnurl1[02-9ac-hj-np-z]+$")
        .expect("lnurl pattern compiles")
});

// Human-readable part: network prefix plus optional amount and multiplier.
static INVOICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^ln(bc|tb|bcrt|tbs)[0-9]*[munp]?1[02-9ac-hj-np-z]+$")
        .expect("invoice pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferType {
    None,
    /// Lightning address on the wallet's own federation domain.
    Internal,
    /// Lightning address on a foreign domain.
    Lud16,
    Lnurl,
    Invoice,
}

/// Drop a leading `lightning:` scheme, any case.
pub fn remove_lightning_standard(data: &str) -> &str {
    let trimmed = data.trim();
    match trimmed.get(..LIGHTNING_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(LIGHTNING_PREFIX) => {
            trimmed[LIGHTNING_PREFIX.len()..].trim()
        }
        _ => trimmed,
    }
}

/// Classify a payment string, case-insensitively.
pub fn detect_transfer_type(data: &str, lightning_domain: &str) -> TransferType {
    if let Some(captures) = LIGHTNING_ADDRESS.captures(data) {
        let domain = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        return if domain.eq_ignore_ascii_case(lightning_domain) {
            TransferType::Internal
        } else {
            TransferType::Lud16
        };
    }

    if LNURL.is_match(data) {
        return TransferType::Lnurl;
    }

    if INVOICE.is_match(data) {
        return TransferType::Invoice;
    }

    TransferType::None
}
