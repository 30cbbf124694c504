use crate::error::NostrError;
use secp256k1::{schnorr, Message, XOnlyPublicKey, SECP256K1};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// A tag is a name followed by its values, e.g. `["p", "<pubkey>"]`.
pub type Tag = Vec<String>;

/// Event kinds used by the wallet.
pub mod kinds {
    pub const BADGE_AWARD: u32 = 8;
    pub const PROFILE_BADGES: u32 = 30008;
}

/// A signed event as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub pubkey: String,
    pub created_at: i64,
    pub kind: u32,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sig: String,
}

/// An event that has not been signed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedEvent {
    pub pubkey: String,
    pub created_at: i64,
    pub kind: u32,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl UnsignedEvent {
    /// Build an event for `pubkey` stamped with the current time.
    pub fn new(pubkey: impl Into<String>, kind: u32, tags: Vec<Tag>, content: impl Into<String>) -> Self {
        Self {
            pubkey: pubkey.into(),
            created_at: chrono::Utc::now().timestamp(),
            kind,
            tags,
            content: content.into(),
        }
    }

    /// Hex event id over the canonical serialization.
    pub fn id(&self) -> String {
        hex::encode(self.digest())
    }

    pub(crate) fn digest(&self) -> [u8; 32] {
        canonical_digest(&self.pubkey, self.created_at, self.kind, &self.tags, &self.content)
    }
}

impl Event {
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        tag_value(&self.tags, name)
    }

    pub fn tag_values(&self, name: &str) -> Vec<&str> {
        tag_values(&self.tags, name)
    }

    /// Recompute the id and check the Schnorr signature against `pubkey`.
    pub fn verify(&self) -> Result<(), NostrError> {
        let digest = canonical_digest(&self.pubkey, self.created_at, self.kind, &self.tags, &self.content);
        let expected = hex::encode(digest);
        if expected != self.id {
            return Err(NostrError::IdMismatch {
                expected,
                actual: self.id.clone(),
            });
        }

        let pubkey = XOnlyPublicKey::from_str(&self.pubkey)
            .map_err(|e| NostrError::InvalidKey(e.to_string()))?;
        let sig = schnorr::Signature::from_str(&self.sig)
            .map_err(|e| NostrError::InvalidSignature(e.to_string()))?;

        SECP256K1
            .verify_schnorr(&sig, &Message::from_digest(digest), &pubkey)
            .map_err(|e| NostrError::InvalidSignature(e.to_string()))
    }
}

/// SHA-256 of `[0, pubkey, created_at, kind, tags, content]`.
fn canonical_digest(pubkey: &str, created_at: i64, kind: u32, tags: &[Tag], content: &str) -> [u8; 32] {
    let canonical = json!([0, pubkey, created_at, kind, tags, content]);
    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string().as_bytes());
    hasher.finalize().into()
}

/// Value of the first tag named `name`.
pub fn tag_value<'a>(tags: &'a [Tag], name: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.first().map(String::as_str) == Some(name))
        .and_then(|tag| tag.get(1))
        .map(String::as_str)
}

/// Values of every tag named `name`, in order.
pub fn tag_values<'a>(tags: &'a [Tag], name: &str) -> Vec<&'a str> {
    tags.iter()
        .filter(|tag| tag.first().map(String::as_str) == Some(name))
        .filter_map(|tag| tag.get(1))
        .map(String::as_str)
        .collect()
}
