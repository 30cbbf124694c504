use serde::{Deserialize, Serialize};

/// The local user as far as scanning is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub pubkey: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// What the badge service accepts as proof of who is claiming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Credential {
    Pubkey(String),
    Nip05(String),
}

impl Identity {
    pub fn new(pubkey: Option<String>, username: Option<String>) -> Self {
        Self { pubkey, username }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn pubkey(&self) -> Option<&str> {
        self.pubkey.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// A usable public key or username exists.
    pub fn is_established(&self) -> bool {
        self.pubkey().is_some() || self.username().is_some()
    }

    /// Public key when known, otherwise `username@lightning_domain`.
    pub fn credential(&self, lightning_domain: &str) -> Option<Credential> {
        if let Some(pubkey) = self.pubkey() {
            return Some(Credential::Pubkey(pubkey.to_string()));
        }
        self.username()
            .map(|name| Credential::Nip05(format!("{}@{}", name, lightning_domain)))
    }
}

impl Credential {
    pub fn value(&self) -> &str {
        match self {
            Credential::Pubkey(v) | Credential::Nip05(v) => v,
        }
    }
}
