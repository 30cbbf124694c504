use crate::error::NostrError;
use crate::event::{Event, UnsignedEvent};
use async_trait::async_trait;
use secp256k1::{All, Keypair, Message, Secp256k1, SECP256K1};

/// Produces signed events on behalf of one identity.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Hex x-only public key of the signing identity.
    fn public_key(&self) -> &str;

    /// Sign an event. The event's `pubkey` must belong to this signer.
    async fn sign(&self, event: UnsignedEvent) -> Result<Event, NostrError>;
}

/// Signs with a secret key held in memory.
pub struct LocalKeySigner {
    keypair: Keypair,
    public_key: String,
}

impl LocalKeySigner {
    /// Load a signer from a 64-character hex secret key.
    pub fn from_hex(secret: &str) -> Result<Self, NostrError> {
        let secp: &Secp256k1<All> = SECP256K1;
        let keypair = Keypair::from_seckey_str(secp, secret.trim())
            .map_err(|e| NostrError::InvalidKey(e.to_string()))?;
        let (xonly, _parity) = keypair.x_only_public_key();

        Ok(Self {
            keypair,
            public_key: xonly.to_string(),
        })
    }
}

impl std::fmt::Debug for LocalKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKeySigner")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Signer for LocalKeySigner {
    fn public_key(&self) -> &str {
        &self.public_key
    }

    async fn sign(&self, event: UnsignedEvent) -> Result<Event, NostrError> {
        if event.pubkey != self.public_key {
            return Err(NostrError::InvalidKey(format!(
                "event pubkey {} does not match signer {}",
                event.pubkey, self.public_key
            )));
        }

        let digest = event.digest();
        let sig = SECP256K1.sign_schnorr_no_aux_rand(&Message::from_digest(digest), &self.keypair);

        Ok(Event {
            id: hex::encode(digest),
            pubkey: event.pubkey,
            created_at: event.created_at,
            kind: event.kind,
            tags: event.tags,
            content: event.content,
            sig: sig.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::kinds;

    const SECRET: &str = "0000000000000000000000000000000000000000000000000000000000000003";
    // BIP-340 test vector 0 public key for secret key 3.
    const PUBLIC: &str = "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9";

    #[test]
    fn test_public_key_derivation() {
        let signer = LocalKeySigner::from_hex(SECRET).unwrap();
        assert_eq!(signer.public_key(), PUBLIC);
    }

    #[test]
    fn test_rejects_bad_secret() {
        assert!(matches!(
            LocalKeySigner::from_hex("not-hex"),
            Err(NostrError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_signed_event_verifies() {
        let signer = LocalKeySigner::from_hex(SECRET).unwrap();
        let unsigned = UnsignedEvent::new(
            PUBLIC,
            kinds::PROFILE_BADGES,
            vec![vec!["d".into(), "profile_badges".into()]],
            "",
        );
        let expected_id = unsigned.id();

        let event = signer.sign(unsigned).await.unwrap();
        assert_eq!(event.id, expected_id);
        assert_eq!(event.sig.len(), 128);
        event.verify().unwrap();
    }

    #[tokio::test]
    async fn test_rejects_foreign_pubkey() {
        let signer = LocalKeySigner::from_hex(SECRET).unwrap();
        let unsigned = UnsignedEvent::new("ab".repeat(32), 1, vec![], "");
        assert!(signer.sign(unsigned).await.is_err());
    }

    #[tokio::test]
    async fn test_tampered_content_fails_verification() {
        let signer = LocalKeySigner::from_hex(SECRET).unwrap();
        let mut event = signer
            .sign(UnsignedEvent::new(PUBLIC, 1, vec![], "hello"))
            .await
            .unwrap();
        event.content = "changed".into();
        assert!(event.verify().is_err());
    }
}
