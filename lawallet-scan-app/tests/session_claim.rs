//! Badge confirmation flow through the session.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use lawallet_badges::{BadgeClaimer, BadgeService, ClaimError};
use lawallet_nostr::{
    kinds, Event, Filter, LocalKeySigner, NostrClient, NostrError, Signer, UnsignedEvent,
};
use lawallet_scan_app::{Effect, ScanSession, SessionState};
use lawallet_scan_core::{Credential, Identity, ModulePubkeys, WalletConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const SECRET: &str = "0000000000000000000000000000000000000000000000000000000000000003";
const ISSUER_SECRET: &str = "0000000000000000000000000000000000000000000000000000000000000002";
const PUBKEY: &str = "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9";
const CLAIM_URL: &str = "https://badges.lawallet.ar/claim?definitionid=42";

fn config() -> Arc<WalletConfig> {
    Arc::new(WalletConfig {
        origin: "https://app.lawallet.ar".into(),
        lightning_domain: "lawallet.ar".into(),
        claim_badge_origin: "https://badges.lawallet.ar".into(),
        gateway: "https://api.lawallet.ar".into(),
        module_pubkeys: ModulePubkeys {
            card: "18f6a706091b421bd9db1bac964030b3ca3dd2d5c4ac1e51a13fa7e86c6d0d55".into(),
        },
        request_timeout_secs: 15,
    })
}

/// Fails the first `failures` requests, then awards the badge.
struct FlakyBadgeService {
    failures: AtomicUsize,
}

#[async_trait]
impl BadgeService for FlakyBadgeService {
    async fn request_badge(
        &self,
        _origin: &str,
        _credential: &Credential,
        _badge_id: &str,
    ) -> Result<Event, ClaimError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ClaimError::Remote("connection refused".into()));
        }
        let issuer = LocalKeySigner::from_hex(ISSUER_SECRET).unwrap();
        let award = UnsignedEvent::new(
            issuer.public_key(),
            kinds::BADGE_AWARD,
            vec![vec!["a".into(), format!("30009:issuer:{}", PUBKEY)]],
            "",
        );
        Ok(issuer.sign(award).await.unwrap())
    }
}

#[derive(Default)]
struct RecordingNostr {
    published: Mutex<Vec<Event>>,
}

#[async_trait]
impl NostrClient for RecordingNostr {
    async fn fetch_event(&self, _filter: &Filter) -> Result<Option<Event>, NostrError> {
        Ok(None)
    }

    async fn publish(&self, event: &Event) -> Result<(), NostrError> {
        self.published.lock().unwrap().push(event.clone());
        Ok(())
    }
}

fn session_with(failures: usize, nostr: Arc<RecordingNostr>) -> ScanSession {
    let claimer = BadgeClaimer::new(
        Arc::new(FlakyBadgeService {
            failures: AtomicUsize::new(failures),
        }),
        nostr,
        Arc::new(LocalKeySigner::from_hex(SECRET).unwrap()),
        Duration::from_secs(1),
    );
    ScanSession::new(config(), Identity::new(Some(PUBKEY.into()), None))
        .with_claimer(Arc::new(claimer))
}

#[tokio::test]
async fn test_successful_claim_returns_to_idle() {
    let nostr = Arc::new(RecordingNostr::default());
    let mut session = session_with(0, nostr.clone());

    assert_eq!(session.on_scan(CLAIM_URL), None);
    let effect = session.claim_badge().await.unwrap();

    assert_eq!(
        effect,
        Some(Effect::BadgeClaimed(format!("30009:issuer:{}", PUBKEY)))
    );
    assert!(session.is_idle());
    assert_eq!(nostr.published.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_claim_can_be_retried() {
    let nostr = Arc::new(RecordingNostr::default());
    let mut session = session_with(1, nostr.clone());
    session.on_scan(CLAIM_URL);

    let err = session.claim_badge().await.unwrap_err();
    assert!(matches!(err, ClaimError::Remote(_)));
    assert_eq!(
        session.state(),
        &SessionState::AwaitingBadgeConfirm {
            url: CLAIM_URL.into(),
            last_error: Some("Badge service failed: connection refused".into()),
        }
    );
    assert!(nostr.published.lock().unwrap().is_empty());

    // The prompt is still up, so new scans are dropped.
    assert_eq!(session.on_scan("https://app.lawallet.ar/?c=1"), None);

    session.claim_badge().await.unwrap();
    assert!(session.is_idle());
    assert_eq!(nostr.published.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancel_after_failure() {
    let nostr = Arc::new(RecordingNostr::default());
    let mut session = session_with(5, nostr);
    session.on_scan(CLAIM_URL);
    let _ = session.claim_badge().await;

    session.cancel();
    assert!(session.is_idle());
    assert_eq!(
        session.on_scan("https://app.lawallet.ar/?c=1"),
        Some(Effect::Navigate("/settings/cards?c=1".into()))
    );
}
