use crate::error::ClaimError;
use crate::service::BadgeService;
use lawallet_nostr::{kinds, Event, Filter, NostrClient, Signer, Tag, UnsignedEvent};
use lawallet_scan_core::query::{decode, raw_param};
use lawallet_scan_core::Identity;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// `d` identifier of the profile-badges record.
pub const PROFILE_BADGES_ID: &str = "profile_badges";

/// A completed claim.
#[derive(Debug, Clone)]
pub struct ClaimReceipt {
    pub badge_id: String,
    pub address: String,
    pub award_id: String,
    /// The signed profile-badges record that was published.
    pub record: Event,
}

/// Runs the request, record, sign and publish sequence for one claim link.
pub struct BadgeClaimer {
    service: Arc<dyn BadgeService>,
    nostr: Arc<dyn NostrClient>,
    signer: Arc<dyn Signer>,
    timeout: Duration,
}

impl BadgeClaimer {
    pub fn new(
        service: Arc<dyn BadgeService>,
        nostr: Arc<dyn NostrClient>,
        signer: Arc<dyn Signer>,
        timeout: Duration,
    ) -> Self {
        Self {
            service,
            nostr,
            signer,
            timeout,
        }
    }

    /// Claim the badge behind `claim_url`. Nothing is published unless every
    /// earlier step succeeded.
    pub async fn claim(
        &self,
        claim_url: &str,
        identity: &Identity,
        lightning_domain: &str,
    ) -> Result<ClaimReceipt, ClaimError> {
        let url = Url::parse(claim_url).map_err(|e| ClaimError::MalformedUrl(e.to_string()))?;
        let badge_id = raw_param(&url, "definitionid")
            .and_then(decode)
            .map(|id| id.into_owned())
            .ok_or(ClaimError::MissingDefinitionId)?;
        let credential = identity
            .credential(lightning_domain)
            .ok_or(ClaimError::NoIdentity)?;
        let origin = url.origin().ascii_serialization();

        let award = self
            .bounded(self.service.request_badge(&origin, &credential, &badge_id))
            .await??;

        check_award(&award)?;

        let own_key = self.signer.public_key().to_string();
        let address = find_badge_address(&award, &[own_key.as_str(), credential.value()])
            .ok_or_else(|| {
                warn!(award = %award.id, "badge award has no address for this identity");
                ClaimError::MissingBadgeAddress
            })?;

        let filter = Filter::new()
            .kind(kinds::PROFILE_BADGES)
            .author(own_key.clone())
            .identifier(PROFILE_BADGES_ID);
        let existing = self
            .bounded(self.nostr.fetch_event(&filter))
            .await?
            .map_err(|e| ClaimError::Remote(e.to_string()))?;

        let tags = append_badge_tags(existing.map(|event| event.tags), &address, &award.id);
        let unsigned = UnsignedEvent::new(own_key, kinds::PROFILE_BADGES, tags, "");
        let record = self
            .signer
            .sign(unsigned)
            .await
            .map_err(|e| ClaimError::Signing(e.to_string()))?;

        self.bounded(self.nostr.publish(&record))
            .await?
            .map_err(|e| ClaimError::Publish(e.to_string()))?;

        info!(badge = %badge_id, address = %address, "badge claimed");
        Ok(ClaimReceipt {
            badge_id,
            address,
            award_id: award.id,
            record,
        })
    }

    async fn bounded<F: Future>(&self, fut: F) -> Result<F::Output, ClaimError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| ClaimError::Timeout)
    }
}

/// The award must be a badge-award event whose id and signature hold, since
/// its id ends up in the caller's signed record.
fn check_award(award: &Event) -> Result<(), ClaimError> {
    if award.kind != kinds::BADGE_AWARD {
        warn!(kind = award.kind, "badge service returned a non-award event");
        return Err(ClaimError::InvalidAward(format!("unexpected kind {}", award.kind)));
    }
    award.verify().map_err(|e| {
        warn!(award = %award.id, error = %e, "badge award failed verification");
        ClaimError::InvalidAward(e.to_string())
    })
}

/// First `a` tag of the award that mentions one of `needles`.
pub fn find_badge_address(award: &Event, needles: &[&str]) -> Option<String> {
    award
        .tag_values("a")
        .into_iter()
        .find(|address| needles.iter().any(|n| !n.is_empty() && address.contains(n)))
        .map(str::to_string)
}

/// Append `["a", address]` and `["e", award_id]` to the prior record's tags,
/// starting a fresh `d` tag when there was no record. Prior tags keep their
/// order and tags already present are not repeated.
pub fn append_badge_tags(prior: Option<Vec<Tag>>, address: &str, award_id: &str) -> Vec<Tag> {
    let mut tags =
        prior.unwrap_or_else(|| vec![vec!["d".to_string(), PROFILE_BADGES_ID.to_string()]]);

    for tag in [
        vec!["a".to_string(), address.to_string()],
        vec!["e".to_string(), award_id.to_string()],
    ] {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}
