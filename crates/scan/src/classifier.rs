//! Turns one decoded scan into one [`ClassifiedOutcome`].
//!
//! URLs run through [`URL_MATCHERS`] in priority order and the first matcher
//! that returns an outcome wins. Anything that is not a URL is treated as a
//! payment string.

use crate::config::WalletConfig;
use crate::identity::Identity;
use crate::outcome::ClassifiedOutcome;
use crate::query::{decode, raw_param};
use crate::routes;
use crate::transfer::{detect_transfer_type, remove_lightning_standard, TransferType};
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine};
use lawallet_nostr::{tag_value, tag_values, Tag};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use url::{Position, Url};

/// Subkind tag carried by card-transfer donation events.
pub const CARD_TRANSFER_DONATION: &str = "card_transfer_donation";

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://[^\s/$.?#][^\s]*$").expect("url pattern compiles")
});

/// Read-only state the classifier consults.
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub config: &'a WalletConfig,
    pub identity: &'a Identity,
}

impl<'a> ScanContext<'a> {
    pub fn new(config: &'a WalletConfig, identity: &'a Identity) -> Self {
        Self { config, identity }
    }
}

/// A scanned string that parsed as a URL.
pub struct ScannedUrl<'a> {
    pub raw: &'a str,
    pub url: Url,
}

type UrlMatcher = fn(&ScannedUrl<'_>, &ScanContext<'_>) -> Option<ClassifiedOutcome>;

/// URL matchers in priority order.
pub const URL_MATCHERS: &[(&str, UrlMatcher)] = &[
    ("event", match_event),
    ("card", match_card),
    ("badge_claim", match_badge_claim),
    ("own_origin", match_own_origin),
    ("external", match_external),
];

pub fn is_url(data: &str) -> bool {
    URL_PATTERN.is_match(data)
}

/// Classify one decoded scan.
pub fn classify(data: &str, ctx: &ScanContext<'_>) -> ClassifiedOutcome {
    let data = data.trim();
    if data.is_empty() {
        return ClassifiedOutcome::Ignored;
    }

    if is_url(data) {
        classify_url(data, ctx)
    } else {
        classify_payment(data, ctx)
    }
}

/// Run a URL through the matcher chain.
pub fn classify_url(raw: &str, ctx: &ScanContext<'_>) -> ClassifiedOutcome {
    let Some(scanned) = parse(raw) else {
        return ClassifiedOutcome::Ignored;
    };

    for (name, matcher) in URL_MATCHERS {
        if let Some(outcome) = matcher(&scanned, ctx) {
            debug!(matcher = *name, ?outcome, "url classified");
            return outcome;
        }
    }

    ClassifiedOutcome::Ignored
}

/// Handle a URL on a foreign origin. This is the last step of
/// [`classify_url`] and can also be called on its own for a URL already known
/// to be foreign. The `event` parameter is re-read and gated independently:
/// a verified donation event still routes internally, everything else waits
/// for the user to confirm.
pub fn process_external_url(raw: &str, ctx: &ScanContext<'_>) -> ClassifiedOutcome {
    let Some(scanned) = parse(raw) else {
        return ClassifiedOutcome::Ignored;
    };
    match raw_param(&scanned.url, "event") {
        Some(event) => route_event(&scanned, event, ctx),
        None => ClassifiedOutcome::external(scanned.raw),
    }
}

fn parse(raw: &str) -> Option<ScannedUrl<'_>> {
    match Url::parse(raw) {
        Ok(url) => Some(ScannedUrl { raw, url }),
        Err(e) => {
            debug!(error = %e, "malformed url ignored");
            None
        }
    }
}

fn classify_payment(data: &str, ctx: &ScanContext<'_>) -> ClassifiedOutcome {
    let clean = remove_lightning_standard(data);
    let outcome = match detect_transfer_type(clean, &ctx.config.lightning_domain) {
        TransferType::None => ClassifiedOutcome::Ignored,
        TransferType::Invoice => ClassifiedOutcome::navigate(routes::transfer_invoice(clean)),
        _ => ClassifiedOutcome::navigate(routes::transfer_lnurl(clean)),
    };
    debug!(?outcome, "payment string classified");
    outcome
}

fn match_event(scanned: &ScannedUrl<'_>, ctx: &ScanContext<'_>) -> Option<ClassifiedOutcome> {
    let event = raw_param(&scanned.url, "event")?;
    Some(route_event(scanned, event, ctx))
}

fn match_card(scanned: &ScannedUrl<'_>, _ctx: &ScanContext<'_>) -> Option<ClassifiedOutcome> {
    raw_param(&scanned.url, "c").map(|card| ClassifiedOutcome::navigate(routes::card_settings(card)))
}

fn match_badge_claim(scanned: &ScannedUrl<'_>, ctx: &ScanContext<'_>) -> Option<ClassifiedOutcome> {
    raw_param(&scanned.url, "definitionid")?;

    // Scheme, host and port must all equal the reserved origin.
    let reserved = Url::parse(&ctx.config.claim_badge_origin).ok()?;
    if scanned.url.origin() != reserved.origin() {
        debug!(origin = %scanned.url.origin().ascii_serialization(), "definitionid on a non-badge origin");
        return None;
    }
    if !ctx.identity.is_established() {
        debug!("badge link scanned without an identity");
        return None;
    }

    Some(ClassifiedOutcome::badge_claim(scanned.raw))
}

fn match_own_origin(scanned: &ScannedUrl<'_>, ctx: &ScanContext<'_>) -> Option<ClassifiedOutcome> {
    let own = Url::parse(&ctx.config.origin).ok()?;
    if scanned.url.origin() != own.origin() {
        return None;
    }
    Some(ClassifiedOutcome::navigate(&scanned.url[Position::BeforePath..]))
}

fn match_external(scanned: &ScannedUrl<'_>, ctx: &ScanContext<'_>) -> Option<ClassifiedOutcome> {
    Some(process_external_url(scanned.raw, ctx))
}

fn route_event(scanned: &ScannedUrl<'_>, event: &str, ctx: &ScanContext<'_>) -> ClassifiedOutcome {
    match check_donation(event, &ctx.config.module_pubkeys.card) {
        DonationCheck::Trusted => ClassifiedOutcome::navigate(routes::card_donation(event)),
        DonationCheck::Untrusted => ClassifiedOutcome::external(scanned.raw),
        DonationCheck::Malformed => ClassifiedOutcome::Ignored,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DonationCheck {
    Trusted,
    Untrusted,
    Malformed,
}

#[derive(Deserialize)]
struct EventTags {
    #[serde(default)]
    tags: Vec<Tag>,
}

/// The event must carry the donation subkind and name the card module.
fn check_donation(raw: &str, card_pubkey: &str) -> DonationCheck {
    let Some(tags) = decode_event_tags(raw) else {
        debug!("undecodable event parameter ignored");
        return DonationCheck::Malformed;
    };

    let subkind = tag_value(&tags, "t");
    let recipients = tag_values(&tags, "p");
    if subkind == Some(CARD_TRANSFER_DONATION)
        && recipients.iter().any(|p| p.eq_ignore_ascii_case(card_pubkey))
    {
        DonationCheck::Trusted
    } else {
        debug!(?subkind, "event parameter failed the donation check");
        DonationCheck::Untrusted
    }
}

fn decode_event_tags(raw: &str) -> Option<Vec<Tag>> {
    let text = decode(raw)?;
    let bytes = STANDARD_NO_PAD.decode(text.trim_end_matches('=')).ok()?;
    let event: EventTags = serde_json::from_slice(&bytes).ok()?;
    Some(event.tags)
}
