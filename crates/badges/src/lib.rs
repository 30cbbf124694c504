//! Badge claiming: request an award from the badge service, then record it
//! in the caller's signed profile-badges list.

pub mod claim;
pub mod error;
pub mod service;

pub use claim::{append_badge_tags, find_badge_address, BadgeClaimer, ClaimReceipt, PROFILE_BADGES_ID};
pub use error::ClaimError;
pub use service::{BadgeService, HttpBadgeService};
