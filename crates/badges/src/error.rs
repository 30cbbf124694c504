use thiserror::Error;

/// Why a badge claim attempt failed. The display text is shown to the user
/// next to the retry prompt.
#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("Malformed claim link: {0}")]
    MalformedUrl(String),

    #[error("Claim link has no badge definition")]
    MissingDefinitionId,

    #[error("No identity to claim the badge with")]
    NoIdentity,

    #[error("Badge service failed: {0}")]
    Remote(String),

    #[error("Claim failed: timeout")]
    Timeout,

    #[error("Badge claiming is not available")]
    Unavailable,

    #[error("Invalid badge award: {0}")]
    InvalidAward(String),

    #[error("Badge award does not reference this identity")]
    MissingBadgeAddress,

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Publish failed: {0}")]
    Publish(String),
}
