//! Scan payload classification for the LaWallet QR scanner.
//!
//! A decoded QR string goes through [`classify`] together with a read-only
//! [`ScanContext`] and comes out as exactly one [`ClassifiedOutcome`].

pub mod classifier;
pub mod config;
pub mod identity;
pub mod outcome;
pub mod query;
pub mod routes;
pub mod transfer;

pub use classifier::{classify, classify_url, is_url, process_external_url, ScanContext};
pub use config::{ConfigError, ModulePubkeys, WalletConfig};
pub use identity::{Credential, Identity};
pub use outcome::ClassifiedOutcome;
pub use transfer::{detect_transfer_type, remove_lightning_standard, TransferType};
