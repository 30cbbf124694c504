//! Signed social-protocol events for the LaWallet scan flow.
//!
//! Covers the subset of the relay protocol the wallet needs: the event
//! model with its canonical id, tag lookups, Schnorr signing with a local
//! key and a gateway client that fetches and publishes events over HTTP.

pub mod client;
pub mod error;
pub mod event;
pub mod filter;
pub mod signer;

pub use client::{GatewayClient, NostrClient};
pub use error::NostrError;
pub use event::{kinds, tag_value, tag_values, Event, Tag, UnsignedEvent};
pub use filter::Filter;
pub use signer::{LocalKeySigner, Signer};
