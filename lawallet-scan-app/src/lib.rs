//! Scan screen logic: one session per scanner, holding at most one pending
//! confirmation at a time.

pub mod cli;
pub mod session;

pub use session::{Effect, ScanSession, SessionState};
