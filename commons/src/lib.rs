//! Shared low-level helpers reused by `agentstream-core`.
//!
//! Kept as a separate crate so the secret-redaction battery can be reused
//! (and tested) without pulling in the streaming/provider machinery, the
//! same way `vtcode-commons` is split out from `vtcode-core`.

pub mod redactor;

pub use redactor::{redact, Redactor};
