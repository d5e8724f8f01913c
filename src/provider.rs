//! SimpleID provider configuration (data), profile normalization, and the strategy (behavior).
//!
//! `config` exposes the validated, immutable [`SimpleIdConfig`] covering client credentials,
//! HTTPS-only endpoints (with SimpleID defaults), and scope formatting. `profile` maps the
//! provider's `{ "data": { .. } }` document into [`Profile`]. `strategy` wires both into
//! [`SimpleIdStrategy`], which owns the OAuth2 client used by every flow.

pub mod config;
pub mod profile;
pub mod strategy;

pub use config::*;
pub use profile::*;
pub use strategy::*;

/// Name under which the strategy registers with an authentication pipeline.
pub const PROVIDER_NAME: &str = "simpleid";
