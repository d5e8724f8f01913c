//! Authorization-code login flow built on the strategy's OAuth2 client.
//!
//! [`SimpleIdStrategy::start_authorization`] produces the redirect (state plus optional
//! PKCE), and [`SimpleIdStrategy::authenticate`] consumes the provider's callback: it
//! checks for an error, verifies state, exchanges the code, loads the profile, and hands
//! everything to a caller-supplied [`Verify`] implementation.
//!
//! [`SimpleIdStrategy::start_authorization`]: crate::provider::SimpleIdStrategy::start_authorization
//! [`SimpleIdStrategy::authenticate`]: crate::provider::SimpleIdStrategy::authenticate

pub mod authorization;
pub mod verify;

pub use authorization::*;
pub use verify::*;
