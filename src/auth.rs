//! Tokens returned by the authorization-code exchange and their redacting wrapper.

pub mod grant;

pub use grant::*;
