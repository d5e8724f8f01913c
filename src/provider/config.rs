//! Immutable strategy configuration and the SimpleID endpoint defaults.
//!
//! Configuration is produced once at startup, either through [`SimpleIdConfigBuilder`] or
//! by deserializing the builder's fields (passport-style camel-case keys such as
//! `clientID` and `userProfileURL` are accepted as aliases). Both paths run the same
//! validation, so a [`SimpleIdConfig`] value is always usable as-is.

/// Builder API for assembling strategy configuration.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Default SimpleID authorization endpoint.
pub const DEFAULT_AUTHORIZATION_URL: &str = "https://id.schat.me/oauth/authorize";
/// Default SimpleID token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://id.schat.me/oauth/access_token";
/// Default SimpleID user profile endpoint.
pub const DEFAULT_USER_PROFILE_URL: &str = "https://api.schat.me/1/user";
/// Default separator used to join scopes in the authorization request.
pub const DEFAULT_SCOPE_SEPARATOR: &str = ",";

/// Validated strategy configuration; never mutated after construction.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SimpleIdConfigBuilder")]
pub struct SimpleIdConfig {
	pub(crate) client_id: String,
	pub(crate) client_secret: TokenSecret,
	pub(crate) callback_url: Url,
	pub(crate) authorization_url: Url,
	pub(crate) token_url: Url,
	pub(crate) user_profile_url: Url,
	pub(crate) scope_separator: String,
	pub(crate) scope: Vec<String>,
	pub(crate) pkce: bool,
	pub(crate) skip_user_profile: bool,
}
impl SimpleIdConfig {
	/// Creates a new builder seeded with the three required options.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		callback_url: impl Into<String>,
	) -> SimpleIdConfigBuilder {
		SimpleIdConfigBuilder::new(client_id, client_secret, callback_url)
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// OAuth 2.0 client secret; callers must avoid logging it.
	pub fn client_secret(&self) -> &TokenSecret {
		&self.client_secret
	}

	/// Redirect target registered with SimpleID.
	pub fn callback_url(&self) -> &Url {
		&self.callback_url
	}

	/// Authorization endpoint (default or override).
	pub fn authorization_url(&self) -> &Url {
		&self.authorization_url
	}

	/// Token endpoint (default or override).
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	/// User profile endpoint (default or override).
	pub fn user_profile_url(&self) -> &Url {
		&self.user_profile_url
	}

	/// Separator placed between scopes in the authorization request.
	pub fn scope_separator(&self) -> &str {
		&self.scope_separator
	}

	/// Scopes requested when the caller does not pass any.
	pub fn scope(&self) -> &[String] {
		&self.scope
	}

	/// Whether authorization requests carry a PKCE challenge.
	pub fn pkce(&self) -> bool {
		self.pkce
	}

	/// Whether the profile request is skipped after the code exchange.
	pub fn skip_user_profile(&self) -> bool {
		self.skip_user_profile
	}

	/// Joins scopes with the configured separator; `None` when nothing is requested.
	pub fn format_scope<S>(&self, scope: &[S]) -> Option<String>
	where
		S: AsRef<str>,
	{
		let mut buf = String::new();

		for value in scope.iter().map(AsRef::as_ref).filter(|value| !value.is_empty()) {
			if !buf.is_empty() {
				buf.push_str(&self.scope_separator);
			}

			buf.push_str(value);
		}

		if buf.is_empty() { None } else { Some(buf) }
	}
}
impl Debug for SimpleIdConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SimpleIdConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("callback_url", &self.callback_url.as_str())
			.field("authorization_url", &self.authorization_url.as_str())
			.field("token_url", &self.token_url.as_str())
			.field("user_profile_url", &self.user_profile_url.as_str())
			.field("scope_separator", &self.scope_separator)
			.field("scope", &self.scope)
			.field("pkce", &self.pkce)
			.field("skip_user_profile", &self.skip_user_profile)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config() -> SimpleIdConfig {
		SimpleIdConfig::builder("client", "secret", "https://app.example.com/callback")
			.build()
			.expect("Minimal configuration should be valid.")
	}

	#[test]
	fn defaults_apply_without_overrides() {
		let config = config();

		assert_eq!(config.authorization_url().as_str(), DEFAULT_AUTHORIZATION_URL);
		assert_eq!(config.token_url().as_str(), DEFAULT_TOKEN_URL);
		assert_eq!(config.user_profile_url().as_str(), DEFAULT_USER_PROFILE_URL);
		assert_eq!(config.scope_separator(), ",");
		assert!(config.scope().is_empty());
		assert!(!config.pkce());
		assert!(!config.skip_user_profile());
	}

	#[test]
	fn scope_formatting_uses_separator_and_skips_blanks() {
		let config = config();

		assert_eq!(config.format_scope(&["read", "", "email"]), Some("read,email".into()));
		assert_eq!(config.format_scope::<&str>(&[]), None);
		assert_eq!(config.format_scope(&[""]), None);

		let spaced = SimpleIdConfig::builder("client", "secret", "https://app.example.com/cb")
			.scope_separator(" ")
			.build()
			.expect("Space separator should be valid.");

		assert_eq!(spaced.format_scope(&["read", "email"]), Some("read email".into()));
	}

	#[test]
	fn debug_output_redacts_client_secret() {
		let rendered = format!("{:?}", config());

		assert!(rendered.contains("client"));
		assert!(!rendered.contains("\"secret\""));
	}
}
