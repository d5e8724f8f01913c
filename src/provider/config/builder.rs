// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::ConfigError,
	provider::config::{
		DEFAULT_AUTHORIZATION_URL, DEFAULT_SCOPE_SEPARATOR, DEFAULT_TOKEN_URL,
		DEFAULT_USER_PROFILE_URL, SimpleIdConfig,
	},
};

/// Builder for [`SimpleIdConfig`] values.
///
/// Every option is kept as raw text until [`build`](Self::build), which parses and
/// validates the whole set at once. The builder doubles as the serde representation of
/// the configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleIdConfigBuilder {
	#[serde(alias = "clientID")]
	client_id: String,
	#[serde(alias = "clientSecret")]
	client_secret: String,
	#[serde(alias = "callbackURL")]
	callback_url: String,
	#[serde(default, alias = "authorizationURL")]
	authorization_url: Option<String>,
	#[serde(default, alias = "tokenURL")]
	token_url: Option<String>,
	#[serde(default, alias = "userProfileURL")]
	user_profile_url: Option<String>,
	#[serde(default, alias = "scopeSeparator")]
	scope_separator: Option<String>,
	#[serde(default)]
	scope: Vec<String>,
	#[serde(default)]
	pkce: bool,
	#[serde(default, alias = "skipUserProfile")]
	skip_user_profile: bool,
}
impl SimpleIdConfigBuilder {
	/// Creates a new builder seeded with the required options.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		callback_url: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			callback_url: callback_url.into(),
			..Default::default()
		}
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_url(mut self, url: impl Into<String>) -> Self {
		self.authorization_url = Some(url.into());

		self
	}

	/// Overrides the token endpoint.
	pub fn token_url(mut self, url: impl Into<String>) -> Self {
		self.token_url = Some(url.into());

		self
	}

	/// Overrides the user profile endpoint.
	pub fn user_profile_url(mut self, url: impl Into<String>) -> Self {
		self.user_profile_url = Some(url.into());

		self
	}

	/// Overrides the scope separator (defaults to `,`).
	pub fn scope_separator(mut self, separator: impl Into<String>) -> Self {
		self.scope_separator = Some(separator.into());

		self
	}

	/// Sets the scopes requested when a flow does not pass its own.
	pub fn scope<I, S>(mut self, scope: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scope = scope.into_iter().map(Into::into).collect();

		self
	}

	/// Enables PKCE (S256) on authorization requests.
	pub fn pkce(mut self, enabled: bool) -> Self {
		self.pkce = enabled;

		self
	}

	/// Skips the profile request after the code exchange.
	pub fn skip_user_profile(mut self, skip: bool) -> Self {
		self.skip_user_profile = skip;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<SimpleIdConfig, ConfigError> {
		let client_id = require("client_id", self.client_id)?;
		let client_secret = require("client_secret", self.client_secret)?;
		let callback_url = require("callback_url", self.callback_url)?;
		let callback_url = Url::parse(&callback_url)
			.map_err(|source| ConfigError::InvalidUrl { option: "callback_url", source })?;
		let authorization_url = endpoint(
			"authorization_url",
			self.authorization_url.as_deref().unwrap_or(DEFAULT_AUTHORIZATION_URL),
		)?;
		let token_url = endpoint("token_url", self.token_url.as_deref().unwrap_or(DEFAULT_TOKEN_URL))?;
		let user_profile_url = endpoint(
			"user_profile_url",
			self.user_profile_url.as_deref().unwrap_or(DEFAULT_USER_PROFILE_URL),
		)?;
		let scope_separator =
			self.scope_separator.unwrap_or_else(|| DEFAULT_SCOPE_SEPARATOR.to_owned());

		validate_scope_separator(&scope_separator)?;

		Ok(SimpleIdConfig {
			client_id,
			client_secret: TokenSecret::new(client_secret),
			callback_url,
			authorization_url,
			token_url,
			user_profile_url,
			scope_separator,
			scope: self.scope,
			pkce: self.pkce,
			skip_user_profile: self.skip_user_profile,
		})
	}
}
impl TryFrom<SimpleIdConfigBuilder> for SimpleIdConfig {
	type Error = ConfigError;

	fn try_from(builder: SimpleIdConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

fn require(option: &'static str, value: String) -> Result<String, ConfigError> {
	if value.trim().is_empty() { Err(ConfigError::MissingOption { option }) } else { Ok(value) }
}

fn endpoint(option: &'static str, raw: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { option, source })?;

	if url.scheme() != "https" {
		return Err(ConfigError::InsecureEndpoint { option, url: url.to_string() });
	}

	Ok(url)
}

fn validate_scope_separator(separator: &str) -> Result<(), ConfigError> {
	if separator.is_empty() || separator.chars().any(char::is_control) {
		Err(ConfigError::InvalidScopeSeparator { separator: separator.to_owned() })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn overrides_replace_defaults() {
		let config = SimpleIdConfig::builder("client", "secret", "https://app.example.com/cb")
			.authorization_url("https://sso.example.com/authorize")
			.token_url("https://sso.example.com/token")
			.user_profile_url("https://api.example.com/me")
			.scope_separator(" ")
			.scope(["read", "email"])
			.pkce(true)
			.skip_user_profile(true)
			.build()
			.expect("Overridden configuration should be valid.");

		assert_eq!(config.authorization_url().as_str(), "https://sso.example.com/authorize");
		assert_eq!(config.token_url().as_str(), "https://sso.example.com/token");
		assert_eq!(config.user_profile_url().as_str(), "https://api.example.com/me");
		assert_eq!(config.scope_separator(), " ");
		assert_eq!(config.scope(), ["read", "email"]);
		assert!(config.pkce());
		assert!(config.skip_user_profile());
	}

	#[test]
	fn required_options_must_be_present() {
		let err = SimpleIdConfig::builder(" ", "secret", "https://app.example.com/cb")
			.build()
			.expect_err("Blank client id should be rejected.");

		assert!(matches!(err, ConfigError::MissingOption { option: "client_id" }));

		let err = SimpleIdConfig::builder("client", "", "https://app.example.com/cb")
			.build()
			.expect_err("Empty client secret should be rejected.");

		assert!(matches!(err, ConfigError::MissingOption { option: "client_secret" }));

		let err = SimpleIdConfig::builder("client", "secret", "")
			.build()
			.expect_err("Empty callback should be rejected.");

		assert!(matches!(err, ConfigError::MissingOption { option: "callback_url" }));
	}

	#[test]
	fn endpoints_must_parse_and_use_https() {
		let err = SimpleIdConfig::builder("client", "secret", "https://app.example.com/cb")
			.token_url("http://id.example.com/token")
			.build()
			.expect_err("Plain HTTP token endpoints should be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { option: "token_url", .. }));

		let err = SimpleIdConfig::builder("client", "secret", "https://app.example.com/cb")
			.user_profile_url("not a url")
			.build()
			.expect_err("Unparsable profile endpoints should be rejected.");

		assert!(matches!(err, ConfigError::InvalidUrl { option: "user_profile_url", .. }));
	}

	#[test]
	fn callback_may_use_plain_http() {
		let config = SimpleIdConfig::builder("client", "secret", "http://localhost:3000/cb")
			.build()
			.expect("Local development callbacks should be accepted.");

		assert_eq!(config.callback_url().scheme(), "http");
	}

	#[test]
	fn scope_separator_must_be_printable() {
		for separator in ["", "\n"] {
			let err = SimpleIdConfig::builder("client", "secret", "https://app.example.com/cb")
				.scope_separator(separator)
				.build()
				.expect_err("Invalid separators should be rejected.");

			assert!(matches!(err, ConfigError::InvalidScopeSeparator { .. }));
		}
	}

	#[test]
	fn deserializes_passport_style_keys() {
		let config: SimpleIdConfig = serde_json::from_str(
			r#"{
				"clientID": "123-456-789",
				"clientSecret": "shhh-its-a-secret",
				"callbackURL": "https://www.example.net/auth/simpleid/callback",
				"userProfileURL": "https://api.example.net/user",
				"scopeSeparator": " "
			}"#,
		)
		.expect("Passport-style configuration should deserialize.");

		assert_eq!(config.client_id(), "123-456-789");
		assert_eq!(config.client_secret().expose(), "shhh-its-a-secret");
		assert_eq!(config.user_profile_url().as_str(), "https://api.example.net/user");
		assert_eq!(config.token_url().as_str(), DEFAULT_TOKEN_URL);
		assert_eq!(config.scope_separator(), " ");
	}

	#[test]
	fn deserialization_runs_validation() {
		let result = serde_json::from_str::<SimpleIdConfig>(
			r#"{
				"client_id": "client",
				"client_secret": "secret",
				"callback_url": "https://app.example.com/cb",
				"authorization_url": "http://id.example.com/authorize"
			}"#,
		);

		assert!(result.is_err());
		assert!(serde_json::from_str::<SimpleIdConfig>(r#"{"client_id": "client"}"#).is_err());
	}
}
