//! Tokens handed to the verify callback after a successful code exchange.

// self
use crate::_prelude::*;

/// SimpleID credential (access token, refresh token or client secret) that never prints.
///
/// `Debug` and `Display` show a placeholder; serde stays transparent so an application can
/// persist a grant it received.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a credential string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw credential for placing on the wire. Do not log it.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenSecret(***)")
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("***")
	}
}

/// Tokens minted by the provider's token endpoint.
///
/// The grant travels to the verify callback next to the loaded profile, mirroring the
/// `(access_token, refresh_token, profile)` triple an authentication pipeline expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Token type reported by the provider (usually `bearer`).
	pub token_type: String,
	/// Expiry instant derived from `expires_in`, when the provider sent one.
	pub expires_at: Option<OffsetDateTime>,
	/// Scopes reported by the provider; empty when the response omitted them.
	pub scope: Vec<String>,
}
impl TokenGrant {
	/// Creates a grant carrying only an access token.
	pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: None,
			token_type: token_type.into(),
			expires_at: None,
			scope: Vec::new(),
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(refresh_token));

		self
	}

	/// Derives the expiry instant from a relative lifetime.
	pub fn expires_in(mut self, issued_at: OffsetDateTime, lifetime: Duration) -> Self {
		self.expires_at = issued_at.checked_add(lifetime);

		self
	}

	/// Records the scopes reported by the provider.
	pub fn with_scope<I, S>(mut self, scope: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scope = scope.into_iter().map(Into::into).collect();

		self
	}

	/// Returns `true` when the grant carries an expiry at or before `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}
}
