// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

const STATE_LEN: usize = 32;
const PKCE_VERIFIER_LEN: usize = 64;

/// Supported PKCE challenge methods surfaced via [`AuthorizationRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}

/// Redirect data returned by
/// [`SimpleIdStrategy::start_authorization`](crate::provider::SimpleIdStrategy::start_authorization).
///
/// Callers keep the request (usually in the user's session) until the provider redirects
/// back, then pass it to `authenticate` together with the callback parameters.
#[derive(Clone)]
pub struct AuthorizationRequest {
	/// Scopes requested from the provider.
	pub scope: Vec<String>,
	/// Opaque state value that must round-trip via the redirect handler.
	pub state: String,
	/// Redirect URI embedded in the authorize URL.
	pub redirect_uri: Url,
	/// Fully-formed authorize URL that callers should send end-users to.
	pub authorize_url: Url,
	pkce: Option<PkcePair>,
}
impl AuthorizationRequest {
	pub(crate) fn new(
		scope: Vec<String>,
		state: String,
		redirect_uri: Url,
		authorize_url: Url,
		pkce: Option<PkcePair>,
	) -> Self {
		Self { scope, state, redirect_uri, authorize_url, pkce }
	}

	/// PKCE code challenge, when PKCE is enabled.
	pub fn code_challenge(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pkce| pkce.challenge.as_str())
	}

	/// PKCE challenge method, when PKCE is enabled.
	pub fn code_challenge_method(&self) -> Option<PkceCodeChallengeMethod> {
		self.pkce.as_ref().map(|pkce| pkce.method)
	}

	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(Error::StateMismatch) }
	}

	pub(crate) fn pkce_verifier(&self) -> Option<&str> {
		self.pkce.as_ref().map(|pkce| pkce.verifier.as_str())
	}
}
impl Debug for AuthorizationRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationRequest")
			.field("scope", &self.scope)
			.field("state", &self.state)
			.field("redirect_uri", &self.redirect_uri.as_str())
			.field("authorize_url", &self.authorize_url.as_str())
			.field("code_challenge", &self.code_challenge())
			.field("code_challenge_method", &self.code_challenge_method())
			.finish()
	}
}

#[derive(Clone)]
pub(crate) struct PkcePair {
	verifier: String,
	challenge: String,
	method: PkceCodeChallengeMethod,
}
impl PkcePair {
	pub(crate) fn generate() -> Self {
		let verifier = random_string(PKCE_VERIFIER_LEN);
		let challenge = compute_pkce_challenge(&verifier);

		Self { verifier, challenge, method: PkceCodeChallengeMethod::S256 }
	}

	pub(crate) fn challenge(&self) -> &str {
		&self.challenge
	}

	pub(crate) fn method(&self) -> PkceCodeChallengeMethod {
		self.method
	}
}

pub(crate) fn generate_state() -> String {
	random_string(STATE_LEN)
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

fn compute_pkce_challenge(verifier: &str) -> String {
	let digest = Sha256::digest(verifier.as_bytes());

	URL_SAFE_NO_PAD.encode(digest)
}
