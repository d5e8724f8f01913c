//! The SimpleID strategy: configuration plus profile loading on top of [`OAuth2Client`].
//!
//! The strategy composes a generic OAuth2 client instead of specializing one. All
//! protocol work (authorize URL, code exchange, authenticated GET) is delegated to the
//! client; the strategy only knows where SimpleID keeps the profile and how to read it.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::ProviderHttpClient,
	oauth::{Endpoint, OAuth2Client, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{PROVIDER_NAME, Profile, SimpleIdConfig},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Strategy specialized for the crate's default reqwest transport stack.
#[cfg(feature = "reqwest")]
pub type ReqwestSimpleIdStrategy = SimpleIdStrategy<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Authenticates users against SimpleID and normalizes their profile.
///
/// The strategy is immutable after construction and can be shared across tasks; every
/// call runs independently and performs its own provider requests.
pub struct SimpleIdStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) config: Arc<SimpleIdConfig>,
	pub(crate) oauth2: OAuth2Client<C, M>,
}
impl<C, M> SimpleIdStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a strategy that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: SimpleIdConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		let config = Arc::new(config);
		let oauth2 = OAuth2Client::new(config.clone(), http_client, mapper);

		Self { config, oauth2 }
	}

	/// Name under which the strategy registers with an authentication pipeline.
	pub fn name(&self) -> &'static str {
		PROVIDER_NAME
	}

	/// Configuration the strategy was built from.
	pub fn config(&self) -> &SimpleIdConfig {
		&self.config
	}

	/// Underlying OAuth2 client.
	pub fn oauth2(&self) -> &OAuth2Client<C, M> {
		&self.oauth2
	}

	/// Retrieves the user's profile from SimpleID and normalizes it.
	///
	/// Performs exactly one `GET` against the configured profile URL with the access
	/// token in the `Authorization` header. Transport failures and non-success statuses
	/// surface as [`Error::ProfileFetch`]; bodies that are not the expected JSON document
	/// surface as [`Error::MalformedProfile`]. Those are the only two outcomes of a request.
	///
	/// # Precondition
	///
	/// `access_token` must be non-empty. An empty token is a caller bug, not a provider
	/// failure: it is refused with [`ConfigError::EmptyAccessToken`] before any request is
	/// sent, and neither profile error kind is produced.
	pub async fn user_profile(&self, access_token: &str) -> Result<Profile> {
		const KIND: FlowKind = FlowKind::UserProfile;

		if access_token.is_empty() {
			return Err(ConfigError::EmptyAccessToken.into());
		}

		let span = FlowSpan::new(KIND, "user_profile").with_endpoint(Endpoint::UserProfile);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let body = self
					.oauth2
					.get(self.config.user_profile_url(), access_token)
					.await
					.map_err(Error::ProfileFetch)?;

				Profile::parse(body)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
#[cfg(feature = "reqwest")]
impl SimpleIdStrategy<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a strategy with its own reqwest-backed transport.
	pub fn new(config: SimpleIdConfig) -> Result<Self> {
		Ok(Self::with_http_client(
			config,
			ReqwestHttpClient::without_redirects()?,
			ReqwestTransportErrorMapper,
		))
	}
}
impl<C, M> Debug for SimpleIdStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SimpleIdStrategy")
			.field("name", &PROVIDER_NAME)
			.field("config", &self.config)
			.finish()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;
	use crate::{_preludet::*, error::ProfileFetchError};

	fn strategy(server: &MockServer) -> ReqwestTestStrategy {
		let config =
			SimpleIdConfig::builder("client", "secret", "https://app.example.com/callback")
				.user_profile_url(server.url("/1/user"))
				.build()
				.expect("Mock configuration should be valid.");

		build_reqwest_test_strategy(config)
	}

	#[tokio::test]
	async fn empty_access_token_is_rejected_without_a_request() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(GET).path("/1/user");
				then.status(200).body("{}");
			})
			.await;
		let err = strategy(&server)
			.user_profile("")
			.await
			.expect_err("Empty access tokens should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::EmptyAccessToken)));
		assert_eq!(mock.hits_async().await, 0);
	}

	#[tokio::test]
	async fn server_errors_are_fetch_failures() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(GET).path("/1/user");
				then.status(401).body("{\"error\":\"invalid_token\"}");
			})
			.await;
		let err = strategy(&server)
			.user_profile("expired-token")
			.await
			.expect_err("Non-success statuses should fail the profile request.");

		mock.assert_async().await;

		match err {
			Error::ProfileFetch(ProfileFetchError::Status { status, body }) => {
				assert_eq!(status, 401);
				assert!(body.contains("invalid_token"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn strategy_reports_its_name() {
		let config = SimpleIdConfig::builder("client", "secret", "https://app.example.com/cb")
			.build()
			.expect("Configuration should be valid.");
		let strategy = SimpleIdStrategy::new(config).expect("Strategy should build.");

		assert_eq!(strategy.name(), "simpleid");
		assert_eq!(strategy.config().client_id(), "client");
	}
}
