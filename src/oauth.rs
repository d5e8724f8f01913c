//! Generic OAuth 2.0 client composed by the strategy.
//!
//! [`OAuth2Client`] owns a configured [`oauth2::basic::BasicClient`] plus the pluggable
//! transport, and exposes the three protocol operations a login needs: building the
//! authorize URL, exchanging an authorization code, and issuing an authenticated GET with
//! the access token carried in the `Authorization` header.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret,
	EndpointNotSet, EndpointSet, HttpClientError, PkceCodeVerifier, RedirectUrl,
	RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicErrorResponseType, BasicRequestTokenError},
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION},
	},
};
// self
use crate::{
	_prelude::*,
	auth::TokenGrant,
	error::{ProfileFetchError, TransientError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	obs,
	provider::SimpleIdConfig,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Provider endpoint targeted by a request, passed to [`TransportErrorMapper`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	/// Token endpoint (authorization-code exchange).
	Token,
	/// User profile endpoint.
	UserProfile,
}
impl Endpoint {
	/// Returns a stable label for logs and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Token => "token",
			Endpoint::UserProfile => "user_profile",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Maps HTTP transport failures into [`TransportError`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport.
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> TransportError;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		_endpoint: Endpoint,
		_metadata: Option<&ResponseMetadata>,
		error: HttpClientError<ReqwestError>,
	) -> TransportError {
		match error {
			HttpClientError::Reqwest(inner) => TransportError::from(*inner),
			HttpClientError::Http(inner) => TransportError::Request(inner),
			HttpClientError::Io(inner) => TransportError::Io(inner),
			HttpClientError::Other(message) => TransportError::Other { message },
			_ => TransportError::Other { message: "unrecognized transport failure".into() },
		}
	}
}

/// OAuth 2.0 client bound to one provider configuration and one transport.
pub struct OAuth2Client<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: ConfiguredBasicClient,
	config: Arc<SimpleIdConfig>,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> OAuth2Client<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Configures the client from validated strategy configuration.
	///
	/// Client credentials travel in the token request body, and the callback URL is
	/// registered as the redirect URI for both the authorize URL and the exchange.
	pub fn new(
		config: Arc<SimpleIdConfig>,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Self {
		let auth_url = AuthUrl::from_url(config.authorization_url().clone());
		let token_url = TokenUrl::from_url(config.token_url().clone());
		let redirect_url = RedirectUrl::from_url(config.callback_url().clone());
		let oauth_client = BasicClient::new(ClientId::new(config.client_id().to_owned()))
			.set_client_secret(ClientSecret::new(config.client_secret().expose().to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url)
			.set_redirect_uri(redirect_url)
			.set_auth_type(AuthType::RequestBody);

		let http_client = http_client.into();
		let error_mapper = error_mapper.into();

		Self { oauth_client, config, http_client, error_mapper }
	}

	/// Configuration the client was built from.
	pub fn config(&self) -> &SimpleIdConfig {
		&self.config
	}

	/// Builds the provider authorize URL for a login attempt.
	///
	/// Scopes are joined with the configured separator; the `scope` parameter is omitted
	/// when nothing is requested. `pkce` carries the `(challenge, method)` pair.
	pub fn authorize_url<S>(&self, scope: &[S], state: &str, pkce: Option<(&str, &str)>) -> Url
	where
		S: AsRef<str>,
	{
		let mut url = self.config.authorization_url().clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", "code");
		pairs.append_pair("client_id", self.config.client_id());
		pairs.append_pair("redirect_uri", self.config.callback_url().as_str());

		if let Some(scope_value) = self.config.format_scope(scope) {
			pairs.append_pair("scope", &scope_value);
		}

		pairs.append_pair("state", state);

		if let Some((challenge, method)) = pkce {
			pairs.append_pair("code_challenge", challenge);
			pairs.append_pair("code_challenge_method", method);
		}

		drop(pairs);

		url
	}

	/// Exchanges an authorization code for tokens.
	pub async fn exchange_code(&self, code: &str, pkce_verifier: Option<&str>) -> Result<TokenGrant> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let mut request = self.oauth_client.exchange_code(AuthorizationCode::new(code.to_owned()));

		if let Some(verifier) = pkce_verifier {
			request = request.set_pkce_verifier(PkceCodeVerifier::new(verifier.to_owned()));
		}

		let response = request.request_async(&instrumented).await;
		let meta = meta.take();

		if let Some(status) = meta.as_ref().and_then(|meta| meta.status) {
			obs::record_http_status(status);
		}

		let response = response.map_err(|err| self.map_request_error(meta, err))?;
		let issued_at = OffsetDateTime::now_utc();
		let mut grant = TokenGrant::new(
			response.access_token().secret().to_owned(),
			response.token_type().as_ref().to_owned(),
		);

		if let Some(refresh) = response.refresh_token() {
			grant = grant.with_refresh_token(refresh.secret().to_owned());
		}
		if let Some(expires_in) = response.expires_in() {
			let lifetime = Duration::try_from(expires_in)
				.map_err(|_| TransientError::TokenEndpoint {
					message: "expires_in exceeds the supported range".into(),
					status: None,
					retry_after: None,
				})?;

			grant = grant.expires_in(issued_at, lifetime);
		}
		if let Some(scopes) = response.scopes() {
			grant = grant.with_scope(scopes.iter().map(|scope| scope.as_str().to_owned()));
		}

		Ok(grant)
	}

	/// Issues a GET to `url`, authenticating with `access_token` in the `Authorization`
	/// header, and returns the body of a successful response.
	///
	/// The token is never placed in the query string. Exactly one request is made.
	pub async fn get(&self, url: &Url, access_token: &str) -> Result<String, ProfileFetchError> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let request = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(AUTHORIZATION, format!("Bearer {access_token}"))
			.header(ACCEPT, "application/json")
			.body(Vec::new())
			.map_err(TransportError::from)?;
		let response = instrumented.call(request).await.map_err(|err| {
			self.error_mapper.map_transport_error(Endpoint::UserProfile, meta.take().as_ref(), err)
		})?;
		let status = response.status();
		let body = response.into_body();

		obs::record_http_status(status.as_u16());

		if !status.is_success() {
			return Err(ProfileFetchError::Status {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&body).into_owned(),
			});
		}

		Ok(String::from_utf8(body)?)
	}

	fn map_request_error(
		&self,
		meta: Option<ResponseMetadata>,
		err: BasicRequestTokenError<HttpClientError<C::TransportError>>,
	) -> Error {
		let meta = meta.as_ref();

		match err {
			RequestTokenError::ServerResponse(response) => map_server_response_error(response, meta),
			RequestTokenError::Request(error) =>
				self.error_mapper.map_transport_error(Endpoint::Token, meta, error).into(),
			RequestTokenError::Parse(source, _body) =>
				TransientError::TokenResponseParse { source, status: meta_status(meta) }.into(),
			RequestTokenError::Other(message) => TransientError::TokenEndpoint {
				message,
				status: meta_status(meta),
				retry_after: meta_retry_after(meta),
			}
			.into(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl OAuth2Client<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by a reqwest transport that does not follow redirects.
	pub fn with_reqwest(config: Arc<SimpleIdConfig>) -> Result<Self> {
		Ok(Self::new(config, ReqwestHttpClient::without_redirects()?, ReqwestTransportErrorMapper))
	}
}
impl<C, M> Debug for OAuth2Client<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Client").field("config", &self.config).finish()
	}
}

fn map_server_response_error(response: BasicErrorResponse, meta: Option<&ResponseMetadata>) -> Error {
	let reason = match response.error_description() {
		Some(description) => description.clone(),
		None => response.error().as_ref().to_owned(),
	};

	match response.error() {
		BasicErrorResponseType::InvalidGrant => Error::InvalidGrant { reason },
		BasicErrorResponseType::InvalidClient | BasicErrorResponseType::UnauthorizedClient =>
			Error::InvalidClient { reason },
		BasicErrorResponseType::InvalidScope => Error::InsufficientScope { reason },
		BasicErrorResponseType::Extension(code) if code.eq_ignore_ascii_case("access_denied") =>
			Error::InvalidGrant { reason },
		_ => TransientError::TokenEndpoint {
			message: format!("OAuth error `{}`: {reason}", response.error().as_ref()),
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}
