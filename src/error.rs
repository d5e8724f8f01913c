//! Strategy-level error types shared across configuration, flows, and profile loading.

// self
use crate::_prelude::*;

/// Strategy-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used for transport- and caller-supplied failure sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical strategy error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary token endpoint failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS) while calling the token endpoint.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The profile endpoint could not be reached or answered with a failure.
	#[error("Failed to fetch user profile.")]
	ProfileFetch(#[source] ProfileFetchError),
	/// The profile endpoint answered, but its body is not the expected JSON document.
	#[error(transparent)]
	MalformedProfile(#[from] serde_json::Error),

	/// Provider rejected the grant (e.g., bad or reused authorization code).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Requested scopes exceed what the provider grants.
	#[error("Provider refused the requested scopes: {reason}.")]
	InsufficientScope {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Authorization redirect came back with an OAuth error other than `access_denied`.
	#[error("Authorization failed with `{code}`.")]
	Authorization {
		/// OAuth `error` parameter.
		code: String,
		/// OAuth `error_description` parameter, if present.
		description: Option<String>,
	},
	/// Callback `state` does not match the one issued with the authorization request.
	#[error("Authorization state mismatch.")]
	StateMismatch,
	/// Callback carried neither an authorization code nor an error.
	#[error("Authorization callback is missing the code parameter.")]
	MissingCode,
	/// Caller-supplied verify callback failed.
	#[error("Verify callback failed.")]
	Verify(#[source] BoxError),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A required option was missing or empty.
	#[error("The `{option}` option is required.")]
	MissingOption {
		/// Option name as it appears in the configuration.
		option: &'static str,
	},
	/// An endpoint or callback option does not parse as a URL.
	#[error("The `{option}` option is not a valid URL.")]
	InvalidUrl {
		/// Option name as it appears in the configuration.
		option: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The `{option}` endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Option name as it appears in the configuration.
		option: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Scope separators must be non-empty printable text.
	#[error("Scope separator must be non-empty printable text.")]
	InvalidScopeSeparator {
		/// Separator that was supplied.
		separator: String,
	},
	/// Access token handed to the profile loader was empty.
	#[error("Access token must not be empty.")]
	EmptyAccessToken,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary token endpoint failures (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider returned an unexpected but non-fatal response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Provider- or strategy-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO, request construction).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client gave up waiting for the provider.
	#[error("Request to the provider timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// HTTP request could not be assembled.
	#[error("HTTP request could not be built.")]
	Request(#[from] oauth2::http::Error),
	/// Transport reported a failure without a structured cause.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Reasons the profile request failed before a body could be parsed.
#[derive(Debug, ThisError)]
pub enum ProfileFetchError {
	/// Transport failed to deliver the request or read the response.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Profile endpoint answered with a non-success status.
	#[error("Profile endpoint responded with HTTP {status}.")]
	Status {
		/// HTTP status code returned by the provider.
		status: u16,
		/// Response body, kept for diagnostics.
		body: String,
	},
	/// Profile endpoint returned bytes that are not UTF-8 text.
	#[error("Profile endpoint returned a body that is not UTF-8.")]
	Body(#[from] std::string::FromUtf8Error),
}
impl From<ProfileFetchError> for Error {
	fn from(e: ProfileFetchError) -> Self {
		Self::ProfileFetch(e)
	}
}
