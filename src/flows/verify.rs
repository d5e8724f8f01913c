//! Verify callback contract and the values exchanged with it.

// self
use crate::{_prelude::*, auth::TokenGrant, error::BoxError, provider::Profile};

/// Future returned by [`Verify::verify`].
pub type VerifyFuture<'a, U> =
	Pin<Box<dyn Future<Output = Result<Option<U>, BoxError>> + 'a + Send>>;

/// Application hook that turns tokens and a profile into an application user.
///
/// Return `Ok(Some(user))` to accept the login, `Ok(None)` to reject it (for example an
/// unknown or disabled account), or `Err(..)` when the lookup itself failed. The profile is
/// `None` only when the configuration skips the profile request.
///
/// Any `Fn(TokenGrant, Option<Profile>) -> Future` closure implements the trait.
pub trait Verify: Send + Sync {
	/// Application user type produced on success.
	type User;

	/// Resolves the application user for the authenticated SimpleID account.
	fn verify(&self, grant: TokenGrant, profile: Option<Profile>) -> VerifyFuture<'_, Self::User>;
}
impl<F, Fut, U> Verify for F
where
	F: Send + Sync + Fn(TokenGrant, Option<Profile>) -> Fut,
	Fut: 'static + Send + Future<Output = Result<Option<U>, BoxError>>,
{
	type User = U;

	fn verify(&self, grant: TokenGrant, profile: Option<Profile>) -> VerifyFuture<'_, U> {
		Box::pin(self(grant, profile))
	}
}

/// Query parameters delivered to the callback URL.
///
/// Deserialize it straight from the callback query string; unknown parameters are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
	/// Authorization code issued by the provider.
	#[serde(default)]
	pub code: Option<String>,
	/// State echoed back by the provider.
	#[serde(default)]
	pub state: Option<String>,
	/// OAuth error code when the user or provider aborted the authorization.
	#[serde(default)]
	pub error: Option<String>,
	/// Human readable error description accompanying `error`.
	#[serde(default)]
	pub error_description: Option<String>,
}
impl CallbackParams {
	/// Builds parameters for a successful redirect.
	pub fn code(code: impl Into<String>, state: impl Into<String>) -> Self {
		Self { code: Some(code.into()), state: Some(state.into()), ..Default::default() }
	}

	/// Builds parameters for a redirect that carries an OAuth error.
	pub fn error(error: impl Into<String>, description: Option<String>) -> Self {
		Self { error: Some(error.into()), error_description: description, ..Default::default() }
	}

	/// Parses parameters from a raw query string (without the leading `?`).
	pub fn from_query(query: &str) -> Self {
		let mut params = Self::default();

		for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
			let slot = match &*key {
				"code" => &mut params.code,
				"state" => &mut params.state,
				"error" => &mut params.error,
				"error_description" => &mut params.error_description,
				_ => continue,
			};

			*slot = Some(value.into_owned());
		}

		params
	}
}

/// Result of handling an authorization callback.
#[derive(Debug)]
pub enum AuthOutcome<U> {
	/// The verify callback accepted the login.
	Success {
		/// Application user returned by the verify callback.
		user: U,
		/// Tokens issued by the provider.
		grant: TokenGrant,
	},
	/// The login was rejected by the user, the provider, or the verify callback.
	Failure {
		/// Why the login did not succeed.
		message: String,
	},
}
impl<U> AuthOutcome<U> {
	/// Returns `true` for [`AuthOutcome::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, AuthOutcome::Success { .. })
	}

	/// Returns the user for successful outcomes.
	pub fn into_user(self) -> Option<U> {
		match self {
			AuthOutcome::Success { user, .. } => Some(user),
			AuthOutcome::Failure { .. } => None,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn callback_params_parse_from_query() {
		let params = CallbackParams::from_query("code=abc%2B1&state=xyz&extra=ignored");

		assert_eq!(params, CallbackParams::code("abc+1", "xyz"));

		let params =
			CallbackParams::from_query("error=access_denied&error_description=User+denied+access");

		assert_eq!(
			params,
			CallbackParams::error("access_denied", Some("User denied access".into()))
		);
	}

	#[test]
	fn callback_params_deserialize_with_missing_fields() {
		let params: CallbackParams = serde_json::from_str(r#"{"code":"abc","other":1}"#)
			.expect("Callback parameters should tolerate missing and unknown fields.");

		assert_eq!(params.code.as_deref(), Some("abc"));
		assert_eq!(params.state, None);
	}

	#[tokio::test]
	async fn closures_implement_verify() {
		let verify = |grant: TokenGrant, profile: Option<Profile>| async move {
			Ok::<_, BoxError>(profile.map(|profile| (grant.token_type, profile.id)))
		};
		let user = verify
			.verify(TokenGrant::new("access", "bearer"), None)
			.await
			.expect("Verify closure should not fail.");

		assert_eq!(user, None);
	}

	#[test]
	fn outcome_helpers() {
		let success = AuthOutcome::Success { user: 7, grant: TokenGrant::new("a", "bearer") };
		let failure = AuthOutcome::<u8>::Failure { message: "denied".into() };

		assert!(success.is_success());
		assert_eq!(success.into_user(), Some(7));
		assert!(!failure.is_success());
		assert_eq!(failure.into_user(), None);
	}
}
