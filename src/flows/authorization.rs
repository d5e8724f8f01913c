//! Authorization-code orchestration: redirect construction and callback handling.

mod session;

pub use session::*;

// self
use crate::{
	_prelude::*,
	flows::{AuthOutcome, CallbackParams, Verify},
	http::ProviderHttpClient,
	oauth::{Endpoint, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::SimpleIdStrategy,
};

const ACCESS_DENIED: &str = "access_denied";

impl<C, M> SimpleIdStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Starts a login by building the provider redirect.
	///
	/// `scope` overrides the configured default scopes when supplied. A fresh state value
	/// is generated for every call, plus a PKCE pair when the configuration enables it.
	pub fn start_authorization(&self, scope: Option<&[&str]>) -> AuthorizationRequest {
		const KIND: FlowKind = FlowKind::Authorize;

		let _guard = FlowSpan::new(KIND, "start_authorization").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let scope = match scope {
			Some(scope) => scope.iter().map(|value| (*value).to_owned()).collect(),
			None => self.config.scope().to_vec(),
		};
		let state = session::generate_state();
		let pkce = self.config.pkce().then(PkcePair::generate);
		let authorize_url = self.oauth2.authorize_url(
			&scope,
			&state,
			pkce.as_ref().map(|pkce| (pkce.challenge(), pkce.method().as_str())),
		);
		let request = AuthorizationRequest::new(
			scope,
			state,
			self.config.callback_url().clone(),
			authorize_url,
			pkce,
		);

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		request
	}

	/// Completes a login from the provider's callback parameters.
	///
	/// Steps, in order:
	/// - an `access_denied` error yields [`AuthOutcome::Failure`]; any other error is returned
	///   as [`Error::Authorization`];
	/// - the returned state must match `request.state`;
	/// - the code is exchanged for tokens;
	/// - the profile is loaded unless the configuration skips it;
	/// - `verify` decides whether the login succeeds.
	pub async fn authenticate<V>(
		&self,
		request: &AuthorizationRequest,
		callback: CallbackParams,
		verify: &V,
	) -> Result<AuthOutcome<V::User>>
	where
		V: ?Sized + Verify,
	{
		const KIND: FlowKind = FlowKind::Authenticate;

		let span = FlowSpan::new(KIND, "authenticate").with_endpoint(Endpoint::Token);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let CallbackParams { code, state, error, error_description } = callback;

				if let Some(error) = error {
					if error == ACCESS_DENIED {
						let message = error_description
							.unwrap_or_else(|| "The user denied the authorization request.".into());

						return Ok(AuthOutcome::Failure { message });
					}

					return Err(Error::Authorization { code: error, description: error_description });
				}

				request.validate_state(state.as_deref().unwrap_or_default())?;

				let code = code.filter(|code| !code.is_empty()).ok_or(Error::MissingCode)?;
				let grant = self.oauth2.exchange_code(&code, request.pkce_verifier()).await?;
				let profile = if self.config.skip_user_profile() {
					None
				} else {
					Some(self.user_profile(grant.access_token.expose()).await?)
				};

				match verify.verify(grant.clone(), profile).await.map_err(Error::Verify)? {
					Some(user) => Ok(AuthOutcome::Success { user, grant }),
					None => Ok(AuthOutcome::Failure {
						message: "The verify callback rejected the account.".into(),
					}),
				}
			})
			.await;

		obs::record_result_with(KIND, &result, flow_outcome);

		result
	}
}

/// Denied or rejected logins complete without an error but still count as failures.
fn flow_outcome<U>(outcome: &AuthOutcome<U>) -> FlowOutcome {
	match outcome {
		AuthOutcome::Success { .. } => FlowOutcome::Success,
		AuthOutcome::Failure { .. } => FlowOutcome::Failure,
	}
}
