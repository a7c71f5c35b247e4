//! Authorization Code flow: redirect construction, callback handling, code exchange, and
//! profile resolution.
//!
//! A full attempt is `start_authorization` → (user agent round-trip) →
//! [`CallbackParams::from_url`] → [`Authenticator::authenticate`]. The pieces are public so
//! callers can also stop after the exchange or resolve a profile for a token obtained elsewhere.

/// Callback query parsing.
pub mod callback;
/// Per-attempt session issued with the authorize URL.
pub mod session;

pub use callback::*;
pub use session::*;

// self
use crate::{
	_prelude::*,
	auth::TokenBundle,
	error::{BoxError, TransientError},
	flows::{Authentication, Authenticator},
	http::{ProviderHttpClient, TransportFailure, send},
	oauth,
	obs::{self, FlowKind, FlowOutcome},
	provider::ProviderStrategy,
};

impl<S, C> Authenticator<S, C>
where
	S: ProviderStrategy,
	C: ?Sized + ProviderHttpClient,
{
	/// Issues a fresh `state` and builds the authorize URL carrying the strategy's parameters.
	pub fn start_authorization(&self) -> AuthorizationSession {
		obs::record_flow_outcome(FlowKind::Authorization, FlowOutcome::Attempt);

		let client = self.strategy.client();
		let state = random_state();
		let authorize_url = oauth::authorize_url(
			self.strategy.descriptor(),
			client,
			&self.strategy.authorization_params(),
			&state,
		);

		obs::record_flow_outcome(FlowKind::Authorization, FlowOutcome::Success);

		AuthorizationSession::new(state, client.callback_url.clone(), authorize_url)
	}

	/// Verifies `state` and exchanges the callback's code for tokens.
	///
	/// Tokens are not validated here; see [`Authenticator::resolve_profile`].
	pub async fn exchange_code(
		&self,
		session: &AuthorizationSession,
		callback: &CallbackParams,
	) -> Result<TokenBundle> {
		obs::observe(
			FlowKind::TokenExchange,
			"exchange_code",
			self.exchange_code_inner(session, callback),
		)
		.await
	}

	/// Resolves the profile owned by `tokens.access_token`.
	///
	/// Fails with [`Error::MissingAccessToken`] before any upstream call when the exchange yielded
	/// no access token.
	pub async fn resolve_profile(&self, tokens: &TokenBundle) -> Result<S::Profile> {
		obs::observe(
			FlowKind::ProfileResolution,
			"resolve_profile",
			self.resolve_profile_inner(tokens),
		)
		.await
	}

	/// Exchanges the code and resolves the profile.
	pub async fn complete(
		&self,
		session: &AuthorizationSession,
		callback: &CallbackParams,
	) -> Result<Authentication<S::Profile>> {
		let tokens = self.exchange_code(session, callback).await?;
		let profile = self.resolve_profile(&tokens).await?;

		Ok(Authentication { tokens, profile })
	}

	/// Completes the attempt and hands the outcome to `verify`, returning whatever it produces
	/// (typically the application's user record).
	pub async fn authenticate<F, Fut, U, E>(
		&self,
		session: &AuthorizationSession,
		callback: &CallbackParams,
		verify: F,
	) -> Result<U>
	where
		F: FnOnce(Authentication<S::Profile>) -> Fut,
		Fut: Future<Output = Result<U, E>>,
		E: Into<BoxError>,
	{
		let authentication = self.complete(session, callback).await?;

		verify(authentication).await.map_err(|e| Error::Verification { source: e.into() })
	}

	async fn exchange_code_inner(
		&self,
		session: &AuthorizationSession,
		callback: &CallbackParams,
	) -> Result<TokenBundle> {
		session.validate_state(&callback.state)?;

		let strategy = self.strategy.as_ref();
		let request =
			oauth::token_request(strategy.descriptor(), strategy.client(), &callback.code)?;
		let response = send(self.http_client.as_ref(), request)
			.await
			.map_err(TransportFailure::into_transport_error)?;
		let status = response.status();

		if !status.is_success() {
			return Err(oauth::map_token_error_response(strategy, &response));
		}

		strategy.extract_tokens(response.body()).map_err(|source| {
			TransientError::TokenResponseParse { source, status: Some(status.as_u16()) }.into()
		})
	}

	async fn resolve_profile_inner(&self, tokens: &TokenBundle) -> Result<S::Profile> {
		if tokens.access_token.is_empty() {
			return Err(Error::MissingAccessToken);
		}

		self.strategy.resolve_profile(self.http_client.as_ref(), &tokens.access_token).await
	}
}
