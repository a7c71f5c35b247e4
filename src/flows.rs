//! Authorization-code orchestration driven by a [`ProviderStrategy`].

pub mod auth_code;

pub use auth_code::*;

// self
use crate::{_prelude::*, auth::TokenBundle, http::ProviderHttpClient, provider::ProviderStrategy};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Authenticator specialized for the crate's default reqwest transport.
pub type ReqwestAuthenticator<S> = Authenticator<S, ReqwestHttpClient>;

/// Runs the authorization-code flow against a single provider strategy.
///
/// The authenticator owns the strategy and the HTTP transport; it is stateless across attempts,
/// so one instance can be shared (`Arc`) by every request handler. Per-attempt state lives in the
/// [`AuthorizationSession`] the caller persists between the redirect and the callback.
pub struct Authenticator<S, C>
where
	S: ProviderStrategy,
	C: ?Sized + ProviderHttpClient,
{
	/// Provider strategy supplying endpoints, parameters, and profile resolution.
	pub strategy: Arc<S>,
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
}
impl<S, C> Authenticator<S, C>
where
	S: ProviderStrategy,
	C: ?Sized + ProviderHttpClient,
{
	/// Creates an authenticator that reuses the caller-provided transport.
	pub fn with_http_client(strategy: S, http_client: impl Into<Arc<C>>) -> Self {
		Self { strategy: Arc::new(strategy), http_client: http_client.into() }
	}
}
#[cfg(feature = "reqwest")]
impl<S> Authenticator<S, ReqwestHttpClient>
where
	S: ProviderStrategy,
{
	/// Creates an authenticator that provisions its own reqwest-backed transport.
	pub fn new(strategy: S) -> Self {
		Self::with_http_client(strategy, ReqwestHttpClient::default())
	}
}
impl<S, C> Clone for Authenticator<S, C>
where
	S: ProviderStrategy,
	C: ?Sized + ProviderHttpClient,
{
	fn clone(&self) -> Self {
		Self { strategy: Arc::clone(&self.strategy), http_client: Arc::clone(&self.http_client) }
	}
}
impl<S, C> Debug for Authenticator<S, C>
where
	S: ProviderStrategy + Debug,
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator").field("strategy", &self.strategy).finish()
	}
}

/// Outcome of a completed attempt, handed to the caller's verify callback.
#[derive(Clone, Debug, PartialEq)]
pub struct Authentication<P> {
	/// Tokens extracted from the exchange response.
	pub tokens: TokenBundle,
	/// Profile resolved with the access token.
	pub profile: P,
}
