//! Bitbucket strategy: scope parameter, token extraction, and two-stage profile resolution.
//!
//! Profile resolution issues `GET /2.0/user` and then `GET /2.0/user/emails` strictly in that
//! order. A failure in either stage aborts the whole resolution; the email stage is never
//! attempted once the account stage failed, and an email-stage failure discards the account
//! profile built so far. Only the first page of emails is read.

/// Strategy configuration.
pub mod config;
pub mod profile;

pub use config::*;
pub use profile::*;

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
// self
use crate::{
	_prelude::*,
	auth::{TokenBundle, TokenSecret},
	error::{ConfigError, JsonPathError, ProfileResolutionError, ProfileStage, UpstreamError},
	http::{ProviderHttpClient, TransportFailure, send},
	obs,
	provider::{
		ClientConfig, ProfileFuture, ProviderDescriptor, ProviderStrategy,
		strategy::truncate_preview,
	},
};

/// Bitbucket implementation of [`ProviderStrategy`].
#[derive(Clone, Debug)]
pub struct BitbucketStrategy {
	config: StrategyConfig,
	descriptor: ProviderDescriptor,
}
impl BitbucketStrategy {
	/// Creates a strategy against the production bitbucket.org endpoints.
	pub fn new(config: StrategyConfig) -> Result<Self> {
		let descriptor = ProviderDescriptor::bitbucket().map_err(ConfigError::from)?;

		Ok(Self::with_descriptor(config, descriptor))
	}

	/// Creates a strategy against custom endpoints (self-hosted gateways, mock servers).
	pub fn with_descriptor(config: StrategyConfig, descriptor: ProviderDescriptor) -> Self {
		Self { config, descriptor }
	}

	/// Returns the configuration the strategy was built with.
	pub fn config(&self) -> &StrategyConfig {
		&self.config
	}

	async fn resolve<C>(
		&self,
		http: &C,
		access_token: &TokenSecret,
	) -> Result<BitbucketProfile, ProfileResolutionError>
	where
		C: ?Sized + ProviderHttpClient,
	{
		let endpoints = &self.descriptor.endpoints;
		let account = self
			.fetch_json(http, &endpoints.user_info, access_token)
			.await
			.and_then(|raw| Ok(BitbucketProfile::from_account(raw)?))
			.map_err(|e| stage_failure(ProfileStage::Account, e))?;

		obs::debug_profile_stage(ProfileStage::Account, &account.id, 0);

		let profile = self
			.fetch_json(http, &endpoints.user_emails, access_token)
			.await
			.and_then(|page| Ok(account.with_emails(&page)?))
			.map_err(|e| stage_failure(ProfileStage::Email, e))?;

		obs::debug_profile_stage(ProfileStage::Email, &profile.id, profile.emails.len());

		Ok(profile)
	}

	async fn fetch_json<C>(
		&self,
		http: &C,
		url: &Url,
		access_token: &TokenSecret,
	) -> Result<JsonValue, UpstreamError>
	where
		C: ?Sized + ProviderHttpClient,
	{
		let request = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(ACCEPT, "application/json")
			.header(AUTHORIZATION, format!("Bearer {}", access_token.expose()))
			.header(USER_AGENT, self.config.user_agent.as_str())
			.body(Vec::new())?;
		let response =
			send(http, request).await.map_err(TransportFailure::into_transport_error)?;
		let status = response.status();

		if !status.is_success() {
			let body = String::from_utf8_lossy(response.body()).into_owned();

			return Err(UpstreamError::Status {
				status: status.as_u16(),
				body_preview: truncate_preview(body),
			});
		}

		let mut deserializer = serde_json::Deserializer::from_slice(response.body());

		Ok(serde_path_to_error::deserialize(&mut deserializer)?)
	}
}
impl ProviderStrategy for BitbucketStrategy {
	type Profile = BitbucketProfile;

	fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	fn client(&self) -> &ClientConfig {
		&self.config.client
	}

	fn authorization_params(&self) -> BTreeMap<String, String> {
		BTreeMap::from([("scope".to_owned(), self.config.scope.normalized())])
	}

	fn extract_tokens(&self, body: &[u8]) -> Result<TokenBundle, JsonPathError> {
		let bundle = TokenBundle::from_json_slice(body)?;

		obs::debug_tokens(&bundle);

		Ok(bundle)
	}

	fn resolve_profile<'a, C>(
		&'a self,
		http: &'a C,
		access_token: &'a TokenSecret,
	) -> ProfileFuture<'a, Self::Profile>
	where
		C: ?Sized + ProviderHttpClient,
	{
		Box::pin(async move { Ok(self.resolve(http, access_token).await?) })
	}
}

fn stage_failure(stage: ProfileStage, source: UpstreamError) -> ProfileResolutionError {
	obs::warn_profile_stage(stage, &source);
	obs::record_profile_stage_failure(stage);

	ProfileResolutionError::new(stage, source)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{BitbucketScope, ExtraParams, ScopeList};

	fn strategy(scope: ScopeList) -> BitbucketStrategy {
		let client = ClientConfig::new("key", "shh", "https://app.example.com/auth/callback")
			.expect("Client fixture should be valid.");

		BitbucketStrategy::new(StrategyConfig::new(client).with_scope(scope))
			.expect("Production descriptor should build.")
	}

	#[test]
	fn scope_parameter_joins_in_configured_order() {
		let params = strategy(
			ScopeList::new([BitbucketScope::Email, BitbucketScope::Account, BitbucketScope::Email])
				.expect("Scope fixture should be valid."),
		)
		.authorization_params();

		assert_eq!(params.len(), 1);
		assert_eq!(params.get("scope").map(String::as_str), Some("email account"));
		assert_eq!(
			strategy(ScopeList::default()).authorization_params().get("scope").map(String::as_str),
			Some("account")
		);
	}

	#[test]
	fn extract_tokens_passes_extra_params_through() {
		let bundle = strategy(ScopeList::default())
			.extract_tokens(br#"{"access_token":"A","refresh_token":"B","token_type":"bearer"}"#)
			.expect("Token fixture should extract.");

		assert_eq!(bundle.access_token.expose(), "A");
		assert_eq!(bundle.refresh_token.expose(), "B");
		assert_eq!(
			bundle.extra_params,
			ExtraParams::from([("token_type".to_owned(), JsonValue::from("bearer"))])
		);
	}
}
