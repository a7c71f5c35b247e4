//! Provider descriptor data structures shared by the authenticator and strategies.
//!
//! A descriptor is validated metadata: the four endpoints a Bitbucket login touches and the
//! client authentication mode used at the token endpoint.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::_prelude::*;

/// Preferred client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Browser-facing authorization endpoint.
	pub authorization: Url,
	/// Token endpoint used for the code exchange.
	pub token: Url,
	/// Account-info endpoint queried during the first profile stage.
	pub user_info: Url,
	/// Account-emails endpoint queried during the second profile stage.
	pub user_emails: Url,
}

/// Immutable provider descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier used in logs and diagnostics.
	pub id: String,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Preferred client authentication mechanism.
	pub preferred_client_auth_method: ClientAuthMethod,
}
impl ProviderDescriptor {
	/// Identifier of the Bitbucket descriptor.
	pub const BITBUCKET_ID: &'static str = "bitbucket";
	/// Production authorization endpoint.
	pub const BITBUCKET_AUTHORIZATION_URL: &'static str =
		"https://bitbucket.org/site/oauth2/authorize";
	/// Production token endpoint.
	pub const BITBUCKET_TOKEN_URL: &'static str = "https://bitbucket.org/site/oauth2/access_token";
	/// Production account-info endpoint.
	pub const BITBUCKET_USER_INFO_URL: &'static str = "https://api.bitbucket.org/2.0/user";
	/// Production account-emails endpoint.
	pub const BITBUCKET_USER_EMAILS_URL: &'static str = "https://api.bitbucket.org/2.0/user/emails";

	/// Creates a new builder for the provided identifier.
	pub fn builder(id: impl Into<String>) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Returns the descriptor for bitbucket.org.
	pub fn bitbucket() -> Result<Self, ProviderDescriptorError> {
		Self::builder(Self::BITBUCKET_ID)
			.authorization_endpoint(parse_endpoint(
				"authorization",
				Self::BITBUCKET_AUTHORIZATION_URL,
			)?)
			.token_endpoint(parse_endpoint("token", Self::BITBUCKET_TOKEN_URL)?)
			.user_info_endpoint(parse_endpoint("user_info", Self::BITBUCKET_USER_INFO_URL)?)
			.user_emails_endpoint(parse_endpoint("user_emails", Self::BITBUCKET_USER_EMAILS_URL)?)
			.build()
	}
}

fn parse_endpoint(endpoint: &'static str, raw: &str) -> Result<Url, ProviderDescriptorError> {
	Url::parse(raw).map_err(|_| ProviderDescriptorError::InvalidUrl { endpoint, url: raw.into() })
}
