//! OAuth client registration shared by every provider strategy.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Client credentials plus the registered callback URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// OAuth consumer key.
	pub client_id: String,
	/// OAuth consumer secret.
	pub client_secret: TokenSecret,
	/// Redirect URI registered with the provider.
	pub callback_url: Url,
}
impl ClientConfig {
	/// Builds a client registration, parsing `callback_url`.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		callback_url: &str,
	) -> Result<Self, ConfigError> {
		let callback_url =
			Url::parse(callback_url).map_err(|source| ConfigError::InvalidRedirect { source })?;

		Ok(Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			callback_url,
		})
	}
}
