// self
use crate::{_prelude::*, auth::ScopeList, provider::ClientConfig};

/// Options accepted by [`BitbucketStrategy`](crate::provider::BitbucketStrategy).
///
/// Deserializes from a flat document:
///
/// ```json
/// {
///   "client_id": "key",
///   "client_secret": "secret",
///   "callback_url": "https://app.example.com/auth/bitbucket/callback",
///   "scope": ["account", "email"],
///   "user_agent": "my-app"
/// }
/// ```
///
/// `scope` defaults to `["account"]` and `user_agent` to `"Remix Auth"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
	/// Client registration.
	#[serde(flatten)]
	pub client: ClientConfig,
	/// Scopes requested on the authorize URL.
	#[serde(default)]
	pub scope: ScopeList,
	/// `User-Agent` sent on both profile calls.
	#[serde(default = "default_user_agent")]
	pub user_agent: String,
}
impl StrategyConfig {
	/// `User-Agent` used when none is configured.
	pub const DEFAULT_USER_AGENT: &'static str = "Remix Auth";

	/// Creates a configuration with the default scope and user agent.
	pub fn new(client: ClientConfig) -> Self {
		Self { client, scope: ScopeList::default(), user_agent: default_user_agent() }
	}

	/// Replaces the requested scopes.
	pub fn with_scope(mut self, scope: impl Into<ScopeList>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Replaces the `User-Agent` header value.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}
}

fn default_user_agent() -> String {
	StrategyConfig::DEFAULT_USER_AGENT.into()
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::auth::BitbucketScope;

	fn parse(value: JsonValue) -> serde_json::Result<StrategyConfig> {
		serde_json::from_value(value)
	}

	#[test]
	fn deserializes_with_defaults() {
		let config = parse(json!({
			"client_id": "key",
			"client_secret": "shh",
			"callback_url": "https://app.example.com/cb",
		}))
		.expect("Minimal configuration should deserialize.");

		assert_eq!(config.client.client_id, "key");
		assert_eq!(config.client.client_secret.expose(), "shh");
		assert_eq!(config.scope, ScopeList::default());
		assert_eq!(config.user_agent, "Remix Auth");
	}

	#[test]
	fn deserialization_rejects_bad_scopes_and_callbacks() {
		let with = |callback_url: &str, scope: JsonValue| {
			parse(json!({
				"client_id": "key",
				"client_secret": "shh",
				"callback_url": callback_url,
				"scope": scope,
			}))
		};

		assert!(with("https://a.example/cb", json!([])).is_err());
		assert!(with("https://a.example/cb", json!(["gist"])).is_err());
		assert!(with("/cb", json!(["account"])).is_err());
		assert!(with("https://a.example/cb", json!(["email", "account"])).is_ok());
	}

	#[test]
	fn setters_override_defaults() {
		let client = ClientConfig::new("key", "shh", "https://app.example.com/cb")
			.expect("Client fixture should be valid.");
		let config = StrategyConfig::new(client)
			.with_scope(BitbucketScope::Email)
			.with_user_agent("my-app/1.0");

		assert_eq!(config.scope.normalized(), "email");
		assert_eq!(config.user_agent, "my-app/1.0");
	}
}
