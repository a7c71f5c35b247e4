//! Tokens extracted from a code-exchange response.

// self
use crate::{_prelude::*, auth::TokenSecret, error::JsonPathError};

/// Top-level token-response fields other than the two tokens, passed through verbatim.
pub type ExtraParams = BTreeMap<String, JsonValue>;

/// Result of a successful code exchange, handed to the caller's verify callback.
///
/// The bundle is produced once per exchange and never retained by the strategy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TokenBundle {
	/// Access token; empty when the provider omitted `access_token`.
	pub access_token: TokenSecret,
	/// Refresh token; empty when the provider omitted `refresh_token`.
	pub refresh_token: TokenSecret,
	/// Remaining response fields (`token_type`, `expires_in`, `scopes`, ...).
	pub extra_params: ExtraParams,
}
impl TokenBundle {
	/// Splits a JSON token response into tokens and extra parameters.
	///
	/// Token presence is not validated here; absent or `null` tokens become empty secrets and
	/// non-string tokens keep their JSON text.
	pub fn from_json_slice(body: &[u8]) -> Result<Self, JsonPathError> {
		let mut deserializer = serde_json::Deserializer::from_slice(body);
		let mut fields: BTreeMap<String, JsonValue> =
			serde_path_to_error::deserialize(&mut deserializer)?;
		let access_token = take_token(&mut fields, "access_token");
		let refresh_token = take_token(&mut fields, "refresh_token");

		Ok(Self { access_token, refresh_token, extra_params: fields })
	}

	/// Returns the `token_type` parameter, if the provider sent one as a string.
	pub fn token_type(&self) -> Option<&str> {
		self.extra_params.get("token_type").and_then(JsonValue::as_str)
	}

	/// Returns the `expires_in` parameter in seconds, if present and numeric.
	pub fn expires_in(&self) -> Option<i64> {
		self.extra_params.get("expires_in").and_then(JsonValue::as_i64)
	}
}

fn take_token(fields: &mut ExtraParams, key: &str) -> TokenSecret {
	match fields.remove(key) {
		None | Some(JsonValue::Null) => TokenSecret::default(),
		Some(JsonValue::String(value)) => TokenSecret::new(value),
		Some(other) => TokenSecret::new(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn splits_tokens_from_extra_params() {
		let bundle = TokenBundle::from_json_slice(
			br#"{"access_token":"A","refresh_token":"B","token_type":"bearer"}"#,
		)
		.expect("Token response fixture should parse.");

		assert_eq!(bundle.access_token.expose(), "A");
		assert_eq!(bundle.refresh_token.expose(), "B");
		assert_eq!(bundle.extra_params.len(), 1);
		assert_eq!(bundle.token_type(), Some("bearer"));
	}

	#[test]
	fn passes_numbers_and_unknown_fields_through() {
		let bundle = TokenBundle::from_json_slice(
			br#"{"access_token":"A","refresh_token":"B","expires_in":7200,
				"scopes":"account email","state":"xyz"}"#,
		)
		.expect("Token response fixture should parse.");

		assert_eq!(bundle.expires_in(), Some(7200));
		assert_eq!(bundle.extra_params.get("scopes"), Some(&JsonValue::from("account email")));
		assert_eq!(bundle.extra_params.get("state"), Some(&JsonValue::from("xyz")));
		assert!(!bundle.extra_params.contains_key("access_token"));
	}

	#[test]
	fn absent_tokens_become_empty_secrets() {
		let bundle =
			TokenBundle::from_json_slice(br#"{"token_type":"bearer","refresh_token":null}"#)
				.expect("Token response without tokens should still parse.");

		assert!(bundle.access_token.is_empty());
		assert!(bundle.refresh_token.is_empty());
		assert_eq!(bundle.extra_params.len(), 1);
	}

	#[test]
	fn non_object_bodies_fail_to_parse() {
		assert!(TokenBundle::from_json_slice(b"access_token=A").is_err());
		assert!(TokenBundle::from_json_slice(b"[1,2,3]").is_err());
	}
}
