// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

const STATE_LEN: usize = 32;

/// Per-attempt handshake data returned by [`Authenticator::start_authorization`].
///
/// Persist it (cookie session, server-side store) between the redirect and the callback; it
/// serializes with serde for that purpose.
///
/// [`Authenticator::start_authorization`]: crate::flows::Authenticator::start_authorization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationSession {
	/// Opaque state value that must round-trip via the redirect handler.
	pub state: String,
	/// Callback URL embedded in the authorize URL.
	pub redirect_uri: Url,
	/// Fully-formed authorize URL that callers should send end-users to.
	pub authorize_url: Url,
}
impl AuthorizationSession {
	pub(crate) fn new(state: String, redirect_uri: Url, authorize_url: Url) -> Self {
		Self { state, redirect_uri, authorize_url }
	}

	/// Validates the returned `state` parameter after the authorization redirect.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(Error::StateMismatch) }
	}
}

pub(crate) fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn state_validation_errors_on_mismatch() {
		let session = AuthorizationSession::new(
			"expected".into(),
			Url::parse("https://example.com/cb")
				.expect("Redirect URL fixture should parse successfully."),
			Url::parse("https://example.com/auth?state=expected")
				.expect("Authorization URL fixture should parse successfully."),
		);

		assert!(session.validate_state("expected").is_ok());

		let err = session.validate_state("other").expect_err("State mismatch should fail.");

		assert!(matches!(err, Error::StateMismatch));
	}

	#[test]
	fn random_states_are_alphanumeric_and_distinct() {
		let first = random_state();
		let second = random_state();

		assert_eq!(first.len(), STATE_LEN);
		assert!(first.chars().all(|ch| ch.is_ascii_alphanumeric()));
		assert_ne!(first, second);
	}
}
