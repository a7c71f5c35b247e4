// self
use crate::_prelude::*;

/// Query parameters the provider appends to the callback URL.
#[derive(Clone, PartialEq, Eq)]
pub struct CallbackParams {
	/// Authorization code to exchange.
	pub code: String,
	/// State echoed back by the provider.
	pub state: String,
}
impl CallbackParams {
	/// Wraps already-extracted parameters.
	pub fn new(code: impl Into<String>, state: impl Into<String>) -> Self {
		Self { code: code.into(), state: state.into() }
	}

	/// Parses the query string of the full callback URL.
	pub fn from_url(url: &Url) -> Result<Self> {
		Self::from_query(url.query().unwrap_or_default())
	}

	/// Parses a raw `application/x-www-form-urlencoded` query string.
	///
	/// A provider `error` (e.g. the user declined consent) yields [`Error::AuthorizationDenied`];
	/// a missing `code` or `state` yields [`Error::InvalidGrant`].
	pub fn from_query(query: &str) -> Result<Self> {
		let mut code = None;
		let mut state = None;
		let mut error = None;
		let mut description = None;

		for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
			match key.as_ref() {
				"code" => code = Some(value.into_owned()),
				"state" => state = Some(value.into_owned()),
				"error" => error = Some(value.into_owned()),
				"error_description" => description = Some(value.into_owned()),
				_ => {},
			}
		}

		if let Some(error) = error {
			return Err(Error::AuthorizationDenied { error, description });
		}

		let code = code.filter(|value| !value.is_empty()).ok_or_else(|| Error::InvalidGrant {
			reason: "Callback is missing the authorization code".into(),
		})?;
		let state = state.ok_or_else(|| Error::InvalidGrant {
			reason: "Callback is missing the state parameter".into(),
		})?;

		Ok(Self { code, state })
	}
}
impl Debug for CallbackParams {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CallbackParams")
			.field("code", &"<redacted>")
			.field("state", &self.state)
			.finish()
	}
}
