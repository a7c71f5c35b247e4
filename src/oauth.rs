//! Wire-level helpers for the authorization-code grant: authorize URL, token POST, and
//! token-endpoint error mapping.
//!
//! The token request is assembled by hand instead of through `oauth2`'s typed token response so
//! the raw body reaches [`ProviderStrategy::extract_tokens`] untouched, with unknown fields intact.

pub use oauth2;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::{
	HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransientError},
	http::parse_retry_after,
	provider::{
		ClientAuthMethod, ClientConfig, ProviderDescriptor, ProviderErrorContext, ProviderErrorKind,
		ProviderStrategy,
	},
};

/// Builds the browser-facing authorize URL.
///
/// Standard parameters come first (`response_type`, `client_id`, `redirect_uri`), then the
/// strategy's extra parameters, then `state`.
pub(crate) fn authorize_url(
	descriptor: &ProviderDescriptor,
	client: &ClientConfig,
	extra_params: &BTreeMap<String, String>,
	state: &str,
) -> Url {
	let mut url = descriptor.endpoints.authorization.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("response_type", "code");
	pairs.append_pair("client_id", &client.client_id);
	pairs.append_pair("redirect_uri", client.callback_url.as_str());

	for (key, value) in extra_params {
		pairs.append_pair(key, value);
	}

	pairs.append_pair("state", state);

	drop(pairs);

	url
}

/// Builds the `authorization_code` token POST for `code`.
pub(crate) fn token_request(
	descriptor: &ProviderDescriptor,
	client: &ClientConfig,
	code: &str,
) -> Result<HttpRequest> {
	let mut form = Serializer::new(String::new());

	form.append_pair("grant_type", "authorization_code");
	form.append_pair("code", code);
	form.append_pair("redirect_uri", client.callback_url.as_str());

	let mut builder = Request::builder()
		.method(Method::POST)
		.uri(descriptor.endpoints.token.as_str())
		.header(ACCEPT, "application/json")
		.header(CONTENT_TYPE, "application/x-www-form-urlencoded");

	match descriptor.preferred_client_auth_method {
		ClientAuthMethod::ClientSecretBasic => {
			builder = builder.header(AUTHORIZATION, basic_credentials(client));
		},
		ClientAuthMethod::ClientSecretPost => {
			form.append_pair("client_id", &client.client_id);
			form.append_pair("client_secret", client.client_secret.expose());
		},
	}

	let request = builder.body(form.finish().into_bytes()).map_err(ConfigError::from)?;

	Ok(request)
}

fn basic_credentials(client: &ClientConfig) -> String {
	let raw = format!("{}:{}", client.client_id, client.client_secret.expose());

	format!("Basic {}", STANDARD.encode(raw))
}

#[derive(Debug, Default, Deserialize)]
struct OAuthErrorBody {
	error: Option<String>,
	error_description: Option<String>,
}

/// Maps a non-success token response into the crate's error taxonomy via the strategy.
pub(crate) fn map_token_error_response<S>(strategy: &S, response: &HttpResponse) -> Error
where
	S: ?Sized + ProviderStrategy,
{
	let status = response.status().as_u16();
	let body = String::from_utf8_lossy(response.body()).into_owned();
	let parsed = serde_json::from_slice::<OAuthErrorBody>(response.body()).unwrap_or_default();
	let mut ctx = ProviderErrorContext::new().with_http_status(status);

	if let Some(error) = parsed.error.as_deref() {
		ctx = ctx.with_oauth_error(error);
	}
	if let Some(description) = parsed.error_description.as_deref() {
		ctx = ctx.with_error_description(description);
	}
	if !body.is_empty() {
		ctx = ctx.with_body_preview(body);
	}

	let message = match (parsed.error_description, parsed.error) {
		(Some(description), _) => format!("Token endpoint returned an OAuth error: {description}"),
		(None, Some(error)) => format!("Token endpoint returned an OAuth error: {error}"),
		(None, None) => format!("Token endpoint responded with HTTP {status}"),
	};

	match strategy.classify_token_error(&ctx) {
		ProviderErrorKind::InvalidGrant => Error::InvalidGrant { reason: message },
		ProviderErrorKind::InvalidClient => Error::InvalidClient { reason: message },
		ProviderErrorKind::InsufficientScope => Error::InsufficientScope { reason: message },
		ProviderErrorKind::Transient => TransientError::TokenEndpoint {
			message,
			status: Some(status),
			retry_after: parse_retry_after(response.headers()),
		}
		.into(),
	}
}
