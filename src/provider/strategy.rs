//! Provider strategy hooks plugged into the authenticator.
//!
//! A strategy owns everything provider-specific: endpoints, client credentials, the extra
//! authorize-URL parameters, token extraction from the exchange body, profile resolution, and the
//! classification of token-endpoint failures. The authenticator stays generic over it.

// self
use crate::{
	_prelude::*,
	auth::{TokenBundle, TokenSecret},
	error::JsonPathError,
	http::ProviderHttpClient,
	provider::{ClientConfig, ProviderDescriptor},
};

/// Boxed future returned by [`ProviderStrategy::resolve_profile`].
pub type ProfileFuture<'a, P> = Pin<Box<dyn Future<Output = Result<P>> + 'a + Send>>;

/// Strategy hook that adapts the generic authorization-code core to one provider.
///
/// Implementors are required to be `Send + Sync` so a single strategy can be shared across
/// concurrent attempts. Only [`classify_token_error`](Self::classify_token_error) has a default.
pub trait ProviderStrategy
where
	Self: 'static + Send + Sync,
{
	/// Normalized profile produced by [`resolve_profile`](Self::resolve_profile).
	type Profile: 'static + Send + Debug;

	/// Endpoints and client authentication preferences.
	fn descriptor(&self) -> &ProviderDescriptor;

	/// Client credentials and callback URL.
	fn client(&self) -> &ClientConfig;

	/// Extra query parameters merged into the authorize URL.
	fn authorization_params(&self) -> BTreeMap<String, String>;

	/// Splits a successful token-endpoint body into tokens and pass-through parameters.
	fn extract_tokens(&self, body: &[u8]) -> Result<TokenBundle, JsonPathError>;

	/// Resolves the normalized profile owned by `access_token`.
	fn resolve_profile<'a, C>(
		&'a self,
		http: &'a C,
		access_token: &'a TokenSecret,
	) -> ProfileFuture<'a, Self::Profile>
	where
		C: ?Sized + ProviderHttpClient;

	/// Maps a failed token-endpoint response into the crate's error taxonomy.
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		classify_token_error(ctx)
	}
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Provider rejected the authorization grant (bad, expired, or reused code).
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Requested scopes exceed what the client may request.
	InsufficientScope,
	/// Failure is temporary and the attempt may be restarted.
	Transient,
}

/// Context passed to provider strategies when classifying token errors.
///
/// The struct keeps only primitive data (status codes, OAuth fields, body preview) so strategies
/// stay decoupled from any HTTP client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// Provider-supplied OAuth `error` field.
	pub oauth_error: Option<String>,
	/// Provider-supplied OAuth `error_description` field.
	pub error_description: Option<String>,
	/// Preview of the response body for non-JSON payloads.
	pub body_preview: Option<String>,
}
impl ProviderErrorContext {
	pub(crate) const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an HTTP status code (e.g., 400, 401, 500).
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code string returned by the provider.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Adds a body preview for providers that return non-JSON payloads.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}
}

/// RFC-guided heuristics used by [`ProviderStrategy::classify_token_error`] by default.
///
/// Structured OAuth fields (`error`, `error_description`) win, then body text hints, and finally
/// the HTTP status code.
pub fn classify_token_error(ctx: &ProviderErrorContext) -> ProviderErrorKind {
	if let Some(kind) =
		classify_oauth_error(ctx.oauth_error.as_deref(), ctx.error_description.as_deref())
	{
		return kind;
	}
	if let Some(kind) = classify_body(ctx.body_preview.as_deref()) {
		return kind;
	}

	classify_status(ctx.http_status)
}

pub(crate) fn truncate_preview(body: String) -> String {
	if body.chars().count() <= ProviderErrorContext::BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= ProviderErrorContext::BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}

fn classify_oauth_error(
	oauth_error: Option<&str>,
	error_description: Option<&str>,
) -> Option<ProviderErrorKind> {
	oauth_error
		.and_then(match_exact_value)
		.or_else(|| error_description.and_then(match_exact_value))
		.or_else(|| classify_body(error_description))
}

fn match_exact_value(value: &str) -> Option<ProviderErrorKind> {
	if value.eq_ignore_ascii_case("invalid_grant") || value.eq_ignore_ascii_case("access_denied") {
		Some(ProviderErrorKind::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(ProviderErrorKind::InvalidClient)
	} else if value.eq_ignore_ascii_case("invalid_scope")
		|| value.eq_ignore_ascii_case("insufficient_scope")
	{
		Some(ProviderErrorKind::InsufficientScope)
	} else if value.eq_ignore_ascii_case("temporarily_unavailable")
		|| value.eq_ignore_ascii_case("server_error")
	{
		Some(ProviderErrorKind::Transient)
	} else {
		None
	}
}

fn classify_body(body: Option<&str>) -> Option<ProviderErrorKind> {
	let body = body?;
	let lowered = body.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") => Some(ProviderErrorKind::InvalidGrant),
		text if text.contains("invalid_client") => Some(ProviderErrorKind::InvalidClient),
		text if text.contains("insufficient_scope") || text.contains("invalid_scope") =>
			Some(ProviderErrorKind::InsufficientScope),
		text if text.contains("temporarily_unavailable") || text.contains("retry") =>
			Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(400 | 404 | 410) => ProviderErrorKind::InvalidGrant,
		Some(401) => ProviderErrorKind::InvalidClient,
		Some(403) => ProviderErrorKind::InsufficientScope,
		_ => ProviderErrorKind::Transient,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn oauth_error_fields_win_over_status() {
		let ctx =
			ProviderErrorContext::new().with_http_status(401).with_oauth_error("invalid_grant");

		assert_eq!(classify_token_error(&ctx), ProviderErrorKind::InvalidGrant);

		let ctx = ProviderErrorContext::new()
			.with_http_status(400)
			.with_oauth_error("unauthorized_client");

		assert_eq!(classify_token_error(&ctx), ProviderErrorKind::InvalidClient);
	}

	#[test]
	fn falls_back_to_description_body_and_status() {
		let ctx = ProviderErrorContext::new()
			.with_http_status(500)
			.with_error_description("invalid_grant: code already used");

		assert_eq!(classify_token_error(&ctx), ProviderErrorKind::InvalidGrant);

		let ctx = ProviderErrorContext::new().with_body_preview("error=insufficient_scope");

		assert_eq!(classify_token_error(&ctx), ProviderErrorKind::InsufficientScope);
		assert_eq!(
			classify_token_error(&ProviderErrorContext::new().with_http_status(401)),
			ProviderErrorKind::InvalidClient
		);
		assert_eq!(
			classify_token_error(&ProviderErrorContext::new().with_http_status(503)),
			ProviderErrorKind::Transient
		);
	}

	#[test]
	fn previews_are_truncated() {
		let ctx = ProviderErrorContext::new().with_body_preview("x".repeat(1_000));
		let preview = ctx.body_preview.expect("Preview should be recorded.");

		assert_eq!(preview.chars().count(), ProviderErrorContext::BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}
}
