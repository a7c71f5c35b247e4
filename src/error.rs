//! Crate-level error types shared across flows, strategies, and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// JSON failure annotated with the path of the offending field.
pub type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Boxed error used where the underlying failure type is transport- or caller-defined.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; the caller may retry the whole attempt.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Profile resolution failed; no profile is ever returned partially.
	#[error(transparent)]
	Profile(#[from] ProfileResolutionError),

	/// Requested scopes exceed what was granted.
	#[error("Token lacks the required scopes: {reason}.")]
	InsufficientScope {
		/// Provider- or crate-supplied reason string.
		reason: String,
	},
	/// Provider rejected the grant (e.g., a reused or expired authorization code).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider- or crate-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider- or crate-supplied reason string.
		reason: String,
	},
	/// The user (or provider) refused the authorization request.
	#[error("Authorization was denied: {error}.")]
	AuthorizationDenied {
		/// OAuth `error` code from the callback (e.g., `access_denied`).
		error: String,
		/// Optional `error_description` from the callback.
		description: Option<String>,
	},
	/// The `state` returned on the callback does not match the issued session.
	#[error("Authorization state mismatch.")]
	StateMismatch,
	/// Token exchange succeeded but yielded no usable access token.
	#[error("Token endpoint response did not contain an access token.")]
	MissingAccessToken,
	/// The caller's verify callback rejected the authentication.
	#[error("Verify callback rejected the authentication.")]
	Verification {
		/// Caller-supplied failure.
		#[source]
		source: BoxError,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Callback (redirect) URL cannot be parsed.
	#[error("Callback URL is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Configured scopes cannot be used.
	#[error("Configured scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
}

/// Temporary failure variants (safe to retry with a fresh authorization attempt).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider returned an unexpected but non-fatal response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Provider- or crate-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with a body that is not a JSON object.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
		/// HTTP status observed before the failure, if any.
		status: Option<u16>,
		/// Retry-After hint observed before the failure, if any.
		retry_after: Option<Duration>,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// HTTP client failure that carries only a message.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Client {
		/// Client-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src), status: None, retry_after: None }
	}
}

/// Profile resolution stage that produced a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProfileStage {
	/// `GET /2.0/user`.
	Account,
	/// `GET /2.0/user/emails`.
	Email,
}
impl ProfileStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProfileStage::Account => "account",
			ProfileStage::Email => "email",
		}
	}
}
impl Display for ProfileStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Raised when either upstream profile call fails.
///
/// Resolution is all-or-nothing: an email-stage failure discards the account profile that was
/// already built.
#[derive(Debug, ThisError)]
pub struct ProfileResolutionError {
	/// Stage that failed.
	pub stage: ProfileStage,
	/// Underlying failure.
	#[source]
	pub source: UpstreamError,
}
impl ProfileResolutionError {
	/// Wraps `source` with the stage it occurred in.
	pub fn new(stage: ProfileStage, source: impl Into<UpstreamError>) -> Self {
		Self { stage, source: source.into() }
	}
}
impl Display for ProfileResolutionError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self.stage {
			ProfileStage::Account => f.write_str("Could not parse user account."),
			ProfileStage::Email => f.write_str("Could not parse user account emails."),
		}
	}
}

/// Failure of a single upstream API call made during profile resolution.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Request could not be built.
	#[error("Upstream request could not be constructed.")]
	Request(#[from] oauth2::http::Error),
	/// Transport failed before a response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream responded with a non-success status.
	#[error("Upstream responded with HTTP {status}: {body_preview}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body_preview: String,
	},
	/// Body was not JSON or lacked an expected field.
	#[error("Upstream returned an unexpected payload.")]
	Parse(#[from] JsonPathError),
}
