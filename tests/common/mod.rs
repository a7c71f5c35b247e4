//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// std
use std::{error::Error as StdError, future::Future, pin::Pin, sync::Arc};
// crates.io
use httpmock::MockServer;
use oauth2_bitbucket::{
	flows::Authenticator,
	http::{ProviderHttpClient, ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
	oauth::oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, http::StatusCode},
	provider::{
		BitbucketStrategy, ClientAuthMethod, ClientConfig, ProviderDescriptor, StrategyConfig,
	},
	reqwest::Client as ReqwestClient,
};
use parking_lot::Mutex;
use time::Duration;
use url::Url;

pub const CLIENT_ID: &str = "key";
pub const CLIENT_SECRET: &str = "shh";
pub const CALLBACK_URL: &str = "https://app.example.com/auth/bitbucket/callback";
/// `base64("key:shh")`.
pub const BASIC_CREDENTIALS: &str = "Basic a2V5OnNoaA==";

pub const TOKEN_PATH: &str = "/site/oauth2/access_token";
pub const USER_PATH: &str = "/2.0/user";
pub const EMAILS_PATH: &str = "/2.0/user/emails";

pub const ACCOUNT_BODY: &str = r#"{
	"account_id": "123",
	"username": "joe",
	"display_name": "Joe Doe",
	"links": { "avatar": { "href": "https://avatar.example.com/joe.png" } }
}"#;
pub const EMAILS_BODY: &str =
	r#"{"values":[{"email":"joe@example.com","is_primary":true,"is_confirmed":true}]}"#;

pub type ReqwestTestAuthenticator = Authenticator<BitbucketStrategy, ReqwestHttpClient>;

pub fn client_config() -> ClientConfig {
	ClientConfig::new(CLIENT_ID, CLIENT_SECRET, CALLBACK_URL)
		.expect("Client fixture should be valid.")
}

pub fn strategy_config() -> StrategyConfig {
	StrategyConfig::new(client_config())
}

pub fn descriptor_for(base: &str, auth_method: ClientAuthMethod) -> ProviderDescriptor {
	let endpoint = |path: &str| {
		Url::parse(&format!("{base}{path}")).expect("Mock endpoint URL should parse successfully.")
	};

	ProviderDescriptor::builder("mock-bitbucket")
		.authorization_endpoint(endpoint("/site/oauth2/authorize"))
		.token_endpoint(endpoint(TOKEN_PATH))
		.user_info_endpoint(endpoint(USER_PATH))
		.user_emails_endpoint(endpoint(EMAILS_PATH))
		.preferred_client_auth_method(auth_method)
		.build()
		.expect("Mock descriptor should build.")
}

pub fn mock_descriptor(server: &MockServer) -> ProviderDescriptor {
	descriptor_for(&server.base_url(), ClientAuthMethod::ClientSecretBasic)
}

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock`.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

pub fn build_reqwest_test_authenticator(
	descriptor: ProviderDescriptor,
	config: StrategyConfig,
) -> ReqwestTestAuthenticator {
	Authenticator::with_http_client(
		BitbucketStrategy::with_descriptor(config, descriptor),
		test_reqwest_http_client(),
	)
}

pub fn mock_authenticator(server: &MockServer) -> ReqwestTestAuthenticator {
	build_reqwest_test_authenticator(mock_descriptor(server), strategy_config())
}

#[derive(Debug)]
pub enum FakeTransportError {
	ConnectionReset,
}
impl std::fmt::Display for FakeTransportError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::ConnectionReset => write!(f, "Connection reset by peer."),
		}
	}
}
impl StdError for FakeTransportError {}

/// Canned outcome for one request path.
#[derive(Clone)]
pub enum FakeReply {
	Json(u16, &'static str),
	Fail,
	/// Fails after the transport saw a status and a `Retry-After` hint.
	FailAfter(u16, Duration),
}

/// Transport that records every request URI and answers from a fixed route table.
#[derive(Clone, Default)]
pub struct RecordingHttpClient {
	routes: Arc<Vec<(&'static str, FakeReply)>>,
	requests: Arc<Mutex<Vec<String>>>,
}
impl RecordingHttpClient {
	pub fn new(routes: Vec<(&'static str, FakeReply)>) -> Self {
		Self { routes: Arc::new(routes), requests: Arc::default() }
	}

	pub fn recorded_paths(&self) -> Vec<String> {
		self.requests.lock().clone()
	}
}
impl ProviderHttpClient for RecordingHttpClient {
	type Handle = RecordingHttpHandle;
	type TransportError = FakeTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		RecordingHttpHandle { client: self.clone(), slot }
	}
}

pub struct RecordingHttpHandle {
	client: RecordingHttpClient,
	slot: ResponseMetadataSlot,
}
impl<'a> AsyncHttpClient<'a> for RecordingHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		let path = request.uri().path().to_owned();
		let reply = self
			.client
			.routes
			.iter()
			.find(|(route, _)| *route == path)
			.map(|(_, reply)| reply.clone());

		self.client.requests.lock().push(path);

		let slot = self.slot.clone();

		Box::pin(async move {
			assert!(
				slot.take().is_none(),
				"ResponseMetadataSlot must be clear before dispatching a request."
			);

			match reply {
				Some(FakeReply::Json(status, body)) => {
					slot.store(ResponseMetadata { status: Some(status), retry_after: None });

					let mut response = HttpResponse::new(body.as_bytes().to_vec());

					*response.status_mut() =
						StatusCode::from_u16(status).expect("Fake status should be valid.");

					Ok(response)
				},
				Some(FakeReply::Fail) =>
					Err(HttpClientError::Reqwest(Box::new(FakeTransportError::ConnectionReset))),
				Some(FakeReply::FailAfter(status, retry_after)) => {
					slot.store(ResponseMetadata {
						status: Some(status),
						retry_after: Some(retry_after),
					});

					Err(HttpClientError::Reqwest(Box::new(FakeTransportError::ConnectionReset)))
				},
				None => {
					let mut response = HttpResponse::new(Vec::new());

					*response.status_mut() = StatusCode::NOT_FOUND;

					Ok(response)
				},
			}
		})
	}
}

pub fn fake_authenticator(
	client: RecordingHttpClient,
) -> Authenticator<BitbucketStrategy, RecordingHttpClient> {
	let descriptor = descriptor_for("https://bitbucket.test", ClientAuthMethod::ClientSecretBasic);

	Authenticator::with_http_client(
		BitbucketStrategy::with_descriptor(strategy_config(), descriptor),
		client,
	)
}
