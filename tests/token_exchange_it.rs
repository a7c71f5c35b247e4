#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::Value as JsonValue;
// self
use common::*;
use oauth2_bitbucket::{
	auth::ExtraParams,
	error::{Error, TransientError},
	flows::CallbackParams,
	provider::ClientAuthMethod,
};

#[tokio::test]
async fn exchange_posts_code_with_basic_credentials() {
	let server = MockServer::start_async().await;
	let authenticator = mock_authenticator(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("authorization", BASIC_CREDENTIALS)
				.header("content-type", "application/x-www-form-urlencoded")
				.header("accept", "application/json");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"A","refresh_token":"B","token_type":"bearer"}"#);
		})
		.await;
	let session = authenticator.start_authorization();
	let callback = CallbackParams::new("code-1", session.state.clone());
	let tokens = authenticator
		.exchange_code(&session, &callback)
		.await
		.expect("Code exchange should succeed against the mock token endpoint.");

	mock.assert_async().await;

	assert_eq!(tokens.access_token.expose(), "A");
	assert_eq!(tokens.refresh_token.expose(), "B");
	assert_eq!(
		tokens.extra_params,
		ExtraParams::from([("token_type".to_owned(), JsonValue::from("bearer"))])
	);
	assert_eq!(tokens.token_type(), Some("bearer"));
}

#[tokio::test]
async fn exchange_passes_unknown_fields_through() {
	let server = MockServer::start_async().await;
	let authenticator = mock_authenticator(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"A","expires_in":7200,"scopes":"account email","state":"s"}"#,
			);
		})
		.await;
	let session = authenticator.start_authorization();
	let tokens = authenticator
		.exchange_code(&session, &CallbackParams::new("code-2", session.state.clone()))
		.await
		.expect("Code exchange should succeed against the mock token endpoint.");

	mock.assert_async().await;

	assert!(tokens.refresh_token.is_empty());
	assert_eq!(tokens.expires_in(), Some(7200));
	assert_eq!(tokens.extra_params.len(), 3);
	assert_eq!(tokens.extra_params.get("scopes"), Some(&JsonValue::from("account email")));
}

#[tokio::test]
async fn exchange_supports_client_secret_post() {
	let server = MockServer::start_async().await;
	let descriptor = descriptor_for(&server.base_url(), ClientAuthMethod::ClientSecretPost);
	let authenticator = build_reqwest_test_authenticator(descriptor, strategy_config());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"posted","token_type":"bearer"}"#);
		})
		.await;
	let session = authenticator.start_authorization();
	let tokens = authenticator
		.exchange_code(&session, &CallbackParams::new("code-3", session.state.clone()))
		.await
		.expect("Code exchange should succeed with form credentials.");

	mock.assert_async().await;

	assert_eq!(tokens.access_token.expose(), "posted");
}

#[tokio::test]
async fn exchange_maps_invalid_grant() {
	let server = MockServer::start_async().await;
	let authenticator = mock_authenticator(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(400).header("content-type", "application/json").body(
				r#"{"error":"invalid_grant","error_description":"The code has expired"}"#,
			);
		})
		.await;
	let session = authenticator.start_authorization();
	let err = authenticator
		.exchange_code(&session, &CallbackParams::new("stale", session.state.clone()))
		.await
		.expect_err("An expired code should be rejected.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		Error::InvalidGrant { ref reason } if reason.contains("The code has expired")
	));
}

#[tokio::test]
async fn exchange_maps_server_errors_to_transient() {
	let server = MockServer::start_async().await;
	let authenticator = mock_authenticator(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(503).header("retry-after", "30").body("upstream unavailable");
		})
		.await;
	let session = authenticator.start_authorization();
	let err = authenticator
		.exchange_code(&session, &CallbackParams::new("code-4", session.state.clone()))
		.await
		.expect_err("A 503 should surface as a transient failure.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		Error::Transient(TransientError::TokenEndpoint {
			status: Some(503),
			retry_after: Some(retry_after),
			..
		}) if retry_after.whole_seconds() == 30
	));
}

#[tokio::test]
async fn exchange_rejects_non_json_bodies() {
	let server = MockServer::start_async().await;
	let authenticator = mock_authenticator(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "text/html").body("<html>oops</html>");
		})
		.await;
	let session = authenticator.start_authorization();
	let err = authenticator
		.exchange_code(&session, &CallbackParams::new("code-5", session.state.clone()))
		.await
		.expect_err("A non-JSON body should fail to parse.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		Error::Transient(TransientError::TokenResponseParse { status: Some(200), .. })
	));
}

#[tokio::test]
async fn state_mismatch_skips_the_token_endpoint() {
	let server = MockServer::start_async().await;
	let authenticator = mock_authenticator(&server);
	let session = authenticator.start_authorization();
	let err = authenticator
		.exchange_code(&session, &CallbackParams::new("code-6", "forged-state"))
		.await
		.expect_err("A forged state should be rejected.");

	assert!(matches!(err, Error::StateMismatch));
}
