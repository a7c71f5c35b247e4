//! Walks through a full Bitbucket login against a local mock of bitbucket.org: build the
//! authorize redirect, accept the callback, exchange the code, resolve the profile, and hand the
//! result to a verify callback.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use oauth2_bitbucket::{
	auth::{BitbucketScope, ScopeList},
	flows::{CallbackParams, ReqwestAuthenticator},
	http::ReqwestHttpClient,
	provider::{BitbucketStrategy, ClientConfig, ProviderDescriptor, StrategyConfig},
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/site/oauth2/access_token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"refresh_token\":\"demo-refresh\",\
				 \"token_type\":\"bearer\",\"expires_in\":7200,\"scopes\":\"account email\"}",
			);
		})
		.await;
	let account_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/2.0/user");
			then.status(200).header("content-type", "application/json").body(
				"{\"account_id\":\"557058:demo\",\"username\":\"demo-user\",\
				 \"display_name\":\"Demo User\",\
				 \"links\":{\"avatar\":{\"href\":\"https://avatar.example.com/demo.png\"}}}",
			);
		})
		.await;
	let emails_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/2.0/user/emails");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"values\":[{\"email\":\"demo@example.com\",\"is_primary\":true}]}");
		})
		.await;
	let descriptor = ProviderDescriptor::builder("bitbucket-mock")
		.authorization_endpoint(Url::parse(&server.url("/site/oauth2/authorize"))?)
		.token_endpoint(Url::parse(&server.url("/site/oauth2/access_token"))?)
		.user_info_endpoint(Url::parse(&server.url("/2.0/user"))?)
		.user_emails_endpoint(Url::parse(&server.url("/2.0/user/emails"))?)
		.build()?;
	let client =
		ClientConfig::new("demo-key", "demo-secret", "https://app.example.com/auth/callback")?;
	let config = StrategyConfig::new(client)
		.with_scope(ScopeList::new([BitbucketScope::Account, BitbucketScope::Email])?)
		.with_user_agent("bitbucket-login-demo");
	// The mock serves a self-signed certificate.
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let authenticator = <ReqwestAuthenticator<_>>::with_http_client(
		BitbucketStrategy::with_descriptor(config, descriptor),
		http_client,
	);
	let session = authenticator.start_authorization();

	println!("Redirect the user to: {}.", session.authorize_url);

	// The provider redirects back with `code` and the issued `state`.
	let mut callback_url = session.redirect_uri.clone();

	callback_url
		.query_pairs_mut()
		.append_pair("code", "demo-code")
		.append_pair("state", &session.state);

	let callback = CallbackParams::from_url(&callback_url)?;
	let user = authenticator
		.authenticate(&session, &callback, |authentication| async move {
			println!("Access token expires in {:?} seconds.", authentication.tokens.expires_in());

			Ok::<_, std::io::Error>(authentication.profile)
		})
		.await?;

	println!(
		"Signed in {} ({}) with email {}.",
		user.display_name,
		user.id,
		user.primary_email().unwrap_or("<none>")
	);

	token_mock.assert_async().await;
	account_mock.assert_async().await;
	emails_mock.assert_async().await;

	Ok(())
}
