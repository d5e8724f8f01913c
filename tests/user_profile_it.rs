#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use simpleid_oauth2::{
	error::{Error, ProfileFetchError, TransportError},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{ProfileEmail, ReqwestSimpleIdStrategy, SimpleIdConfig, SimpleIdStrategy},
	reqwest::Client,
};

const ACCESS_TOKEN: &str = "token-123";

fn strategy(profile_url: &str) -> ReqwestSimpleIdStrategy {
	let config = SimpleIdConfig::builder("client-it", "secret-it", "https://app.example.com/cb")
		.user_profile_url(profile_url)
		.build()
		.expect("Profile test configuration should be valid.");
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	SimpleIdStrategy::with_http_client(
		config,
		ReqwestHttpClient::with_client(client),
		Arc::new(ReqwestTransportErrorMapper),
	)
}

#[tokio::test]
async fn well_formed_profile_is_normalized() {
	let server = MockServer::start_async().await;
	let body = r#"{"data":{"id":"42","name":"Jane","link":"https://id.example/42","email":"jane@example.com","avatar":"https://id.example/42.png"}}"#;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/1/user")
				.header("authorization", format!("Bearer {ACCESS_TOKEN}"));
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await;
	let profile = strategy(&server.url("/1/user"))
		.user_profile(ACCESS_TOKEN)
		.await
		.expect("Well-formed profile should load.");

	mock.assert_async().await;

	assert_eq!(profile.provider, "simpleid");
	assert_eq!(profile.id, "42");
	assert_eq!(profile.display_name.as_deref(), Some("Jane"));
	assert_eq!(profile.profile_url.as_deref(), Some("https://id.example/42"));
	assert_eq!(profile.emails, vec![ProfileEmail { value: Some("jane@example.com".into()) }]);
	assert_eq!(profile.raw, body);

	let parsed: serde_json::Value =
		serde_json::from_str(body).expect("Fixture body should be valid JSON.");

	assert_eq!(profile.json, parsed["data"]);
	assert_eq!(profile.json["avatar"], "https://id.example/42.png");
}

#[tokio::test]
async fn non_json_body_is_malformed() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/1/user");
			then.status(200).body("not json");
		})
		.await;
	let err = strategy(&server.url("/1/user"))
		.user_profile(ACCESS_TOKEN)
		.await
		.expect_err("Plain text bodies should be rejected.");

	mock.assert_async().await;

	assert!(matches!(err, Error::MalformedProfile(_)), "Unexpected error: {err:?}.");
}

#[tokio::test]
async fn body_without_data_is_malformed() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/1/user");
			then.status(200).body(r#"{"id":"42","email":"jane@example.com"}"#);
		})
		.await;
	let err = strategy(&server.url("/1/user"))
		.user_profile(ACCESS_TOKEN)
		.await
		.expect_err("Bodies without a data object should be rejected.");

	mock.assert_async().await;

	assert!(matches!(err, Error::MalformedProfile(_)), "Unexpected error: {err:?}.");
}

#[tokio::test]
async fn upstream_failure_status_is_a_fetch_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/1/user");
			then.status(503).body("not json either");
		})
		.await;
	let err = strategy(&server.url("/1/user"))
		.user_profile(ACCESS_TOKEN)
		.await
		.expect_err("Upstream failures should be reported.");

	mock.assert_async().await;

	assert_eq!(err.to_string(), "Failed to fetch user profile.");
	assert!(matches!(err, Error::ProfileFetch(ProfileFetchError::Status { status: 503, .. })));
}

#[tokio::test]
async fn connection_refused_is_a_fetch_error() {
	let err = strategy("https://127.0.0.1:1/1/user")
		.user_profile(ACCESS_TOKEN)
		.await
		.expect_err("Unreachable endpoints should fail.");

	assert!(
		matches!(err, Error::ProfileFetch(ProfileFetchError::Transport(TransportError::Network { .. }))),
		"Unexpected error: {err:?}."
	);
}

#[tokio::test]
async fn concurrent_calls_run_independently() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/1/user");
			then.status(200).body(r#"{"data":{"id":7,"email":"seven@example.com"}}"#);
		})
		.await;
	let strategy = Arc::new(strategy(&server.url("/1/user")));
	let handles = (0..4)
		.map(|idx| {
			let strategy = strategy.clone();

			tokio::spawn(async move { strategy.user_profile(&format!("token-{idx}")).await })
		})
		.collect::<Vec<_>>();

	for handle in handles {
		let profile = handle
			.await
			.expect("Profile task should not panic.")
			.expect("Concurrent profile loads should succeed.");

		assert_eq!(profile.id, "7");
	}

	mock.assert_hits_async(4).await;
}
