use crate::common::test_context::{TestContext, TOKEN_PATH};
use payit_rust::{config::ClientConfigBuilder, error::TokenAcquisitionError, Error, PayitClient};
use serde_json::json;
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, ResponseTemplate,
};

#[tokio::test]
async fn get_access_token() {
    let ctx = TestContext::start().await;

    let access_token = ctx.client.auth.get_access_token().await.unwrap();

    assert_eq!(access_token.expose_secret(), ctx.access_token);
    assert!(access_token.expires_at() > chrono::Utc::now());
}

#[tokio::test]
async fn access_token_is_shared_by_all_apis() {
    let ctx = TestContext::start().await;
    Mock::given(header("Authorization", ctx.bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "UP" })))
        .mount(&ctx.mock_server)
        .await;

    ctx.client.links.get_health().await.unwrap();
    ctx.client.links.get_info().await.unwrap();
    ctx.client.payments.get_payment_status("p-1").await.unwrap();
    ctx.client.auth.get_access_token().await.unwrap();

    assert_eq!(ctx.token_requests().await, 1);
}

#[tokio::test]
async fn concurrent_calls_share_one_grant() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "UP" })))
        .expect(20)
        .mount(&ctx.mock_server)
        .await;

    let calls = (0..20).map(|_| {
        let client = ctx.client.clone();
        tokio::spawn(async move { client.links.get_health().await })
    });
    for res in futures::future::join_all(calls).await {
        res.unwrap().unwrap();
    }

    assert_eq!(ctx.token_requests().await, 1);
}

#[tokio::test]
async fn resource_is_sent_with_the_grant() {
    let ctx = TestContext::start_with(|config| {
        config.resource("https://payit.example/resource");
    })
    .await;

    ctx.client.auth.get_access_token().await.unwrap();

    let requests = ctx.mock_server.received_requests().await.unwrap();
    let grant = String::from_utf8_lossy(&requests[0].body).into_owned();
    assert!(grant.contains("grant_type=client_credentials"), "{}", grant);
    assert!(
        grant.contains("resource=https%3A%2F%2Fpayit.example%2Fresource"),
        "{}",
        grant
    );
}

#[tokio::test]
async fn invalid_credentials() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("client_id=invalid"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client"
        })))
        .mount(&ctx.mock_server)
        .await;

    // Create a new client with a set of invalid credentials pointing to the same mock server
    let config = ClientConfigBuilder::default()
        .base_url(ctx.mock_server.uri())
        .token_url(format!("{}{}", ctx.mock_server.uri(), TOKEN_PATH))
        .client_id("invalid")
        .client_secret("invalid")
        .build()
        .unwrap();
    let client = PayitClient::new(config).unwrap();

    let err = client
        .auth
        .get_access_token()
        .await
        .expect_err("Expected error");
    assert!(matches!(
        err,
        Error::TokenAcquisition(TokenAcquisitionError::Rejected { status: 401, ref body })
            if body.contains("invalid_client")
    ));
}

#[tokio::test]
async fn api_call_fails_when_token_cannot_be_obtained() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("client_id=tokenless"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "expires_in": 3600 })))
        .mount(&ctx.mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&ctx.mock_server)
        .await;

    let config = ClientConfigBuilder::default()
        .base_url(ctx.mock_server.uri())
        .token_url(format!("{}{}", ctx.mock_server.uri(), TOKEN_PATH))
        .client_id("tokenless")
        .client_secret("secret")
        .build()
        .unwrap();
    let client = PayitClient::new(config).unwrap();

    let err = client.links.get_info().await.unwrap_err();

    match err {
        Error::TokenAcquisition(TokenAcquisitionError::MissingAccessToken { body }) => {
            assert!(body.contains("expires_in"))
        }
        e => panic!("Unexpected error: {}", e),
    }
}
