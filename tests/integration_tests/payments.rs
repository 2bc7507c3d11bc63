use crate::common::test_context::TestContext;
use payit_rust::Error;
use serde::Serialize;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, ResponseTemplate,
};

#[tokio::test]
async fn create_payment() {
    let ctx = TestContext::start().await;
    let payload = json!({
        "amount": { "value": "10.00", "currency": "GBP" },
        "reference": "order-42"
    });
    Mock::given(method("POST"))
        .and(path("/lp2nos-merchant/merchant-payments"))
        .and(header("Authorization", ctx.bearer().as_str()))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "paymentId": "p-123",
            "redirectUrl": "https://bank.example/authorise"
        })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let res = ctx.client.payments.create_payment(&payload).await.unwrap();

    assert_eq!(res["paymentId"], "p-123");
}

#[tokio::test]
async fn confirm_payment_with_payload() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/payments/p-123/confirm"))
        .and(header("Authorization", ctx.bearer().as_str()))
        .and(body_json(json!({ "otp": "000000" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "CONFIRMED" })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let res = ctx
        .client
        .payments
        .confirm_payment("p-123", Some(&json!({ "otp": "000000" })))
        .await
        .unwrap();

    assert_eq!(res["status"], "CONFIRMED");
}

#[tokio::test]
async fn confirm_payment_with_typed_payload() {
    #[derive(Serialize)]
    struct Confirmation<'a> {
        otp: &'a str,
        channel: &'a str,
    }

    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/payments/p-456/confirm"))
        .and(body_json(json!({ "otp": "123456", "channel": "sms" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "CONFIRMED" })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let res = ctx
        .client
        .payments
        .confirm_payment(
            "p-456",
            Some(&Confirmation {
                otp: "123456",
                channel: "sms",
            }),
        )
        .await
        .unwrap();

    assert_eq!(res["status"], "CONFIRMED");
}

#[tokio::test]
async fn confirm_payment_without_payload_sends_no_body() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/payments/p-123/confirm"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let res = ctx
        .client
        .payments
        .confirm_payment("p-123", None::<&Value>)
        .await
        .unwrap();

    assert!(res.is_null());
    let requests = ctx.mock_server.received_requests().await.unwrap();
    let confirm = requests
        .iter()
        .find(|r| r.url.path() == "/payments/p-123/confirm")
        .unwrap();
    assert!(confirm.body.is_empty());
}

#[tokio::test]
async fn get_payment_status() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/payments/p-123/status"))
        .and(header("Authorization", ctx.bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "COMPLETED" })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let res = ctx
        .client
        .payments
        .get_payment_status("p-123")
        .await
        .unwrap();

    assert_eq!(res, json!({ "status": "COMPLETED" }));
}

#[tokio::test]
async fn payment_ids_are_percent_encoded() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/payments/a%2Fb/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "PENDING" })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    ctx.client
        .payments
        .get_payment_status("a/b")
        .await
        .unwrap();
}

#[tokio::test]
async fn list_banks() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/eligible-banks"))
        .and(query_param("country", "GB"))
        .and(header("Authorization", ctx.bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "natwest", "name": "NatWest" },
            { "id": "rbs", "name": "Royal Bank of Scotland" }
        ])))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let banks = ctx
        .client
        .payments
        .list_banks(&[("country", "GB")])
        .await
        .unwrap();

    assert_eq!(banks.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn list_banks_without_query() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/eligible-banks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let banks = ctx.client.payments.list_banks(&[]).await.unwrap();

    assert_eq!(banks, json!([]));
    let requests = ctx.mock_server.received_requests().await.unwrap();
    let list = requests
        .iter()
        .find(|r| r.url.path() == "/eligible-banks")
        .unwrap();
    assert_eq!(list.url.query(), None);
}

#[tokio::test]
async fn api_errors_carry_status_and_body_and_are_not_retried() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/payments/missing/status"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Payment not found" })),
        )
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let err = ctx
        .client
        .payments
        .get_payment_status("missing")
        .await
        .unwrap_err();

    match err {
        Error::ApiError(api_error) => {
            assert_eq!(api_error.status, 404);
            assert!(api_error.body.contains("Payment not found"));
        }
        e => panic!("Unexpected error: {}", e),
    }
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let ctx = TestContext::start().await;
    Mock::given(method("POST"))
        .and(path("/lp2nos-merchant/merchant-payments"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let err = ctx
        .client
        .payments
        .create_payment(&json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ApiError(api_error) if api_error.status == 503));
}

#[tokio::test]
async fn malformed_response_is_a_decode_error() {
    let ctx = TestContext::start().await;
    Mock::given(method("GET"))
        .and(path("/payments/p-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&ctx.mock_server)
        .await;

    let err = ctx
        .client
        .payments
        .get_payment_status("p-1")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ResponseDecode { body, .. } if body == "not json"));
}

#[tokio::test]
async fn slow_responses_time_out() {
    let ctx = TestContext::start_with(|config| {
        config.timeout_seconds(1u64);
    })
    .await;
    Mock::given(method("GET"))
        .and(path("/payments/p-1/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "PENDING" }))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&ctx.mock_server)
        .await;

    let err = ctx
        .client
        .payments
        .get_payment_status("p-1")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpError(e) if e.is_timeout()));
}
