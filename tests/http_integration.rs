//! Integration tests for the Paystack client using wiremock
//!
//! These tests drive the client against mocked endpoints, covering
//! authentication headers, body encodings and response classification.

use paystack::{ApiResponse, Call, PaystackClient, PaystackError, RequestBuilder, RequestExecutor};
use secrecy::SecretString;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{bearer_token, body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "sk_test_integration";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn client_for(server: &MockServer) -> PaystackClient {
    init_tracing();
    PaystackClient::builder()
        .secret_key(SECRET)
        .base_url(server.uri())
        .build()
        .expect("client should build")
}

/// Test module for request execution
mod executor_tests {
    use super::*;

    /// Successful GET returns the JSON body unchanged
    #[tokio::test]
    async fn test_get_success_returns_json() {
        let server = MockServer::start().await;

        let expected = json!({
            "status": true,
            "message": "Verification successful",
            "data": {"reference": "T123", "status": "success", "amount": 50000}
        });

        Mock::given(method("GET"))
            .and(path("/transaction/verify/T123"))
            .and(bearer_token(SECRET))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&expected))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = assert_ok!(
            client
                .transactions()
                .call("verify", Call::new().arg("reference", "T123"))
                .await
        );

        assert_eq!(response, expected);
    }

    /// 404 surfaces as an HTTP error carrying the status code
    #[tokio::test]
    async fn test_404_returns_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/customer/CUS_missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = assert_err!(
            client
                .customers()
                .call("fetch", Call::new().arg("email_or_code", "CUS_missing"))
                .await
        );

        assert!(err.to_string().contains("404"));
        assert_eq!(err.status(), Some(404));
        match err {
            PaystackError::Http { message, status_text, .. } => {
                assert_eq!(message.as_deref(), Some("not found"));
                assert_eq!(status_text, "Not Found");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// 401 response indicates a bad secret key
    #[tokio::test]
    async fn test_401_returns_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/balance"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"status": false, "message": "Invalid key"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = assert_err!(client.transfers_control().call("check_balance", Call::new()).await);

        assert_eq!(err.status(), Some(401));
        assert_eq!(
            paystack::format_paystack_error(&err),
            "Authentication failed. Check your Paystack secret key."
        );
    }

    /// Form POST sends parameters as url-encoded fields
    #[tokio::test]
    async fn test_post_form_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/customer"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("a=1&b=2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_ok!(
            client
                .customers()
                .call("create", Call::new().param("b", 2).param("a", 1))
                .await
        );
    }

    /// JSON POST keeps parameters in the query string
    #[tokio::test]
    async fn test_post_json_body_and_query() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/transaction/initialize"))
            .and(query_param("a", "1"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"x": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "data": {"authorization_url": "https://checkout.paystack.com/abc"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = assert_ok!(
            client
                .transactions()
                .call("initialize", Call::new().param("a", 1).json(json!({"x": 1})))
                .await
        );

        assert_eq!(
            response["data"]["authorization_url"],
            "https://checkout.paystack.com/abc"
        );
    }

    /// PUT with a JSON body targets the rendered id path
    #[tokio::test]
    async fn test_put_json() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/plan/PLN_abc"))
            .and(body_json(json!({"amount": 10000})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_ok!(
            client
                .plans()
                .call(
                    "update",
                    Call::new().arg("id_or_code", "PLN_abc").json(json!({"amount": 10000})),
                )
                .await
        );
    }

    /// DELETE request carries parameters in the query string
    #[tokio::test]
    async fn test_delete_request() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/apple-pay/domain"))
            .and(query_param("domainName", "example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_ok!(
            client
                .apple_pay()
                .call("unregister_domain", Call::new().param("domainName", "example.com"))
                .await
        );
    }

    /// Empty body on a success status is an error
    #[tokio::test]
    async fn test_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/transfer/enable_otp"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = assert_err!(client.transfers_control().call("enable_otp", Call::new()).await);
        assert!(matches!(err, PaystackError::EmptyResponse));
    }

    /// Malformed JSON is a parse error
    #[tokio::test]
    async fn test_malformed_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/country"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = assert_err!(client.miscellaneous().call("list_countries", Call::new()).await);
        assert!(matches!(err, PaystackError::MalformedResponse(_)));
    }

    /// Connection failures are network errors
    #[tokio::test]
    async fn test_network_error() {
        let client = PaystackClient::builder()
            .secret_key(SECRET)
            .base_url("http://127.0.0.1:1")
            .build()
            .unwrap();

        let err = assert_err!(client.plans().call("list", Call::new()).await);
        assert!(err.is_network());
        assert!(err.to_string().starts_with("network or request error"));
    }

    /// An empty key fails before any request is sent
    #[tokio::test]
    async fn test_empty_key_fails_before_network() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
            .expect(0)
            .mount(&server)
            .await;

        let executor = RequestExecutor::new(SecretString::from(String::new())).unwrap();
        let request = RequestBuilder::new(format!("{}/bank", server.uri())).build_get();

        let err = assert_err!(executor.execute(request).await);
        assert!(err.is_config());
    }

    /// Typed deserialization through the response envelope
    #[tokio::test]
    async fn test_call_as_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bank"))
            .and(query_param("country", "nigeria"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "message": "Banks retrieved",
                "data": [{"name": "Access Bank", "code": "044"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response: ApiResponse = assert_ok!(
            client
                .miscellaneous()
                .call_as("list_banks", Call::new().param("country", "nigeria"))
                .await
        );

        assert!(response.status);
        assert_eq!(response.data.unwrap()[0]["code"], "044");
    }
}

/// Test module for client sharing
mod client_tests {
    use super::*;

    /// Clones of one client can issue requests concurrently
    #[tokio::test]
    async fn test_concurrent_calls_share_credential() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/product"))
            .and(bearer_token(SECRET))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true, "data": []})))
            .expect(8)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let calls = (0..8).map(|page| {
            let client = client.clone();
            async move {
                client
                    .products()
                    .call("list", Call::new().param("page", page))
                    .await
            }
        });

        let results = futures::future::join_all(calls).await;
        assert!(results.iter().all(|r| r.is_ok()));
    }

    /// Two clients with different keys never see each other's credential
    #[tokio::test]
    async fn test_clients_keep_their_own_keys() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/refund"))
            .and(bearer_token("sk_test_one"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"who": "one"})))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/refund"))
            .and(bearer_token("sk_test_two"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"who": "two"})))
            .mount(&server)
            .await;

        let one = PaystackClient::builder()
            .secret_key("sk_test_one")
            .base_url(server.uri())
            .build()
            .unwrap();
        let two = PaystackClient::builder()
            .secret_key("sk_test_two")
            .base_url(server.uri())
            .build()
            .unwrap();

        let a = one.refunds().call("list", Call::new()).await.unwrap();
        let b = two.refunds().call("list", Call::new()).await.unwrap();

        assert_eq!(a["who"], "one");
        assert_eq!(b["who"], "two");
    }
}
