//! Behavior tests over a real HTTP round trip.
//!
//! A local mock server stands in for the market so the reqwest transport,
//! URL resolution, headers and form bodies are exercised as shipped.

use std::sync::Arc;

use mineos_market_core::{
    Config, ConfigOverrides, HttpClient, MarketClient, MarketError, ReqwestHttpClient,
};
use wiremock::matchers::{body_string, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATISTICS_BODY: &str = r#"{success=true,result={users_count=10,publications_count=5,reviews_count=3,messages_count=7,last_registered_user="Eve",most_popular_user="Bob"}}"#;

fn client_for(server: &MockServer, overrides: ConfigOverrides) -> MarketClient {
    let mut config = Config::with_overrides(
        ConfigOverrides::new().host_url(format!("{}/MineOSAPI/2.04/", server.uri())),
    );
    config.apply(overrides);
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    MarketClient::with_http_client(config, http)
}

#[tokio::test]
async fn when_endpoint_is_called_request_is_a_form_post_to_its_php_script() {
    // Given: A market answering statistics
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/MineOSAPI/2.04/statistics.php"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATISTICS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    // When: Statistics are fetched
    let client = client_for(&server, ConfigOverrides::new());
    let statistic = client
        .statistics()
        .statistic()
        .await
        .expect("statistics succeed");

    // Then: The decoded payload is typed
    assert_eq!(statistic.publications_count, 5);
    assert_eq!(statistic.last_registered_user, "Eve");
}

#[tokio::test]
async fn when_custom_headers_are_configured_they_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("user-agent", "market-tests/1.0"))
        .and(header("x-trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATISTICS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(
        &server,
        ConfigOverrides::new()
            .header("User-Agent", "market-tests/1.0")
            .header("X-Trace", "abc"),
    );

    client
        .statistics()
        .statistic()
        .await
        .expect("headers matched");
}

#[tokio::test]
async fn when_authenticated_call_is_made_token_is_in_the_form_body() {
    // Given: A market expecting a message post
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/MineOSAPI/2.04/message.php"))
        .and(body_string_contains("token=tok"))
        .and(body_string_contains("user_name=Ann"))
        .and(body_string_contains("text=Hello%20there"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{success=true}"))
        .expect(1)
        .mount(&server)
        .await;

    // When: A logged-in user sends a message
    let mut client = client_for(&server, ConfigOverrides::new());
    client.use_token("tok");
    client
        .messages()
        .send_message("Ann", "Hello there")
        .await
        .expect("message sent");

    // Then: The mock's expectation is verified on drop
}

#[tokio::test]
async fn when_public_call_has_no_parameters_body_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATISTICS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server, ConfigOverrides::new());
    client.use_token("never-sent");
    client
        .statistics()
        .statistic()
        .await
        .expect("empty body matched");
}

#[tokio::test]
async fn when_proxy_is_configured_target_url_is_encoded_into_it() {
    // Given: A proxy that forwards `?url=<target>`
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/proxy"))
        .and(query_param(
            "url",
            "http://market.test/MineOSAPI/2.04/statistics.php",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(STATISTICS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    // When: The client is configured with that proxy
    let client = client_for(
        &server,
        ConfigOverrides::new()
            .host_url("http://market.test/MineOSAPI/2.04/")
            .proxy_url(format!("{}/proxy?url=", server.uri())),
    );

    // Then: The request reaches the proxy with the real URL as parameter
    client
        .statistics()
        .statistic()
        .await
        .expect("proxied call succeeds");
}

#[tokio::test]
async fn when_server_errors_status_is_reported_as_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server, ConfigOverrides::new());
    let error = client
        .statistics()
        .statistic()
        .await
        .expect_err("500 fails");

    assert!(matches!(
        &error,
        MarketError::Http { status: 500, status_text, .. } if status_text == "Internal Server Error"
    ));
}

#[tokio::test]
async fn when_server_is_unreachable_error_is_network() {
    // Given: A host on a port nothing listens on
    let config = Config::with_overrides(ConfigOverrides::new().host_url("http://127.0.0.1:1/"));
    let client = MarketClient::with_http_client(config, Arc::new(ReqwestHttpClient::new()));

    // When: A request is attempted
    let error = client
        .statistics()
        .statistic()
        .await
        .expect_err("nothing listens");

    // Then: No HTTP status is involved
    assert!(matches!(error, MarketError::Network { .. }));
}
