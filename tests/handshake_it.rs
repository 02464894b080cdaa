use httpmock::prelude::*;

use upwork_oauth1::url::Url;
use upwork_oauth1::{Credentials, Endpoints, Error, Handshake, SharedCredentials, TokenReaderError};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn endpoints(server: &MockServer) -> Endpoints {
    Endpoints::new(
        Url::parse(&server.url("/oauth/token/request")).unwrap(),
        Url::parse(&server.url("/services/api/auth")).unwrap(),
        Url::parse(&server.url("/oauth/token/access")).unwrap(),
    )
}

fn shared_credentials() -> SharedCredentials {
    SharedCredentials::new(Credentials::new("ck", "cs").unwrap())
}

#[tokio::test]
async fn request_token_stores_temporary_pair() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
        when.method(POST)
            .path("/oauth/token/request")
            .header_exists("authorization");
        then.status(200)
            .header("content-type", FORM_CONTENT_TYPE)
            .body("oauth_token=temp&oauth_token_secret=temp-secret&oauth_callback_confirmed=true");
    })
    .await;

    let credentials = shared_credentials();
    let handshake = Handshake::new(endpoints(&server), credentials.clone());

    let response = handshake.request_token().await.unwrap();
    assert_eq!(response.oauth_token, "temp");
    assert_eq!(response.oauth_token_secret, "temp-secret");
    assert_eq!(
        response.remain.get("oauth_callback_confirmed").unwrap(),
        "true"
    );
    assert_eq!(
        credentials.snapshot().token_pair(),
        Some(("temp", "temp-secret"))
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn access_token_overwrites_temporary_pair() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/oauth/token/request");
        then.status(200)
            .header("content-type", FORM_CONTENT_TYPE)
            .body("oauth_token=temp&oauth_token_secret=temp-secret");
    })
    .await;
    let access_mock = server.mock_async(|when, then| {
        when.method(POST)
            .path("/oauth/token/access")
            .header_exists("authorization");
        then.status(200)
            .header("content-type", FORM_CONTENT_TYPE)
            .body("oauth_token=perm&oauth_token_secret=perm-secret");
    })
    .await;

    let credentials = shared_credentials();
    let handshake = Handshake::new(endpoints(&server), credentials.clone());

    handshake.request_token().await.unwrap();
    let authorize = handshake.authorize_url().unwrap();
    assert_eq!(authorize.query(), Some("oauth_token=temp"));

    let response = handshake.access_token("verifier-from-user").await.unwrap();
    assert_eq!(response.oauth_token, "perm");
    assert_eq!(
        credentials.snapshot().token_pair(),
        Some(("perm", "perm-secret"))
    );
    access_mock.assert_async().await;
}

#[tokio::test]
async fn malformed_response_leaves_store_untouched() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/oauth/token/request");
        then.status(200)
            .header("content-type", FORM_CONTENT_TYPE)
            .body("oauth_token_secret=only-the-secret");
    })
    .await;

    let credentials = shared_credentials();
    let handshake = Handshake::new(endpoints(&server), credentials.clone());

    let result = handshake.request_token().await;
    match result {
        Err(Error::TokenReader(TokenReaderError::TokenKeyNotFound(key, _))) => {
            assert_eq!(key, "oauth_token")
        }
        other => panic!("expected protocol error, got {:?}", other.map(|r| r.oauth_token)),
    }
    assert_eq!(credentials.snapshot().token_pair(), None);
}

#[tokio::test]
async fn transport_error_propagates() {
    // port 1 is never listening: connection refused
    let endpoints = Endpoints::new(
        Url::parse("http://127.0.0.1:1/oauth/token/request").unwrap(),
        Url::parse("http://127.0.0.1:1/services/api/auth").unwrap(),
        Url::parse("http://127.0.0.1:1/oauth/token/access").unwrap(),
    );
    let handshake = Handshake::new(endpoints, shared_credentials());

    let result = handshake.request_token().await;
    assert!(matches!(result, Err(Error::Reqwest(_))));
}

#[tokio::test]
async fn custom_callback_is_sent_in_authorization_header() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
        when.method(POST)
            .path("/oauth/token/request")
            .header_exists("authorization")
            .matches(|req| {
                req.headers
                    .as_ref()
                    .map(|headers| {
                        headers.iter().any(|(name, value)| {
                            name.eq_ignore_ascii_case("authorization")
                                && value.starts_with("OAuth ")
                                && value.contains("oauth_callback=")
                                && value.contains("https%3A%2F%2Fapp.example.com%2Fcallback")
                        })
                    })
                    .unwrap_or(false)
            });
        then.status(200)
            .header("content-type", FORM_CONTENT_TYPE)
            .body("oauth_token=temp&oauth_token_secret=temp-secret");
    })
    .await;

    let handshake = Handshake::new(endpoints(&server), shared_credentials())
        .callback("https://app.example.com/callback");
    handshake.request_token().await.unwrap();
    mock.assert_async().await;
}
