use std::borrow::Cow;

use http::header::AUTHORIZATION;
use http::Method;
use reqwest::Client as ReqwestClient;
use tracing::debug;
use url::Url;

use crate::credentials::SharedCredentials;
use crate::error::{HandshakeError, Result};
use crate::signer::Signer;
use crate::token_reader::{TokenReaderFuture, TokenResponse};
use crate::{OAUTH_CALLBACK_KEY, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY};

// out-of-band callback: the provider displays the verifier to the user
// instead of redirecting
const OOB_CALLBACK: &str = "oob";

/// Provider endpoints for the three-legged token exchange.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub request_token_url: Url,
    pub authorize_url: Url,
    pub access_token_url: Url,
}

impl Endpoints {
    pub fn new(request_token_url: Url, authorize_url: Url, access_token_url: Url) -> Self {
        Endpoints {
            request_token_url,
            authorize_url,
            access_token_url,
        }
    }

    /// Token exchange endpoints of the Upwork API.
    pub fn upwork() -> Self {
        Endpoints {
            request_token_url: Url::parse("https://www.upwork.com/api/auth/v1/oauth/token/request")
                .expect("well-formed constant URL"),
            authorize_url: Url::parse("https://www.upwork.com/services/api/auth")
                .expect("well-formed constant URL"),
            access_token_url: Url::parse("https://www.upwork.com/api/auth/v1/oauth/token/access")
                .expect("well-formed constant URL"),
        }
    }
}

/// Drives the request-token / access-token exchange against a provider,
/// storing each stage's token pair into the shared credential store.
///
/// The user-authorization step between the two legs is out of band: direct
/// the user to [`authorize_url`](Handshake::authorize_url), then pass the
/// verifier they obtain to [`access_token`](Handshake::access_token).
///
/// Transport failures propagate unchanged and are never retried here; a
/// response missing the expected token keys leaves the store untouched.
#[derive(Debug, Clone)]
pub struct Handshake {
    client: ReqwestClient,
    endpoints: Endpoints,
    credentials: SharedCredentials,
    callback: String,
}

impl Handshake {
    pub fn new(endpoints: Endpoints, credentials: SharedCredentials) -> Self {
        Handshake {
            client: ReqwestClient::new(),
            endpoints,
            credentials,
            callback: OOB_CALLBACK.to_string(),
        }
    }

    /// Replaces the internal `reqwest::Client`, e.g. to apply timeouts.
    pub fn with_client(mut self, client: ReqwestClient) -> Self {
        self.client = client;
        self
    }

    /// Sets the `oauth_callback` sent with the request-token leg. Defaults
    /// to `oob`.
    pub fn callback<T: Into<String>>(mut self, callback: T) -> Self {
        self.callback = callback.into();
        self
    }

    /// First leg: obtains a temporary token pair and stores it.
    pub async fn request_token(&self) -> Result<TokenResponse> {
        let snapshot = self.credentials.snapshot();
        let header = Signer::new(&snapshot).generate_oauth_header(
            &Method::POST,
            &self.endpoints.request_token_url,
            &[(
                Cow::from(OAUTH_CALLBACK_KEY),
                Cow::from(self.callback.as_str()),
            )],
        );

        let response = self
            .client
            .post(self.endpoints.request_token_url.clone())
            .header(AUTHORIZATION, header)
            .send()
            .parse_oauth_token()
            .await?;

        self.credentials
            .store_token(&response.oauth_token, &response.oauth_token_secret);
        debug!("request token stored");
        Ok(response)
    }

    /// Where to send the user for the out-of-band authorization step:
    /// `authorize_url?oauth_token=<request token>`.
    ///
    /// # Errors
    ///
    /// Fails when no request token has been stored yet.
    pub fn authorize_url(&self) -> Result<Url> {
        let snapshot = self.credentials.snapshot();
        let (token, _) = snapshot
            .token_pair()
            .ok_or(HandshakeError::MissingRequestToken)?;
        let mut url = self.endpoints.authorize_url.clone();
        url.query_pairs_mut().append_pair(OAUTH_TOKEN_KEY, token);
        Ok(url)
    }

    /// Third leg: trades the verifier for the permanent token pair,
    /// overwriting the temporary one. Terminal; the access token does not
    /// expire under this contract.
    pub async fn access_token(&self, verifier: &str) -> Result<TokenResponse> {
        let snapshot = self.credentials.snapshot();
        if snapshot.token_pair().is_none() {
            return Err(HandshakeError::MissingRequestToken.into());
        }
        let header = Signer::new(&snapshot).generate_oauth_header(
            &Method::POST,
            &self.endpoints.access_token_url,
            &[(Cow::from(OAUTH_VERIFIER_KEY), Cow::from(verifier))],
        );

        let response = self
            .client
            .post(self.endpoints.access_token_url.clone())
            .header(AUTHORIZATION, header)
            .send()
            .parse_oauth_token()
            .await?;

        self.credentials
            .store_token(&response.oauth_token, &response.oauth_token_secret);
        debug!("access token stored");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credentials;

    fn handshake() -> (Handshake, SharedCredentials) {
        let credentials = SharedCredentials::new(Credentials::new("ck", "cs").unwrap());
        let handshake = Handshake::new(Endpoints::upwork(), credentials.clone());
        (handshake, credentials)
    }

    #[test]
    fn authorize_url_requires_request_token() {
        let (handshake, _) = handshake();
        assert!(handshake.authorize_url().is_err());
    }

    #[test]
    fn authorize_url_appends_stored_token() {
        let (handshake, credentials) = handshake();
        credentials.store_token("temp", "temp-secret");
        let url = handshake.authorize_url().unwrap();
        assert_eq!(url.query(), Some("oauth_token=temp"));
    }

    #[tokio::test]
    async fn access_token_requires_request_token() {
        let (handshake, _) = handshake();
        let result = handshake.access_token("verifier").await;
        assert!(result.is_err());
    }
}
