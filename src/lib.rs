/*!
upwork-oauth1: OAuth 1.0a signing and token exchange for the Upwork API.

# Overview

This library owns the OAuth 1.0a HMAC-SHA1 signing algorithm (RFC 5849) and
the three-legged request-token / access-token handshake, and layers both over
[reqwest](https://crates.io/crates/reqwest) so a higher-level REST client can
attach the generated `Authorization` header to every outbound call.

# How to use

## Basic usecase 1 - calling the API with an access token

```no_run
use upwork_oauth1::{Credentials, OAuthClientProvider};

# async fn run() -> Result<(), Box<dyn std::error::Error>> {
// prepare authorization info
let consumer_key = "[CONSUMER_KEY]";
let consumer_secret = "[CONSUMER_SECRET]";
let access_token = "[ACCESS_TOKEN]";
let token_secret = "[TOKEN_SECRET]";

let credentials = Credentials::new(consumer_key, consumer_secret)?
    .with_token(access_token, token_secret);

// sample: list engagements on upwork
let endpoint = "https://www.upwork.com/api/hr/v2/engagements.json";

let client = reqwest::Client::new();
let resp = client
    // enable OAuth1 request
    .oauth1(&credentials)
    .get(endpoint)
    .query(&[("status", "active")])
    .send()
    .await?;
# Ok(())
# }
```

## Basic usecase 2 - Acquiring OAuth token & secret

```no_run
use upwork_oauth1::{Credentials, Endpoints, Handshake, SharedCredentials};

# async fn run() -> Result<(), upwork_oauth1::Error> {
// prepare authorization info
let consumer_key = "[CONSUMER_KEY]";
let consumer_secret = "[CONSUMER_SECRET]";

let credentials = SharedCredentials::new(Credentials::new(consumer_key, consumer_secret)?);
let handshake = Handshake::new(Endpoints::upwork(), credentials.clone());

// step 1: acquire request token & token secret
handshake.request_token().await?;

// step 2: direct the user to the authorization page; the provider hands
// them a verifier out of band
println!("please access to: {}", handshake.authorize_url()?);
let verifier = "[VERIFIER FROM THE USER]";

// step 3: acquire access token
let resp = handshake.access_token(verifier).await?;
println!(
    "your token and secret is: \n token: {}\n secret: {}",
    resp.oauth_token, resp.oauth_token_secret
);
println!("other attributes: {:#?}", resp.remain);
# Ok(())
# }
```

The permanent token pair is stored back into the [`SharedCredentials`], so
signed API calls sharing the store pick it up immediately.
*/
mod client;
mod credentials;
mod error;
mod handshake;
mod request;
mod signer;
mod token_reader;

// exposed to external program
pub use client::{Client, OAuthClientProvider};
pub use credentials::{Credentials, SharedCredentials};
pub use error::{
    CredentialsError, CredentialsResult, Error, HandshakeError, HandshakeResult, Result,
    TokenReaderError, TokenReaderResult,
};
pub use handshake::{Endpoints, Handshake};
pub use request::RequestBuilder;
pub use signer::{generate_nonce, percent_encode, Signer, OAUTH_VERSION, SIGNATURE_METHOD};
pub use token_reader::{OAuthResponse, TokenReader, TokenReaderFuture, TokenResponse};

pub use reqwest;
pub use url;

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_token_secret`.
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
pub(crate) const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
pub(crate) const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub(crate) const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
