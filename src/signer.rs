use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use url::Url;

use crate::credentials::Credentials;
use crate::{
    OAUTH_CONSUMER_KEY, OAUTH_KEY_PREFIX, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY,
    OAUTH_SIGNATURE_METHOD_KEY, OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERSION_KEY,
};

type HmacSha1 = Hmac<Sha1>;

/// `oauth_signature_method` value produced by this signer.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
/// `oauth_version` value produced by this signer.
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_LENGTH: usize = 32;

// Everything outside the RFC 3986 unreserved set gets percent-encoded,
// including `/`, `+` and space (as %20, never `+`).
const RFC3986_ENCODED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes `input` with the RFC 3986 unreserved set, as required for
/// OAuth 1.0a parameter normalization.
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, RFC3986_ENCODED).to_string()
}

/// Generates a fresh `oauth_nonce` value: random alphanumeric characters, so
/// the value survives percent-encoding unchanged.
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// Computes OAuth 1.0a HMAC-SHA1 signatures and `Authorization` headers over
/// a borrowed credential state.
///
/// Signing is a pure computation: given identical inputs (including the
/// nonce and timestamp inside the parameter set) the output is identical, and
/// concurrent invocations never interfere.
#[derive(Debug, Clone)]
pub struct Signer<'a> {
    credentials: &'a Credentials,
}

impl<'a> Signer<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        Signer { credentials }
    }

    /// Computes the base64-encoded HMAC-SHA1 signature over `parameters`.
    ///
    /// `url` must carry no query string; query parameters belong in
    /// `parameters` alongside the `oauth_*` protocol parameters. The empty
    /// slice is a valid parameter set. The signature itself is never part of
    /// the signed set.
    pub fn generate_signature(
        &self,
        method: &Method,
        url: &Url,
        parameters: &[(Cow<'_, str>, Cow<'_, str>)],
    ) -> String {
        // normalize: encode first, then sort by encoded key and value
        let mut encoded: Vec<(String, String)> = parameters
            .iter()
            .map(|(key, value)| (percent_encode(key), percent_encode(value)))
            .collect();
        encoded.sort();
        let parameter_string = encoded
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.as_str(),
            percent_encode(url.as_str()),
            percent_encode(&parameter_string)
        );

        let (_, consumer_secret) = self.credentials.consumer_pair();
        let token_secret = self
            .credentials
            .token_pair()
            .map(|(_, secret)| secret)
            .unwrap_or("");
        let signing_key = format!(
            "{}&{}",
            percent_encode(consumer_secret),
            percent_encode(token_secret)
        );

        let mut mac =
            HmacSha1::new_from_slice(signing_key.as_bytes()).expect("HMAC accepts any key length");
        mac.update(base_string.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    /// Builds a complete `Authorization` header value for a request against
    /// `url`, generating a fresh nonce and timestamp.
    ///
    /// The signature covers the full parameter set (protocol parameters
    /// merged with `extra_parameters`), while the header itself carries only
    /// the `oauth_*`-prefixed ones plus `oauth_signature`. Non-protocol
    /// extras therefore participate in the signature but stay in the query
    /// string or body where the caller put them.
    pub fn generate_oauth_header(
        &self,
        method: &Method,
        url: &Url,
        extra_parameters: &[(Cow<'_, str>, Cow<'_, str>)],
    ) -> String {
        let (consumer_key, _) = self.credentials.consumer_pair();
        let nonce = generate_nonce();
        let timestamp = unix_timestamp().to_string();

        let mut parameters: Vec<(Cow<'_, str>, Cow<'_, str>)> = vec![
            (Cow::from(OAUTH_CONSUMER_KEY), Cow::from(consumer_key)),
            (Cow::from(OAUTH_NONCE_KEY), Cow::from(nonce.as_str())),
            (
                Cow::from(OAUTH_SIGNATURE_METHOD_KEY),
                Cow::from(SIGNATURE_METHOD),
            ),
            (Cow::from(OAUTH_TIMESTAMP_KEY), Cow::from(timestamp.as_str())),
            (Cow::from(OAUTH_VERSION_KEY), Cow::from(OAUTH_VERSION)),
        ];
        if let Some((token, _)) = self.credentials.token_pair() {
            parameters.push((Cow::from(OAUTH_TOKEN_KEY), Cow::from(token)));
        }
        for (key, value) in extra_parameters {
            parameters.push((Cow::from(key.as_ref()), Cow::from(value.as_ref())));
        }

        let signature = self.generate_signature(method, url, &parameters);

        let mut header_parameters: Vec<(Cow<'_, str>, Cow<'_, str>)> = parameters
            .into_iter()
            .filter(|(key, _)| key.starts_with(OAUTH_KEY_PREFIX))
            .collect();
        header_parameters.push((Cow::from(OAUTH_SIGNATURE_KEY), Cow::from(signature)));
        header_parameters.sort();

        let fields = header_parameters
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", key, percent_encode(value)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {}", fields)
    }
}
