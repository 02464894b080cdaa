use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CredentialsError, CredentialsResult};

/// OAuth consumer credentials plus the token pair acquired through the
/// three-legged handshake.
///
/// The consumer key and secret are validated at construction and never change
/// afterwards. The token pair is absent until the handshake stores one, and is
/// overwritten when the access-token stage replaces the temporary pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
    token: Option<(String, String)>,
}

impl Credentials {
    /// Creates credentials without a token pair (pre-handshake state).
    ///
    /// # Errors
    ///
    /// Fails when the consumer key or the consumer secret is empty.
    pub fn new<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> CredentialsResult<Self>
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        let consumer_key = consumer_key.into();
        let consumer_secret = consumer_secret.into();
        if consumer_key.is_empty() {
            return Err(CredentialsError::EmptyConsumerKey);
        }
        if consumer_secret.is_empty() {
            return Err(CredentialsError::EmptyConsumerSecret);
        }
        Ok(Credentials {
            consumer_key,
            consumer_secret,
            token: None,
        })
    }

    /// Attaches a previously obtained token pair.
    pub fn with_token<TKey, TSecret>(mut self, token: TKey, token_secret: TSecret) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        self.set_token(token, token_secret);
        self
    }

    /// Overwrites the token pair in place. This is the only mutation path;
    /// the handshake calls it after each successful exchange stage.
    pub fn set_token<TKey, TSecret>(&mut self, token: TKey, token_secret: TSecret)
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        self.token = Some((token.into(), token_secret.into()));
    }

    pub fn consumer_pair(&self) -> (&str, &str) {
        (&self.consumer_key, &self.consumer_secret)
    }

    pub fn token_pair(&self) -> Option<(&str, &str)> {
        self.token
            .as_ref()
            .map(|(token, secret)| (token.as_str(), secret.as_str()))
    }
}

/// Credential store shared between the handshake and concurrent signers.
///
/// Token updates swap both fields under a single write lock, so a signer
/// reading concurrently never observes a token from one stage paired with a
/// secret from another.
#[derive(Debug, Clone)]
pub struct SharedCredentials(Arc<RwLock<Credentials>>);

impl SharedCredentials {
    pub fn new(credentials: Credentials) -> Self {
        SharedCredentials(Arc::new(RwLock::new(credentials)))
    }

    /// Clones the current credential state out of the lock.
    pub fn snapshot(&self) -> Credentials {
        self.0.read().clone()
    }

    pub(crate) fn store_token(&self, token: &str, token_secret: &str) {
        self.0.write().set_token(token, token_secret);
    }
}

impl From<Credentials> for SharedCredentials {
    fn from(credentials: Credentials) -> Self {
        SharedCredentials::new(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_non_empty_consumer_pair() {
        let credentials = Credentials::new("ck", "cs").unwrap();
        assert_eq!(credentials.consumer_pair(), ("ck", "cs"));
        assert_eq!(credentials.token_pair(), None);
    }

    #[test]
    fn new_rejects_empty_consumer_key() {
        let result = Credentials::new("", "cs");
        assert!(matches!(result, Err(CredentialsError::EmptyConsumerKey)));
    }

    #[test]
    fn new_rejects_empty_consumer_secret() {
        let result = Credentials::new("ck", "");
        assert!(matches!(result, Err(CredentialsError::EmptyConsumerSecret)));
    }

    #[test]
    fn with_token_populates_token_pair() {
        let credentials = Credentials::new("ck", "cs").unwrap().with_token("t", "ts");
        assert_eq!(credentials.token_pair(), Some(("t", "ts")));
    }

    #[test]
    fn set_token_overwrites_previous_pair() {
        let mut credentials = Credentials::new("ck", "cs").unwrap().with_token("temp", "temps");
        credentials.set_token("perm", "perms");
        assert_eq!(credentials.token_pair(), Some(("perm", "perms")));
    }

    #[test]
    fn shared_store_token_visible_through_snapshot() {
        let shared = SharedCredentials::new(Credentials::new("ck", "cs").unwrap());
        shared.store_token("t", "ts");
        assert_eq!(shared.snapshot().token_pair(), Some(("t", "ts")));
    }
}
