use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type CredentialsResult<T> = std::result::Result<T, CredentialsError>;
pub type HandshakeResult<T> = std::result::Result<T, HandshakeError>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid credentials : {0}")]
    Credentials(#[from] CredentialsError),
    #[error("token exchange failed : {0}")]
    Handshake(#[from] HandshakeError),
    #[error("token acquisition failed : {0}")]
    TokenReader(#[from] TokenReaderError),
    #[error("request failed : {0}")]
    Reqwest(#[from] reqwest::Error),
}

#[derive(Error, Debug, Clone)]
pub enum CredentialsError {
    #[error("consumer key must not be empty")]
    EmptyConsumerKey,
    #[error("consumer secret must not be empty")]
    EmptyConsumerSecret,
}

#[derive(Error, Debug, Clone)]
pub enum HandshakeError {
    #[error("no request token stored, call request_token first")]
    MissingRequestToken,
}

#[derive(Error, Debug, Clone)]
pub enum TokenReaderError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(String, String),
}
