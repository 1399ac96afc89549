use thiserror::Error;

pub type Result<T> = std::result::Result<T, SignerError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("The URL carries no 'signature' parameter.")]
    MissingSignature,
}

impl From<url::ParseError> for SignerError {
    fn from(err: url::ParseError) -> Self {
        SignerError::InvalidUrl(err.to_string())
    }
}
