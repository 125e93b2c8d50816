use thiserror::Error;

/// Why a model response could not be turned into a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("response was empty")]
    Empty,

    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("JSON object could not be decoded")]
    DecodingFailed,

    #[error("quote or context was empty")]
    MissingFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("could not read API key: {0}")]
    Credential(String),

    #[error("response contained no completion")]
    InvalidResponse,

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("API error: {0}")]
    RemoteError(String),

    #[error("request timed out")]
    TimedOut,

    #[error("network error: {0}")]
    Transport(String),

    #[error("response could not be decoded")]
    DecodingFailed,

    #[error("model output was not a valid quote: {0}")]
    InvalidQuoteFormat(#[from] ParseError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::TimedOut
        } else if err.is_decode() {
            ClientError::DecodingFailed
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("cache storage error: {0}")]
    Storage(#[source] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AppError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
