use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Request for {url} failed: {reason}")]
    FetchError { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ScanError {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        ScanError::FetchError {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
