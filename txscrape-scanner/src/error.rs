use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Element not found: {query} (waited {waited:?})")]
    ElementNotFound { query: String, waited: Duration },

    #[error("Element matched by {query} has no '{attribute}' attribute")]
    MissingAttribute { query: String, attribute: String },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("WebDriver session could not be created: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScanError {
    pub fn not_found(query: impl ToString, waited: Duration) -> Self {
        ScanError::ElementNotFound {
            query: query.to_string(),
            waited,
        }
    }

    /// True for lookups that simply matched nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ScanError::ElementNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
