use crate::config::ConfigError;
use thiserror::Error;
use txscrape_scanner::ScanError;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Extraction failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
