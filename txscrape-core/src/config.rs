// Configuration: environment, .env file, selector overrides and paths

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use txscrape_scanner::Selectors;
use url::Url;

/// Environment variable holding the explorer page to scrape.
pub const URL_ENV_VAR: &str = "url";
pub const WEBDRIVER_ENV_VAR: &str = "WEBDRIVER_URL";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_OUTPUT_PATH: &str = "response.json";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No target URL: pass --url or set the '{0}' environment variable")]
    MissingUrl(&'static str),

    #[error("Invalid URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Failed to read selectors file {path}: {source}")]
    SelectorsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid selectors file {path}: {source}")]
    SelectorsJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where the page comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PageSource {
    /// A live browser session driven through a WebDriver server
    WebDriver { server: Url, target: Url },
    /// A plain HTTP fetch, for pages rendered server-side
    Http { target: Url, timeout_secs: u64 },
    /// A page saved to disk
    File(PathBuf),
}

/// Load a `.env` file from the working directory if there is one.
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(_) => debug!("No .env file loaded"),
    }
}

fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Pick the explicit URL if given, otherwise the environment value.
pub fn choose_url(
    explicit: Option<&str>,
    from_env: Option<String>,
    env_var: &'static str,
) -> Result<Url> {
    match (explicit, from_env) {
        (Some(value), _) => parse_url(value),
        (None, Some(value)) => parse_url(&value),
        (None, None) => Err(ConfigError::MissingUrl(env_var)),
    }
}

/// The page to scrape, from `--url` or the `url` environment variable.
pub fn target_url(explicit: Option<&str>) -> Result<Url> {
    choose_url(explicit, env::var(URL_ENV_VAR).ok(), URL_ENV_VAR)
}

/// The WebDriver server, from `--webdriver`, `WEBDRIVER_URL` or the default.
pub fn webdriver_url(explicit: Option<&str>) -> Result<Url> {
    let from_env = env::var(WEBDRIVER_ENV_VAR)
        .ok()
        .or_else(|| Some(DEFAULT_WEBDRIVER_URL.to_string()));
    choose_url(explicit, from_env, WEBDRIVER_ENV_VAR)
}

/// Expand a leading `~` in a user supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Default selectors, with any fields from `path` overriding them.
pub fn load_selectors(path: Option<&Path>) -> Result<Selectors> {
    let Some(path) = path else {
        return Ok(Selectors::default());
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigError::SelectorsIo {
        path: path.display().to_string(),
        source,
    })?;
    let selectors =
        serde_json::from_str(&content).map_err(|source| ConfigError::SelectorsJson {
            path: path.display().to_string(),
            source,
        })?;
    debug!("Loaded selector overrides from {}", path.display());
    Ok(selectors)
}
