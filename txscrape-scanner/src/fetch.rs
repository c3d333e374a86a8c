use crate::error::{Result, ScanError};
use crate::snapshot::HtmlSnapshot;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Fetch a server-rendered page and parse it as a snapshot.
pub async fn fetch_snapshot(url: &Url, timeout_secs: u64) -> Result<HtmlSnapshot> {
    let client = Client::builder()
        .user_agent("txscrape/0.1 (https://github.com/trapdoorsec/txscrape)")
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;

    info!("Fetching {}", url);
    let response = client.get(url.as_str()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScanError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(HtmlSnapshot::parse(&body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{Element, Page, Query};
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_fetch_snapshot_parses_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/address/0xabc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_bytes(b"<html><body><h3>Portfolio</h3></body></html>"),
            )
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/address/0xabc", mock_server.uri())).unwrap();
        let page = fetch_snapshot(&url, 5).await.unwrap();

        let heading = page
            .wait_for(Query::Css("h3"), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(heading.text().await.unwrap(), "Portfolio");
    }

    #[tokio::test]
    async fn test_fetch_snapshot_rejects_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/missing", mock_server.uri())).unwrap();
        let err = fetch_snapshot(&url, 5).await.err().unwrap();

        assert!(matches!(err, ScanError::HttpStatus { status: 404, .. }));
    }
}
