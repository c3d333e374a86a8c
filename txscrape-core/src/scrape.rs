use crate::config::PageSource;
use crate::dates::DateRange;
use crate::error::{Result, ScrapeError};
use crate::output::{to_pretty_json, write_documents};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use txscrape_scanner::fetch::fetch_snapshot;
use txscrape_scanner::{
    HtmlSnapshot, Page, ScrapeOutput, Selectors, WaitBounds, WebDriverSession, extract_metadata,
    extract_table,
};

/// Vertical offset scrolled to before reading, so lazy sections render.
pub const SCROLL_OFFSET: i64 = 1000;

/// Options for configuring a scrape operation
pub struct ScrapeOptions {
    pub source: PageSource,
    pub range: DateRange,
    pub output_path: PathBuf,
    pub metadata_output: Option<PathBuf>,
    pub selectors: Selectors,
    pub waits: WaitBounds,
}

/// Callback for reporting scrape progress
pub type ScrapeProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

fn report(progress: &Option<ScrapeProgressCallback>, message: &str) {
    if let Some(callback) = progress {
        callback(message.to_string());
    }
}

/// Scroll, then read the metadata panel followed by the table.
pub async fn scrape_page<P: Page>(
    page: &P,
    selectors: &Selectors,
    waits: &WaitBounds,
    progress: &Option<ScrapeProgressCallback>,
) -> Result<ScrapeOutput> {
    page.scroll_to(SCROLL_OFFSET).await?;

    report(progress, "Reading metadata panel...");
    let metadata = extract_metadata(page, selectors, waits).await?;

    report(progress, "Reading transaction table...");
    let table = extract_table(page, selectors, waits).await?;

    Ok(ScrapeOutput { metadata, table })
}

/// Load the page from `source` and scrape it.
///
/// A browser session is closed whether or not the scrape succeeded.
pub async fn scrape_source(
    source: &PageSource,
    selectors: &Selectors,
    waits: &WaitBounds,
    progress: &Option<ScrapeProgressCallback>,
) -> Result<ScrapeOutput> {
    match source {
        PageSource::WebDriver { server, target } => {
            report(progress, &format!("Opening {} in the browser...", target));
            let session = WebDriverSession::open(server, target).await?;
            let outcome = scrape_page(session.page(), selectors, waits, progress).await;
            if let Err(e) = session.close().await {
                warn!("Failed to close WebDriver session: {}", e);
            }
            outcome
        }
        PageSource::Http {
            target,
            timeout_secs,
        } => {
            report(progress, &format!("Fetching {}...", target));
            let page = fetch_snapshot(target, *timeout_secs).await?;
            scrape_page(&page, selectors, waits, progress).await
        }
        PageSource::File(path) => {
            report(progress, &format!("Loading {}...", path.display()));
            let page = HtmlSnapshot::from_file(path)?;
            scrape_page(&page, selectors, waits, progress).await
        }
    }
}

fn output_error(path: &Path, source: std::io::Error) -> ScrapeError {
    ScrapeError::Output {
        path: path.display().to_string(),
        source,
    }
}

fn render<T: serde::Serialize>(path: &Path, value: &T) -> Result<Vec<u8>> {
    to_pretty_json(value).map_err(|e| output_error(path, std::io::Error::other(e)))
}

/// Execute a scrape with the given options.
/// Output files are only written once the whole page has been read.
pub async fn execute_scrape(
    options: ScrapeOptions,
    progress_callback: Option<ScrapeProgressCallback>,
) -> Result<ScrapeOutput> {
    let ScrapeOptions {
        source,
        range,
        output_path,
        metadata_output,
        selectors,
        waits,
    } = options;

    // The range is reported but does not restrict which rows are kept
    info!("Requested range {} .. {}", range.from, range.to);

    let output = scrape_source(&source, &selectors, &waits, &progress_callback).await?;

    report(
        &progress_callback,
        &format!("Writing {} rows to {}...", output.table.len(), output_path.display()),
    );
    // Both documents are staged before either replaces an existing file
    let mut documents = vec![(output_path.as_path(), render(&output_path, &output.table)?)];
    if let Some(ref path) = metadata_output {
        documents.push((path.as_path(), render(path, &output.metadata)?));
    }
    write_documents(&documents).map_err(|(path, source)| output_error(&path, source))?;

    Ok(output)
}
