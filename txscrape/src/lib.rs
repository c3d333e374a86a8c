// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{ScrapeArgs, build_page_source, read_date, read_date_range};

// Re-export scrape functionality from txscrape-core
pub use txscrape_core::scrape::{ScrapeOptions, ScrapeProgressCallback, execute_scrape};
