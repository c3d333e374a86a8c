pub mod error;
pub mod extractor;
pub mod fetch;
pub mod locator;
pub mod result;
pub mod snapshot;
pub mod webdriver;

pub use error::ScanError;
pub use extractor::{Selectors, WaitBounds, extract_metadata, extract_table};
pub use locator::{Element, Page, Query};
pub use result::{
    CellValue, MetadataMap, OrderedMap, ScrapeOutput, TableRecord, TableResult, Transfer,
};
pub use snapshot::HtmlSnapshot;
pub use webdriver::WebDriverSession;
