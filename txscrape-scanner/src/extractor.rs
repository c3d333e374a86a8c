// Metadata panel and transaction table extraction

use crate::error::{Result, ScanError};
use crate::locator::{Element, Page, Query};
use crate::result::{CellValue, MetadataMap, TableRecord, TableResult, Transfer};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Structural selectors for the explorer's page layout.
///
/// Every field can be overridden on its own from a JSON file; the rest keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub metadata_panel: String,
    /// Tag of the panel's direct children, one per label/value pair
    pub metadata_block: String,
    pub metadata_label: String,
    pub metadata_value: String,
    pub header_row: String,
    pub header_cell: String,
    pub data_row: String,
    pub data_cell: String,
    pub link: String,
    pub interaction_block: String,
    pub operation: String,
    pub gas_fee_source: String,
    pub gas_fee_dollar: String,
    pub text: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            metadata_panel: r#"div[class="css-1gozys9 e12g3vhd1"]"#.to_string(),
            metadata_block: "div".to_string(),
            metadata_label: "span".to_string(),
            metadata_value: "h3".to_string(),
            header_row: r#"tr[class="MuiTableRow-root MuiTableRow-head"]"#.to_string(),
            header_cell: "th".to_string(),
            data_row: r#"tr[class="MuiTableRow-root css-kr9zws e1a9tldx0"]"#.to_string(),
            data_cell: "td".to_string(),
            link: "a".to_string(),
            interaction_block: "div > div".to_string(),
            operation: "p".to_string(),
            gas_fee_source: r#"[class="MuiTypography-root MuiTypography-body2 MuiTypography-colorTextPrimary"]"#
                .to_string(),
            gas_fee_dollar: r#"[class="MuiTypography-root MuiTypography-caption MuiTypography-colorTextSecondary"]"#
                .to_string(),
            text: "p".to_string(),
        }
    }
}

/// How long required elements may take to appear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitBounds {
    pub metadata: Duration,
    pub table: Duration,
    pub link: Duration,
}

impl Default for WaitBounds {
    fn default() -> Self {
        Self {
            metadata: Duration::from_secs(5),
            table: Duration::from_secs(10),
            link: Duration::from_secs(10),
        }
    }
}

/// Extraction strategy selected by a column's header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    InteractedWith,
    Transfer,
    GasFee,
    Other,
}

impl Column {
    pub fn from_header(header: &str) -> Self {
        match header.trim().to_lowercase().as_str() {
            "date" => Column::Date,
            "interacted with" => Column::InteractedWith,
            "transfer" => Column::Transfer,
            "gas fee" => Column::GasFee,
            _ => Column::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub label: String,
    pub column: Column,
}

impl Header {
    pub fn new(label: String) -> Self {
        let column = Column::from_header(&label);
        Self { label, column }
    }
}

/// The identifier at the end of an explorer link, without any query string.
pub fn hash_from_link(link: &str) -> &str {
    let last = link.rsplit('/').next().unwrap_or(link);
    last.split('?').next().unwrap_or(last)
}

async fn required_attr<E: Element>(element: &E, query: Query<'_>, name: &str) -> Result<String> {
    element
        .attr(name)
        .await?
        .ok_or_else(|| ScanError::MissingAttribute {
            query: query.to_string(),
            attribute: name.to_string(),
        })
}

/// Read the summary panel into a label -> value map.
pub async fn extract_metadata<P: Page>(
    page: &P,
    selectors: &Selectors,
    waits: &WaitBounds,
) -> Result<MetadataMap> {
    let panel = page
        .wait_for(Query::Css(&selectors.metadata_panel), waits.metadata)
        .await?;

    let label_query = Query::Css(&selectors.metadata_label);
    let value_query = Query::Css(&selectors.metadata_value);

    let mut metadata = MetadataMap::new();
    for block in panel.find_all(Query::Children(&selectors.metadata_block)).await? {
        let label = block.find(label_query).await?.text().await?;
        let value = block.find(value_query).await?.text().await?;
        debug!("Metadata {} = {}", label, value);
        // Later blocks win on a repeated label
        metadata.insert(label, value);
    }

    info!("Extracted {} metadata entries", metadata.len());
    Ok(metadata)
}

/// Read every data row of the transaction table.
pub async fn extract_table<P: Page>(
    page: &P,
    selectors: &Selectors,
    waits: &WaitBounds,
) -> Result<TableResult> {
    let headers = extract_headers(page, selectors, waits).await?;
    debug!(
        "Table headers: {:?}",
        headers.iter().map(|h| h.label.as_str()).collect::<Vec<_>>()
    );

    let rows = page.find_all(Query::Css(&selectors.data_row)).await?;
    if rows.is_empty() {
        warn!("No data rows matched {}", selectors.data_row);
    }

    let mut table = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        table.push(extract_row(index, row, &headers, selectors, waits).await?);
    }

    info!("Extracted {} table rows", table.len());
    Ok(table)
}

pub async fn extract_headers<P: Page>(
    page: &P,
    selectors: &Selectors,
    waits: &WaitBounds,
) -> Result<Vec<Header>> {
    let header_row = page
        .wait_for(Query::Css(&selectors.header_row), waits.table)
        .await?;

    let mut headers = Vec::new();
    for cell in header_row.find_all(Query::Css(&selectors.header_cell)).await? {
        headers.push(Header::new(cell.text().await?));
    }
    Ok(headers)
}

async fn extract_row<E: Element>(
    index: usize,
    row: &E,
    headers: &[Header],
    selectors: &Selectors,
    waits: &WaitBounds,
) -> Result<TableRecord> {
    let cells = row.find_all(Query::Css(&selectors.data_cell)).await?;
    if cells.len() > headers.len() {
        warn!(
            "Row {} has {} cells but only {} headers, ignoring the extra cells",
            index,
            cells.len(),
            headers.len()
        );
    } else if cells.len() < headers.len() {
        warn!(
            "Row {} has {} cells for {} headers, missing columns are recorded as null",
            index,
            cells.len(),
            headers.len()
        );
    }

    let mut record = TableRecord::new();
    for (position, header) in headers.iter().enumerate() {
        let value = match cells.get(position) {
            Some(cell) => extract_cell(header.column, cell, selectors, waits).await?,
            None => CellValue::Absent,
        };
        record.insert(header.label.clone(), value);
    }
    Ok(record)
}

/// Apply the column's strategy to one cell.
pub async fn extract_cell<E: Element>(
    column: Column,
    cell: &E,
    selectors: &Selectors,
    waits: &WaitBounds,
) -> Result<CellValue> {
    match column {
        Column::Date => {
            let (inner_hash, inner_link) = hash_link(cell, selectors, waits).await?;
            Ok(CellValue::HashLink {
                inner_hash,
                inner_link,
            })
        }
        Column::InteractedWith => {
            let block = cell.find(Query::Css(&selectors.interaction_block)).await?;
            let operation = match block.find_optional(Query::Css(&selectors.operation)).await? {
                Some(element) => Some(element.text().await?),
                None => None,
            };
            let (others_hash, others_link) = hash_link(cell, selectors, waits).await?;
            Ok(CellValue::Interaction {
                operation,
                others_hash,
                others_link,
            })
        }
        Column::Transfer => {
            let link_query = Query::Css(&selectors.link);
            let mut transfers = Vec::new();
            for anchor in cell.find_all(link_query).await? {
                transfers.push(Transfer {
                    payload: anchor.text().await?,
                    link: anchor.attr("href").await?.unwrap_or_default(),
                });
            }
            Ok(CellValue::Transfers(transfers))
        }
        Column::GasFee => {
            let source_fee = cell
                .find(Query::Css(&selectors.gas_fee_source))
                .await?
                .text()
                .await?;
            let dollar_query = Query::Css(&selectors.gas_fee_dollar);
            let dollar = cell.find(dollar_query).await?;
            Ok(CellValue::GasFee {
                source_fee,
                dollar_fee: dollar.text().await?,
                source_dollar_course: required_attr(&dollar, dollar_query, "title").await?,
            })
        }
        Column::Other => match cell.find_optional(Query::Css(&selectors.text)).await? {
            Some(element) => Ok(CellValue::Text(element.text().await?.trim().to_string())),
            None => Ok(CellValue::Absent),
        },
    }
}

async fn hash_link<E: Element>(
    cell: &E,
    selectors: &Selectors,
    waits: &WaitBounds,
) -> Result<(String, String)> {
    let link_query = Query::Css(&selectors.link);
    let anchor = cell.wait_for(link_query, waits.link).await?;
    let link = required_attr(&anchor, link_query, "href").await?;
    Ok((hash_from_link(&link).to_string(), link))
}
