use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
/// Summary panel label -> displayed value, in page order.
pub type MetadataMap = OrderedMap<String>;

/// One record per table row, in document order.
pub type TableResult = Vec<TableRecord>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    pub payload: String,
    pub link: String,
}

/// The value extracted from a single cell. The shape depends on the column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    HashLink {
        inner_hash: String,
        inner_link: String,
    },
    Interaction {
        operation: Option<String>,
        others_hash: String,
        others_link: String,
    },
    Transfers(Vec<Transfer>),
    GasFee {
        source_fee: String,
        dollar_fee: String,
        source_dollar_course: String,
    },
    Text(String),
    /// Serialized as `null`; the key is still present in the record.
    Absent,
}

/// String-keyed map that keeps keys in first-insertion order.
///
/// Inserting an existing key replaces its value without moving it, so later
/// entries win while the page order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A table row keyed by header label, in header order.
pub type TableRecord = OrderedMap<CellValue>;

/// Everything one pass over the page produces.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutput {
    pub metadata: MetadataMap,
    pub table: TableResult,
}
