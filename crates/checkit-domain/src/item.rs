use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

const ITEM_ID_LEN: usize = 16;

/// Column positions in a sheet row.
const COL_DATE: usize = 0;
const COL_CATEGORY: usize = 1;
const COL_CONTENT: usize = 2;
const COL_KEYWORDS: usize = 3;
const COL_STATUS: usize = 4;

/// Identifier of a checklist item, derived from its content, date and status.
///
/// Two items with the same triple share an id. Editing any of the three
/// fields produces a new id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn derive(content: &str, date: Option<&str>, status: Option<&str>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hasher.update([0x1f]);
        hasher.update(date.unwrap_or("").as_bytes());
        hasher.update([0x1f]);
        hasher.update(status.unwrap_or("").as_bytes());
        let hex = format!("{:x}", hasher.finalize());
        Self(hex[..ITEM_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ItemId,
    pub date: Option<String>,
    pub category: String,
    pub content: String,
    pub keywords: Vec<String>,
    pub status: Option<String>,
}

impl ChecklistItem {
    /// Builds an item from one sheet row. Rows without a category or content
    /// are dropped.
    pub fn from_row(cells: &[Option<String>]) -> Option<Self> {
        let category = cell(cells, COL_CATEGORY)?;
        let content = cell(cells, COL_CONTENT)?;
        let date = cell(cells, COL_DATE);
        let status = cell(cells, COL_STATUS);
        let keywords = cell(cells, COL_KEYWORDS)
            .map(|raw| split_keywords(&raw))
            .unwrap_or_default();

        Some(Self {
            id: ItemId::derive(&content, date.as_deref(), status.as_deref()),
            date,
            category,
            content,
            keywords,
            status,
        })
    }

    /// Keywords as they are matched by search: `", "`-joined.
    pub fn keyword_attr(&self) -> String {
        self.keywords.join(", ")
    }

    pub fn lines(&self) -> Vec<String> {
        self.content
            .split('\n')
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect()
    }

    /// An item is new when its date falls in the same calendar month as `today`.
    pub fn is_new(&self, today: NaiveDate) -> bool {
        self.date
            .as_deref()
            .and_then(parse_sheet_date)
            .is_some_and(|date| date.year() == today.year() && date.month() == today.month())
    }
}

fn cell(cells: &[Option<String>], index: usize) -> Option<String> {
    cells
        .get(index)?
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Splits a keyword cell on commas. Segments are trimmed and kept in order,
/// empty ones included.
fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',').map(|k| k.trim().to_string()).collect()
}

/// Parses the date formats a spreadsheet endpoint emits.
///
/// Timestamps are converted to local time before the date is taken, so a
/// midnight cell serialized as UTC lands on the day the sheet shows.
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Local).date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }
    ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}
