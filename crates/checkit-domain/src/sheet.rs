//! Raw sheet payloads and their normalization into a [`TabModel`].
//!
//! The endpoint answers with a JSON object keyed by tab title; each value is
//! a matrix of cells whose first row is a header.

use crate::item::ChecklistItem;
use crate::model::{Tab, TabModel};
use checkit_core::{CheckitError, CheckitResult};
use serde_json::Value;

pub type Row = Vec<Option<String>>;

#[derive(Debug, Clone, PartialEq)]
pub struct RawTab {
    pub title: String,
    pub rows: Vec<Row>,
}

impl RawTab {
    /// Drops the header row and every row missing content or category.
    pub fn normalize(&self) -> Tab {
        let items = self
            .rows
            .iter()
            .skip(1)
            .filter_map(|cells| ChecklistItem::from_row(cells));
        Tab::from_items(self.title.clone(), items)
    }
}

/// Which tabs of the payload to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TabSelection {
    #[default]
    All,
    /// Legacy single-tab mode: only the named tab, which must exist.
    Only(String),
}

impl TabSelection {
    pub fn from_selected_title(title: Option<String>) -> Self {
        match title {
            Some(title) if !title.trim().is_empty() => Self::Only(title),
            _ => Self::All,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    tabs: Vec<RawTab>,
}

impl RawSheet {
    pub fn from_slice(bytes: &[u8]) -> CheckitResult<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| CheckitError::Format(format!("response is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> CheckitResult<Self> {
        let Value::Object(map) = value else {
            return Err(CheckitError::Format(
                "expected a JSON object keyed by tab title".to_string(),
            ));
        };

        let tabs = map
            .into_iter()
            .map(|(title, rows)| parse_rows(&title, rows).map(|rows| RawTab { title, rows }))
            .collect::<CheckitResult<Vec<_>>>()?;

        Ok(Self { tabs })
    }

    pub fn tabs(&self) -> &[RawTab] {
        &self.tabs
    }

    pub fn tab(&self, title: &str) -> Option<&RawTab> {
        self.tabs.iter().find(|tab| tab.title == title)
    }

    pub fn select(self, selection: &TabSelection) -> CheckitResult<Self> {
        match selection {
            TabSelection::All => Ok(self),
            TabSelection::Only(title) => {
                if self.tab(title).is_none() {
                    return Err(CheckitError::Format(format!("tab '{title}' not found")));
                }
                let tabs = self
                    .tabs
                    .into_iter()
                    .filter(|tab| &tab.title == title)
                    .take(1)
                    .collect();
                Ok(Self { tabs })
            }
        }
    }

    pub fn normalize(&self) -> TabModel {
        TabModel {
            tabs: self.tabs.iter().map(RawTab::normalize).collect(),
        }
    }
}

fn parse_rows(title: &str, value: Value) -> CheckitResult<Vec<Row>> {
    let Value::Array(rows) = value else {
        return Err(CheckitError::Format(format!(
            "tab '{title}' is not an array of rows"
        )));
    };
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| match row {
            Value::Array(cells) => cells
                .into_iter()
                .map(|cell| parse_cell(title, index, cell))
                .collect(),
            _ => Err(CheckitError::Format(format!(
                "row {index} of tab '{title}' is not an array"
            ))),
        })
        .collect()
}

fn parse_cell(title: &str, row: usize, cell: Value) -> CheckitResult<Option<String>> {
    match cell {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(CheckitError::Format(format!(
            "row {row} of tab '{title}' contains a nested value"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "Onboarding": [
                ["Date", "Category", "Content", "Keywords", "Status"],
                ["2025-06-01", "Access", "Create account", "login, sso", ""],
                ["", "Access", "", "orphan", ""],
                ["", "", "No category", "", ""],
                [null, "Hardware", "Ship laptop", null, "Top"]
            ],
            "Offboarding": [
                ["Date", "Category", "Content"],
                ["", "Access", "Revoke account"]
            ]
        })
    }

    #[test]
    fn test_tabs_keep_payload_order() {
        let sheet = RawSheet::from_value(sample()).unwrap();
        let titles: Vec<_> = sheet.tabs().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Onboarding", "Offboarding"]);
    }

    #[test]
    fn test_normalize_skips_header_and_incomplete_rows() {
        let model = RawSheet::from_value(sample()).unwrap().normalize();
        let onboarding = model.tab("Onboarding").unwrap();
        assert_eq!(onboarding.item_count(), 2);
        let contents: Vec<_> = onboarding
            .categories
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.content.as_str()))
            .collect();
        assert_eq!(contents, vec!["Create account", "Ship laptop"]);
        assert!(!contents.contains(&"Content"));
    }

    #[test]
    fn test_header_only_tab_is_empty() {
        let sheet = RawSheet::from_value(json!({ "Empty": [["Date", "Category", "Content"]] })).unwrap();
        let model = sheet.normalize();
        assert_eq!(model.tabs.len(), 1);
        assert!(model.tabs[0].categories.is_empty());
    }

    #[test]
    fn test_numbers_are_stringified() {
        let sheet = RawSheet::from_value(json!({ "T": [["h"], [2025, "Cat", 42]] })).unwrap();
        let model = sheet.normalize();
        let item = &model.tabs[0].categories[0].items[0];
        assert_eq!(item.content, "42");
        assert_eq!(item.date.as_deref(), Some("2025"));
    }

    #[test]
    fn test_invalid_payloads_are_format_errors() {
        assert!(matches!(
            RawSheet::from_slice(b"<html>"),
            Err(CheckitError::Format(_))
        ));
        assert!(matches!(
            RawSheet::from_value(json!([["a"]])),
            Err(CheckitError::Format(_))
        ));
        assert!(matches!(
            RawSheet::from_value(json!({ "T": "rows" })),
            Err(CheckitError::Format(_))
        ));
        assert!(matches!(
            RawSheet::from_value(json!({ "T": [["h"], "row"] })),
            Err(CheckitError::Format(_))
        ));
        assert!(matches!(
            RawSheet::from_value(json!({ "T": [["h"], [{"a": 1}]] })),
            Err(CheckitError::Format(_))
        ));
    }

    #[test]
    fn test_select_single_tab() {
        let sheet = RawSheet::from_value(sample()).unwrap();
        let only = sheet
            .clone()
            .select(&TabSelection::Only("Offboarding".into()))
            .unwrap();
        assert_eq!(only.tabs().len(), 1);
        assert!(only.tab("Offboarding").is_some());

        let missing = sheet.select(&TabSelection::Only("Payroll".into()));
        assert!(matches!(missing, Err(CheckitError::Format(_))));
    }

    #[test]
    fn test_selection_from_title() {
        assert_eq!(TabSelection::from_selected_title(None), TabSelection::All);
        assert_eq!(
            TabSelection::from_selected_title(Some("  ".into())),
            TabSelection::All
        );
        assert_eq!(
            TabSelection::from_selected_title(Some("Main".into())),
            TabSelection::Only("Main".into())
        );
    }
}
