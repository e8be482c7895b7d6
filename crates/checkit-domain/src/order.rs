//! User-defined item order, persisted per tab and category.

use crate::item::{ChecklistItem, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key under which a category's order is stored.
pub fn order_key(tab: &str, category: &str) -> String {
    format!("{tab}-{category}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomOrder(BTreeMap<String, Vec<ItemId>>);

impl CustomOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tab: &str, category: &str) -> Option<&[ItemId]> {
        self.0.get(&order_key(tab, category)).map(Vec::as_slice)
    }

    /// Replaces the stored order of one category.
    pub fn record(&mut self, tab: &str, category: &str, ids: Vec<ItemId>) {
        self.0.insert(order_key(tab, category), ids);
    }

    pub fn clear(&mut self, tab: &str, category: &str) -> bool {
        self.0.remove(&order_key(tab, category)).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Orders a category's items.
    ///
    /// With a non-empty saved order, the result is exactly the saved ids that
    /// still match an item: unknown ids are skipped and items missing from
    /// the saved order are left out. Without one, source order is kept.
    pub fn resolve<'a>(
        &self,
        tab: &str,
        category: &str,
        items: &'a [ChecklistItem],
    ) -> Vec<&'a ChecklistItem> {
        let saved = match self.get(tab, category) {
            Some(saved) if !saved.is_empty() => saved,
            _ => return items.iter().collect(),
        };

        let mut taken = vec![false; items.len()];
        let mut ordered = Vec::with_capacity(saved.len());
        for id in saved {
            let slot = items
                .iter()
                .enumerate()
                .position(|(index, item)| !taken[index] && &item.id == id);
            match slot {
                Some(index) => {
                    taken[index] = true;
                    ordered.push(&items[index]);
                }
                None => tracing::debug!("Skipping orphaned order entry {} in {}", id, order_key(tab, category)),
            }
        }
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(content: &str) -> ChecklistItem {
        ChecklistItem::from_row(&[None, Some("Cat".into()), Some(content.into())]).unwrap()
    }

    fn contents(items: &[&ChecklistItem]) -> Vec<String> {
        items.iter().map(|i| i.content.clone()).collect()
    }

    #[test]
    fn test_no_saved_order_keeps_source_order() {
        let items = vec![item("a"), item("b"), item("c")];
        let order = CustomOrder::new();
        assert_eq!(contents(&order.resolve("T", "Cat", &items)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_saved_order_keeps_source_order() {
        let items = vec![item("a"), item("b")];
        let mut order = CustomOrder::new();
        order.record("T", "Cat", vec![]);
        assert_eq!(contents(&order.resolve("T", "Cat", &items)), vec!["a", "b"]);
    }

    #[test]
    fn test_saved_order_omits_unlisted_items() {
        let items = vec![item("a"), item("b"), item("c")];
        let mut order = CustomOrder::new();
        order.record("T", "Cat", vec![items[1].id.clone(), items[0].id.clone()]);
        assert_eq!(contents(&order.resolve("T", "Cat", &items)), vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let items = vec![item("a"), item("b")];
        let mut order = CustomOrder::new();
        order.record(
            "T",
            "Cat",
            vec![ItemId::from("deadbeefdeadbeef"), items[1].id.clone()],
        );
        assert_eq!(contents(&order.resolve("T", "Cat", &items)), vec!["b"]);
    }

    #[test]
    fn test_colliding_ids_map_to_distinct_items() {
        let items = vec![item("same"), item("same")];
        let mut order = CustomOrder::new();
        order.record("T", "Cat", vec![items[0].id.clone(), items[0].id.clone()]);
        let resolved = order.resolve("T", "Cat", &items);
        assert_eq!(resolved.len(), 2);
        assert!(std::ptr::eq(resolved[0], &items[0]));
        assert!(std::ptr::eq(resolved[1], &items[1]));
    }

    #[test]
    fn test_orders_are_scoped_by_tab_and_category() {
        let items = vec![item("a"), item("b")];
        let mut order = CustomOrder::new();
        order.record("T", "Other", vec![items[1].id.clone()]);
        order.record("U", "Cat", vec![items[1].id.clone()]);
        assert_eq!(contents(&order.resolve("T", "Cat", &items)), vec!["a", "b"]);
    }

    #[test]
    fn test_serializes_as_plain_mapping() {
        let mut order = CustomOrder::new();
        order.record("Main", "Access", vec![ItemId::from("abc")]);
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json, serde_json::json!({ "Main-Access": ["abc"] }));

        assert!(order.clear("Main", "Access"));
        assert!(order.is_empty());
    }
}
