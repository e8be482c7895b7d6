use crate::item::ChecklistItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub name: String,
    pub items: Vec<ChecklistItem>,
}

/// One sheet tab. Categories keep the order in which they first appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub title: String,
    pub categories: Vec<CategoryGroup>,
}

impl Tab {
    pub fn from_items(title: impl Into<String>, items: impl IntoIterator<Item = ChecklistItem>) -> Self {
        let mut categories: Vec<CategoryGroup> = Vec::new();
        for item in items {
            match categories.iter_mut().find(|group| group.name == item.category) {
                Some(group) => group.items.push(item),
                None => categories.push(CategoryGroup {
                    name: item.category.clone(),
                    items: vec![item],
                }),
            }
        }
        Self {
            title: title.into(),
            categories,
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryGroup> {
        self.categories.iter().find(|group| group.name == name)
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|group| group.items.len()).sum()
    }
}

/// Normalized checklist, rebuilt from scratch on every fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabModel {
    pub tabs: Vec<Tab>,
}

impl TabModel {
    pub fn tab(&self, title: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.title == title)
    }

    pub fn item_count(&self) -> usize {
        self.tabs.iter().map(Tab::item_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(category: &str, content: &str) -> ChecklistItem {
        ChecklistItem::from_row(
            &[None, Some(category.to_string()), Some(content.to_string())],
        )
        .unwrap()
    }

    #[test]
    fn test_categories_keep_first_appearance_order() {
        let tab = Tab::from_items(
            "Main",
            vec![
                item("Zeta", "one"),
                item("Alpha", "two"),
                item("Zeta", "three"),
            ],
        );
        let names: Vec<_> = tab.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        let zeta: Vec<_> = tab.categories[0].items.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(zeta, vec!["one", "three"]);
        assert_eq!(tab.item_count(), 3);
    }

    #[test]
    fn test_lookup() {
        let model = TabModel {
            tabs: vec![Tab::from_items("Main", vec![item("Cat", "x")])],
        };
        assert!(model.tab("Main").unwrap().category("Cat").is_some());
        assert!(model.tab("Other").is_none());
        assert_eq!(model.item_count(), 1);
    }
}
