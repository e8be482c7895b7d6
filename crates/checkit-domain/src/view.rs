//! Presentation model of the checklist panel.
//!
//! The view holds everything a front end draws (tabs, collapsible category
//! sections, item text, badges, checkbox and visibility state) as plain data.
//! Sheet content is never interpolated into markup; front ends decide how to
//! draw each field.

use crate::export::ExportEntry;
use crate::item::{ChecklistItem, ItemId};
use crate::model::TabModel;
use crate::order::CustomOrder;
use crate::search::{CompositeSearcher, ItemSearcher};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Badge {
    /// Dated within the current calendar month.
    New,
    /// Any non-blank status. The raw value is kept for detail views.
    Status(String),
}

impl Badge {
    pub fn label(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Status(_) => "Top Errors",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub lines: Vec<String>,
    pub keywords: String,
    pub badges: Vec<Badge>,
    pub checked: bool,
    pub visible: bool,
}

impl ItemView {
    fn from_item(item: &ChecklistItem, today: NaiveDate) -> Self {
        let mut badges = Vec::new();
        if let Some(status) = &item.status {
            badges.push(Badge::Status(status.clone()));
        }
        if item.is_new(today) {
            badges.push(Badge::New);
        }
        Self {
            id: item.id.clone(),
            lines: item.lines(),
            keywords: item.keyword_attr(),
            badges,
            checked: false,
            visible: true,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Text as matched by search: lines run together with no separator.
    pub fn search_text(&self) -> String {
        self.lines.concat()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub name: String,
    pub items: Vec<ItemView>,
    pub visible: bool,
}

impl CategoryView {
    pub fn visible_items(&self) -> impl Iterator<Item = (usize, &ItemView)> {
        self.items.iter().enumerate().filter(|(_, item)| item.visible)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabView {
    pub title: String,
    pub categories: Vec<CategoryView>,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PanelView {
    pub tabs: Vec<TabView>,
    active: usize,
    query: String,
}

impl PanelView {
    pub fn render(model: &TabModel, order: &CustomOrder, today: NaiveDate) -> Self {
        let tabs = model
            .tabs
            .iter()
            .map(|tab| TabView {
                title: tab.title.clone(),
                categories: tab
                    .categories
                    .iter()
                    .map(|group| CategoryView {
                        name: group.name.clone(),
                        items: order
                            .resolve(&tab.title, &group.name, &group.items)
                            .into_iter()
                            .map(|item| ItemView::from_item(item, today))
                            .collect(),
                        visible: true,
                    })
                    .collect(),
                visible: true,
            })
            .collect();

        let mut view = Self {
            tabs,
            active: 0,
            query: String::new(),
        };
        view.apply_filter("");
        view
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Hides items that do not match, then hides empty categories and tabs.
    /// If the active tab ends up hidden, the first visible tab becomes active.
    pub fn apply_filter(&mut self, query: &str) {
        self.query = query.to_string();
        let searcher = CompositeSearcher::all(query);

        for tab in &mut self.tabs {
            for category in &mut tab.categories {
                for item in &mut category.items {
                    item.visible = searcher.matches(item);
                }
                category.visible = category.items.iter().any(|item| item.visible);
            }
            tab.visible = tab.categories.iter().any(|category| category.visible);
        }

        let active_hidden = self.tabs.get(self.active).is_some_and(|tab| !tab.visible);
        if active_hidden {
            if let Some(first) = self.tabs.iter().position(|tab| tab.visible) {
                self.active = first;
            }
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        (self.active < self.tabs.len()).then_some(self.active)
    }

    pub fn active_tab(&self) -> Option<&TabView> {
        self.tabs.get(self.active)
    }

    /// Activates a tab if it exists and is visible.
    pub fn select_tab(&mut self, index: usize) -> bool {
        match self.tabs.get(index) {
            Some(tab) if tab.visible => {
                self.active = index;
                true
            }
            _ => false,
        }
    }

    pub fn next_tab(&mut self) -> bool {
        self.step_tab(1)
    }

    pub fn prev_tab(&mut self) -> bool {
        self.step_tab(-1)
    }

    fn step_tab(&mut self, delta: isize) -> bool {
        let len = self.tabs.len() as isize;
        if len == 0 {
            return false;
        }
        let mut index = self.active as isize;
        for _ in 0..len {
            index = (index + delta).rem_euclid(len);
            if self.tabs[index as usize].visible {
                let changed = index as usize != self.active;
                self.active = index as usize;
                return changed;
            }
        }
        false
    }

    pub fn category(&self, tab: usize, category: usize) -> Option<&CategoryView> {
        self.tabs.get(tab)?.categories.get(category)
    }

    /// Flips a checkbox and returns the new state.
    pub fn toggle(&mut self, tab: usize, category: usize, item: usize) -> Option<bool> {
        let item = self
            .tabs
            .get_mut(tab)?
            .categories
            .get_mut(category)?
            .items
            .get_mut(item)?;
        item.checked = !item.checked;
        Some(item.checked)
    }

    /// Moves an item past its nearest visible neighbour in `direction`
    /// (negative is up). Returns the item's new index.
    pub fn move_item(
        &mut self,
        tab: usize,
        category: usize,
        item: usize,
        direction: isize,
    ) -> Option<usize> {
        let items = &mut self.tabs.get_mut(tab)?.categories.get_mut(category)?.items;
        if item >= items.len() || direction == 0 {
            return None;
        }
        let target = if direction < 0 {
            (0..item).rev().find(|&i| items[i].visible)?
        } else {
            (item + 1..items.len()).find(|&i| items[i].visible)?
        };
        let moved = items.remove(item);
        items.insert(target, moved);
        Some(target)
    }

    /// The category's current item order, as persisted by the reorder tracker.
    pub fn category_order(&self, tab: usize, category: usize) -> Option<(String, String, Vec<ItemId>)> {
        let tab_view = self.tabs.get(tab)?;
        let category_view = tab_view.categories.get(category)?;
        let ids = category_view.items.iter().map(|item| item.id.clone()).collect();
        Some((tab_view.title.clone(), category_view.name.clone(), ids))
    }

    /// Every rendered item of the active tab in view order, hidden ones included.
    pub fn export_entries(&self) -> Vec<ExportEntry> {
        self.active_tab()
            .map(|tab| {
                tab.categories
                    .iter()
                    .flat_map(|category| category.items.iter())
                    .map(|item| ExportEntry {
                        text: item.text(),
                        checked: item.checked,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
