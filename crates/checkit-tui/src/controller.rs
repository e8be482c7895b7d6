//! State and behaviour of the checklist panel, independent of the terminal.
//!
//! The controller is the single owner of everything the panel shows. Loads run
//! on a spawned task and report back through the channel returned by
//! [`PanelController::new`]; the event loop feeds results in with
//! [`PanelController::apply_load`].

use crate::components::Banner;
use crate::forms::{ExportForm, OptionsForm};
use checkit_core::{AppConfig, CheckitError, CheckitResult, TextField};
use checkit_domain::{
    order_key, ChecklistExporter, CustomOrder, PanelView, TabModel, TabSelection,
};
use checkit_persistence::{load_or_default, ConfigKey, ConfigStore, PersistedConfig};
use checkit_sheets::SheetLoader;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

pub type LoadResult = CheckitResult<TabModel>;

const BANNER_TTL: Duration = Duration::from_secs(4);
const LOAD_FAILED: &str = "Failed to load data. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    /// Nothing fetched yet.
    Idle,
    NotConfigured,
    Loading,
    Ready(PanelView),
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    Search,
    Export(ExportForm),
    Options(OptionsForm),
    Help,
}

/// A line of the active tab: a category header or one of its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Category(usize),
    Item(usize, usize),
}

pub struct PanelController {
    store: Arc<dyn ConfigStore>,
    loader: SheetLoader,
    settings: AppConfig,
    load_tx: mpsc::UnboundedSender<LoadResult>,
    in_flight: bool,
    custom_order: CustomOrder,
    user_name: Option<String>,
    expanded: HashSet<String>,
    search_deadline: Option<Instant>,
    pub state: PanelState,
    pub mode: Mode,
    pub search: TextField,
    pub cursor: usize,
    pub banner: Option<Banner>,
}

impl PanelController {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        loader: SheetLoader,
        settings: AppConfig,
    ) -> (Self, mpsc::UnboundedReceiver<LoadResult>) {
        let (load_tx, load_rx) = mpsc::unbounded_channel();
        let controller = Self {
            store,
            loader,
            settings,
            load_tx,
            in_flight: false,
            custom_order: CustomOrder::new(),
            user_name: None,
            expanded: HashSet::new(),
            search_deadline: None,
            state: PanelState::Idle,
            mode: Mode::Normal,
            search: TextField::new(),
            cursor: 0,
            banner: None,
        };
        (controller, load_rx)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn refresh_enabled(&self) -> bool {
        !self.in_flight
    }

    pub fn view(&self) -> Option<&PanelView> {
        match &self.state {
            PanelState::Ready(view) => Some(view),
            _ => None,
        }
    }

    fn view_mut(&mut self) -> Option<&mut PanelView> {
        match &mut self.state {
            PanelState::Ready(view) => Some(view),
            _ => None,
        }
    }

    /// Starts a load unless one is already running. Returns whether a fetch
    /// was issued.
    pub async fn request_refresh(&mut self) -> bool {
        if self.in_flight {
            tracing::debug!("Refresh ignored, a load is already in flight");
            return false;
        }
        self.in_flight = true;
        self.search.clear();
        self.search_deadline = None;

        let config = load_or_default(self.store.as_ref(), &ConfigKey::ALL).await;
        self.user_name = config.user_name().map(str::to_string);
        self.custom_order = config.custom_order();

        let Some(deployment_id) = config.deployment_id().map(str::to_string) else {
            tracing::warn!("No deployment id configured, skipping load");
            self.state = PanelState::NotConfigured;
            self.in_flight = false;
            return false;
        };

        self.state = PanelState::Loading;
        let selection = TabSelection::from_selected_title(config.selected_title);
        let loader = self.loader.clone();
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let result = loader.load(&deployment_id, &selection).await;
            if tx.send(result).is_err() {
                tracing::debug!("Panel closed before the load finished");
            }
        });
        true
    }

    /// Finishes a load. Refresh is re-enabled on every outcome.
    pub fn apply_load(&mut self, result: LoadResult) {
        self.in_flight = false;
        match result {
            Ok(model) => {
                let today = chrono::Local::now().date_naive();
                self.state = PanelState::Ready(PanelView::render(&model, &self.custom_order, today));
                self.cursor = 0;
            }
            Err(e) => {
                tracing::error!("Error reading sheet: {}", e);
                let message = if e.is_load_failure() {
                    LOAD_FAILED.to_string()
                } else {
                    e.to_string()
                };
                self.state = PanelState::Failed(message);
            }
        }
    }

    /// Records a search edit; the filter runs once the debounce elapses.
    pub fn search_changed(&mut self, now: Instant) {
        self.search_deadline = Some(now + self.settings.search_debounce());
    }

    pub fn tick(&mut self, now: Instant) {
        if self.search_deadline.is_some_and(|deadline| now >= deadline) {
            self.apply_search();
        }
        if self
            .banner
            .as_ref()
            .is_some_and(|banner| banner.is_expired(now, BANNER_TTL))
        {
            self.banner = None;
        }
    }

    pub fn apply_search(&mut self) {
        self.search_deadline = None;
        let query = self.search.value();
        if let Some(view) = self.view_mut() {
            view.apply_filter(&query);
        }
        self.clamp_cursor();
    }

    pub fn search_pending(&self) -> bool {
        self.search_deadline.is_some()
    }

    /// Whether a category's items are shown. An active search opens every
    /// category.
    pub fn is_open(&self, tab: &str, category: &str) -> bool {
        let searching = self.view().is_some_and(|view| !view.query().is_empty());
        searching || self.expanded.contains(&order_key(tab, category))
    }

    /// Rows of the active tab as drawn: visible categories, and the visible
    /// items of open ones.
    pub fn rows(&self) -> Vec<Row> {
        let Some(view) = self.view() else {
            return Vec::new();
        };
        let Some(tab) = view.active_tab() else {
            return Vec::new();
        };
        let mut rows = Vec::new();
        for (ci, category) in tab.categories.iter().enumerate() {
            if !category.visible {
                continue;
            }
            rows.push(Row::Category(ci));
            if self.is_open(&tab.title, &category.name) {
                rows.extend(category.visible_items().map(|(ii, _)| Row::Item(ci, ii)));
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<Row> {
        self.rows().get(self.cursor).copied()
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn cursor_down(&mut self) {
        let len = self.rows().len();
        if len > 0 {
            self.cursor = (self.cursor + 1).min(len - 1);
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn next_tab(&mut self) {
        if self.view_mut().is_some_and(|view| view.next_tab()) {
            self.cursor = 0;
        }
    }

    pub fn prev_tab(&mut self) {
        if self.view_mut().is_some_and(|view| view.prev_tab()) {
            self.cursor = 0;
        }
    }

    /// Expands/collapses a category header or flips an item's checkbox.
    pub fn activate(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        match row {
            Row::Category(ci) => {
                let Some(tab) = self.view().and_then(PanelView::active_tab) else {
                    return;
                };
                let key = order_key(&tab.title, &tab.categories[ci].name);
                if !self.expanded.remove(&key) {
                    self.expanded.insert(key);
                }
            }
            Row::Item(ci, ii) => {
                if let Some(view) = self.view_mut() {
                    if let Some(tab_index) = view.active_index() {
                        view.toggle(tab_index, ci, ii);
                    }
                }
            }
        }
    }

    /// Moves the selected item up (negative) or down and persists the
    /// category's new order.
    pub async fn move_selected(&mut self, direction: isize) -> CheckitResult<()> {
        let Some(Row::Item(ci, ii)) = self.selected_row() else {
            return Ok(());
        };
        let Some(view) = self.view_mut() else {
            return Ok(());
        };
        let Some(tab_index) = view.active_index() else {
            return Ok(());
        };
        let Some(new_index) = view.move_item(tab_index, ci, ii, direction) else {
            return Ok(());
        };
        let Some((tab, category, ids)) = view.category_order(tab_index, ci) else {
            return Ok(());
        };

        if let Some(position) = self.rows().iter().position(|row| *row == Row::Item(ci, new_index)) {
            self.cursor = position;
        }

        let mut persisted = load_or_default(self.store.as_ref(), &[ConfigKey::CustomOrder])
            .await
            .custom_order();
        persisted.record(&tab, &category, ids.clone());
        self.custom_order.record(&tab, &category, ids);

        let result = self
            .store
            .set(PersistedConfig {
                custom_order: Some(persisted),
                ..Default::default()
            })
            .await;
        if let Err(e) = &result {
            tracing::error!("Could not save order for {}: {}", order_key(&tab, &category), e);
            self.banner = Some(Banner::error("Could not save the new order."));
        }
        result
    }

    pub fn open_export(&mut self) {
        if self.view().and_then(PanelView::active_tab).is_none() {
            self.banner = Some(Banner::error("Nothing to export yet."));
            return;
        }
        self.mode = Mode::Export(ExportForm::new(self.user_name.as_deref()));
    }

    /// Validates the export form and writes the CSV. On a validation error
    /// the form stays open and nothing is written.
    pub fn submit_export(&mut self) -> CheckitResult<PathBuf> {
        let Mode::Export(form) = &self.mode else {
            return Err(CheckitError::Internal("export form is not open".to_string()));
        };
        let outcome = form.metadata().and_then(|metadata| {
            let entries = self
                .view()
                .map(PanelView::export_entries)
                .unwrap_or_default();
            let export = ChecklistExporter::export(&entries, &metadata)?;
            ChecklistExporter::write_to_dir(&export, &self.settings.effective_export_dir())
        });

        match &outcome {
            Ok(path) => {
                self.mode = Mode::Normal;
                self.banner = Some(Banner::success(format!("Saved {}", path.display())));
            }
            Err(CheckitError::Validation(message)) => {
                self.banner = Some(Banner::error(message.clone()));
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.banner = Some(Banner::error(format!("Export failed: {e}")));
            }
        }
        outcome
    }

    pub async fn open_options(&mut self) {
        let config =
            load_or_default(self.store.as_ref(), &[ConfigKey::DeploymentId, ConfigKey::UserName]).await;
        self.mode = Mode::Options(OptionsForm::new(
            config.deployment_id.as_deref(),
            config.user_name.as_deref(),
        ));
    }

    /// Saves the options form and reloads the checklist.
    pub async fn save_options(&mut self) -> CheckitResult<()> {
        let Mode::Options(form) = &self.mode else {
            return Ok(());
        };
        if form.deployment_id.is_blank() {
            self.banner = Some(Banner::error("Please enter a valid Deployment ID."));
            return Err(CheckitError::Validation(
                "Please enter a valid Deployment ID.".to_string(),
            ));
        }

        let deployment_id = form.deployment_id.value().trim().to_string();
        let user_name = form.user_name.value().trim().to_string();
        let saved = self
            .store
            .set(PersistedConfig {
                deployment_id: Some(deployment_id),
                user_name: Some(user_name),
                ..Default::default()
            })
            .await;
        if let Err(e) = saved {
            tracing::error!("Could not save options: {}", e);
            self.banner = Some(Banner::error("Could not save settings."));
            return Err(e);
        }

        self.mode = Mode::Normal;
        self.banner = Some(Banner::success("Deployment ID saved successfully!"));
        self.request_refresh().await;
        Ok(())
    }
}
