use async_trait::async_trait;
use checkit_core::{AppConfig, CheckitError, CheckitResult};
use checkit_persistence::{ConfigStore, JsonConfigStore, MemoryConfigStore, PersistedConfig};
use checkit_sheets::{SheetLoader, SheetSource};
use checkit_tui::{PanelController, PanelState, Row};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counts fetches and holds each one until the test releases it.
struct GatedSource {
    body: CheckitResult<Vec<u8>>,
    fetches: AtomicUsize,
    gate: Notify,
}

impl GatedSource {
    fn ok(body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            body: Ok(serde_json::to_vec(&body).unwrap()),
            fetches: AtomicUsize::new(0),
            gate: Notify::new(),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            body: Err(CheckitError::Network(format!("HTTP error! status: {status}"))),
            fetches: AtomicUsize::new(0),
            gate: Notify::new(),
        })
    }

    fn release(&self) {
        self.gate.notify_one();
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SheetSource for GatedSource {
    async fn fetch(&self, _deployment_id: &str) -> CheckitResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        match &self.body {
            Ok(body) => Ok(body.clone()),
            Err(e) => Err(CheckitError::Network(e.to_string())),
        }
    }
}

fn sheet() -> serde_json::Value {
    json!({
        "Onboarding": [
            ["Date", "Category", "Content", "Keywords", "Status"],
            ["", "Access", "Create account", "sso, idp", ""],
            ["", "Access", "Grant VPN", "network", "Required"],
            ["", "Hardware", "Ship laptop", "", ""]
        ],
        "Offboarding": [
            ["Date", "Category", "Content"],
            ["", "Access", "Revoke account"]
        ]
    })
}

fn configured() -> PersistedConfig {
    PersistedConfig {
        deployment_id: Some("dep-1".into()),
        user_name: Some("Alex".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_second_refresh_while_loading_is_dropped() {
    let source = GatedSource::ok(sheet());
    let store = Arc::new(MemoryConfigStore::with_config(configured()));
    let (mut controller, mut rx) =
        PanelController::new(store, SheetLoader::new(source.clone()), AppConfig::default());

    assert!(controller.request_refresh().await);
    assert!(!controller.refresh_enabled());
    assert!(!controller.request_refresh().await);
    assert_eq!(controller.state, PanelState::Loading);

    source.release();
    let result = rx.recv().await.unwrap();
    controller.apply_load(result);

    assert_eq!(source.fetches(), 1);
    assert!(controller.refresh_enabled());
    let view = controller.view().unwrap();
    assert_eq!(view.tabs.len(), 2);
    assert_eq!(view.tabs[0].title, "Onboarding");
}

#[tokio::test]
async fn test_reload_clears_search() {
    let source = GatedSource::ok(sheet());
    let store = Arc::new(MemoryConfigStore::with_config(configured()));
    let (mut controller, mut rx) =
        PanelController::new(store, SheetLoader::new(source.clone()), AppConfig::default());

    controller.request_refresh().await;
    source.release();
    controller.apply_load(rx.recv().await.unwrap());

    controller.search.set("laptop");
    controller.search_changed(std::time::Instant::now());
    controller.apply_search();
    assert_eq!(controller.view().unwrap().query(), "laptop");

    controller.search.set("vpn");
    controller.search_changed(std::time::Instant::now());
    assert!(controller.search_pending());

    assert!(controller.request_refresh().await);
    assert_eq!(controller.search.value(), "");
    assert!(!controller.search_pending());

    source.release();
    controller.apply_load(rx.recv().await.unwrap());

    let view = controller.view().unwrap();
    assert_eq!(view.query(), "");
    assert!(view.tabs.iter().all(|tab| tab.visible));
    assert!(view
        .tabs
        .iter()
        .flat_map(|tab| tab.categories.iter())
        .all(|category| category.visible && category.items.iter().all(|item| item.visible)));
}

#[tokio::test]
async fn test_server_error_shows_failure_and_reenables_refresh() {
    let source = GatedSource::failing(500);
    let store = Arc::new(MemoryConfigStore::with_config(configured()));
    let (mut controller, mut rx) =
        PanelController::new(store, SheetLoader::new(source.clone()), AppConfig::default());

    controller.request_refresh().await;
    source.release();
    controller.apply_load(rx.recv().await.unwrap());

    assert_eq!(
        controller.state,
        PanelState::Failed("Failed to load data. Please try again later.".into())
    );
    assert!(controller.refresh_enabled());
    assert!(controller.rows().is_empty());
}

#[tokio::test]
async fn test_missing_deployment_id_skips_fetch() {
    let source = GatedSource::ok(sheet());
    let store = Arc::new(MemoryConfigStore::new());
    let (mut controller, _rx) =
        PanelController::new(store, SheetLoader::new(source.clone()), AppConfig::default());

    assert!(!controller.request_refresh().await);
    assert_eq!(controller.state, PanelState::NotConfigured);
    assert!(controller.refresh_enabled());
    assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn test_selected_title_limits_tabs() {
    let source = GatedSource::ok(sheet());
    let store = Arc::new(MemoryConfigStore::with_config(PersistedConfig {
        selected_title: Some("Offboarding".into()),
        ..configured()
    }));
    let (mut controller, mut rx) =
        PanelController::new(store, SheetLoader::new(source.clone()), AppConfig::default());

    controller.request_refresh().await;
    source.release();
    controller.apply_load(rx.recv().await.unwrap());

    let view = controller.view().unwrap();
    assert_eq!(view.tabs.len(), 1);
    assert_eq!(view.tabs[0].title, "Offboarding");
}

#[tokio::test]
async fn test_reorder_survives_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let store = Arc::new(JsonConfigStore::new(&path));
    store.set(configured()).await.unwrap();

    let source = GatedSource::ok(sheet());
    let (mut controller, mut rx) =
        PanelController::new(store.clone(), SheetLoader::new(source.clone()), AppConfig::default());
    controller.request_refresh().await;
    source.release();
    controller.apply_load(rx.recv().await.unwrap());

    // open "Access" and move "Grant VPN" above "Create account"
    controller.activate();
    controller.cursor = 2;
    assert_eq!(controller.selected_row(), Some(Row::Item(0, 1)));
    controller.move_selected(-1).await.unwrap();

    let reopened = Arc::new(JsonConfigStore::new(&path));
    let (mut reloaded, mut rx) =
        PanelController::new(reopened, SheetLoader::new(source.clone()), AppConfig::default());
    reloaded.request_refresh().await;
    source.release();
    reloaded.apply_load(rx.recv().await.unwrap());

    let access = reloaded.view().unwrap().category(0, 0).unwrap();
    let contents: Vec<&str> = access.items.iter().map(|item| item.lines[0].as_str()).collect();
    assert_eq!(contents, vec!["Grant VPN", "Create account"]);
}
