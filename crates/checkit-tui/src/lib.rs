pub mod app;
pub mod components;
pub mod controller;
pub mod events;
pub mod forms;
pub mod theme;
pub mod ui;

pub use app::App;
pub use controller::{LoadResult, Mode, PanelController, PanelState, Row};
