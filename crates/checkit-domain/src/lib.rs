pub mod export;
pub mod item;
pub mod model;
pub mod order;
pub mod search;
pub mod sheet;
pub mod view;

pub use export::{ChecklistExporter, CsvExport, ExportEntry, ExportMetadata};
pub use item::{parse_sheet_date, ChecklistItem, ItemId};
pub use model::{CategoryGroup, Tab, TabModel};
pub use order::{order_key, CustomOrder};
pub use search::{CompositeSearcher, ItemSearcher};
pub use sheet::{RawSheet, RawTab, TabSelection};
pub use view::{Badge, CategoryView, ItemView, PanelView, TabView};
