//! Sheet loading: one GET to the spreadsheet endpoint, parsed and normalized
//! into a [`checkit_domain::TabModel`].

pub mod loader;
pub mod source;

pub use loader::SheetLoader;
pub use source::{HttpSheetSource, SheetSource};
