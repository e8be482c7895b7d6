pub mod config;
pub mod error;
pub mod input;
pub mod result;

pub use config::AppConfig;
pub use error::CheckitError;
pub use input::TextField;
pub use result::CheckitResult;
