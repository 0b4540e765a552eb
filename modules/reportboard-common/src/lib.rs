pub mod types;
pub mod config;
pub mod error;
pub mod reference;

pub use types::*;
pub use config::{Config, FileConfig};
pub use error::{ReportBoardError, Result};
pub use reference::reference_reports;
