pub mod config;
pub mod core;
pub mod logging;
pub mod services;
pub mod tui;

// Re-export commonly used types
pub use config::Config;
pub use core::{DatasetId, HeaderMode, ServiceReply};
pub use services::{ClientError, DatasetService, Explorer, HttpDatasetClient};
pub use tui::{Action, App};
