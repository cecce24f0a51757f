pub mod api;
pub mod config;
pub mod crop;
pub mod exports;
pub mod logging;
pub mod models;
pub mod phase;
pub mod workflows;

pub use api::{ApiClient, ApiError};
pub use config::{Config, ConfigStore, Session, User};
pub use crop::{CropSelection, Preview, Transport};
pub use exports::{ExportList, ExportStore};
pub use phase::{Phase, Tracker};
