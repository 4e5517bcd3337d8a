pub mod models;
pub mod repo;
pub mod service;
pub mod handlers;
pub mod plugin;

pub use models::{Report, ReportCreate};
pub use service::ReportService;
pub use plugin::ReportsPlugin;
