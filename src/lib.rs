pub mod config;
pub mod db;
pub mod error;
pub mod http_error;
pub mod kernel;
pub mod plugins;
pub mod store;

pub use crate::kernel::*;
pub use crate::db::*;

use crate::plugins::communication::blog::{BlogPlugin, BlogService};
use crate::plugins::communication::comments::{CommentService, CommentsPlugin};
use crate::plugins::communication::reports::{ReportService, ReportsPlugin};
use crate::plugins::health::HealthPlugin;
use crate::plugins::metrics::MetricsPlugin;
use crate::store::DynStore;

/// The plugin set served by the binary, all sharing one store and one blog service.
pub fn standard_plugins(store: DynStore, metrics: Option<MetricsPlugin>) -> Vec<Box<dyn Plugin>> {
    let mut blogs = BlogService::new(store.clone());
    if let Some(m) = metrics {
        blogs = blogs.with_metrics(m);
    }
    let comments = CommentService::new(blogs.clone());
    let reports = ReportService::new(store.clone());

    vec![
        Box::new(HealthPlugin::new(store.backend())),
        Box::new(BlogPlugin::new(blogs)),
        Box::new(CommentsPlugin::new(comments)),
        Box::new(ReportsPlugin::new(reports)),
    ]
}
