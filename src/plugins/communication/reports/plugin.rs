use axum::{Router, routing::get, routing::post, Extension};
use crate::kernel::Plugin;
use crate::plugins::communication::reports::handlers::*;
use crate::plugins::communication::reports::service::ReportService;

pub struct ReportsPlugin { pub service: ReportService }

impl ReportsPlugin {
    pub fn new(service: ReportService) -> Self { Self { service } }
}

#[async_trait::async_trait]
impl Plugin for ReportsPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_report))
            .route("/:blog_id", get(list_blog_reports))
            .layer(Extension(self.service.clone()))
    }

    fn name(&self) -> &'static str { "reports" }
}
