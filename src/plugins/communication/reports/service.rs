use tracing::info;

use crate::error::BlogResult;
use crate::plugins::communication::reports::models::{NewReport, Report, ReportCreate};
use crate::store::DynStore;

#[derive(Clone)]
pub struct ReportService {
    store: DynStore,
}

impl ReportService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, req: ReportCreate) -> BlogResult<Report> {
        let new = NewReport::new(req.user_id, req.blog_id, &req.reason)?;
        let report = self.store.insert_report(new).await?;
        info!(report_id = report.id, blog_id = report.blog_id, "blog reported");
        Ok(report)
    }

    pub async fn list_by_blog(&self, blog_id: i64) -> BlogResult<Vec<Report>> {
        Ok(self.store.list_reports_by_blog(blog_id).await?)
    }
}
