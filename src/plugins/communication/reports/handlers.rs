use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::http_error::AppError;
use crate::plugins::communication::reports::models::{Report, ReportCreate};
use crate::plugins::communication::reports::service::ReportService;

pub async fn create_report(Extension(service): Extension<ReportService>, Json(payload): Json<ReportCreate>) -> Result<(StatusCode, Json<Report>), AppError> {
    let report = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn list_blog_reports(Extension(service): Extension<ReportService>, Path(blog_id): Path<i64>) -> Result<Json<Vec<Report>>, AppError> {
    Ok(Json(service.list_by_blog(blog_id).await?))
}
