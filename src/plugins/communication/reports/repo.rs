use sqlx::PgPool;

use crate::error::StoreError;
use crate::plugins::communication::reports::models::{NewReport, Report};

pub async fn insert_report(pool: &PgPool, new: &NewReport) -> Result<Report, StoreError> {
    let report = sqlx::query_as::<_, Report>("INSERT INTO reports (blog_id, user_id, reason) VALUES ($1,$2,$3) RETURNING id, blog_id, user_id, reason")
        .bind(new.blog_id)
        .bind(new.user_id)
        .bind(&new.reason)
        .fetch_one(pool)
        .await?;
    Ok(report)
}

pub async fn reports_by_blog(pool: &PgPool, blog_id: i64) -> Result<Vec<Report>, StoreError> {
    let items = sqlx::query_as::<_, Report>("SELECT id, blog_id, user_id, reason FROM reports WHERE blog_id = $1 ORDER BY id")
        .bind(blog_id)
        .fetch_all(pool)
        .await?;
    Ok(items)
}
