use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{BlogError, BlogResult};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub blog_id: i64,
    pub user_id: i64,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub blog_id: i64,
    pub user_id: i64,
    pub reason: String,
}

impl NewReport {
    pub fn new(user_id: i64, blog_id: i64, reason: &str) -> BlogResult<Self> {
        if user_id <= 0 {
            return Err(BlogError::validation("user ID must be a positive integer"));
        }
        if blog_id <= 0 {
            return Err(BlogError::validation("blog ID must be a positive integer"));
        }
        if reason.trim().is_empty() {
            return Err(BlogError::validation("report reason cannot be empty"));
        }
        Ok(NewReport { blog_id, user_id, reason: reason.to_string() })
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReportCreate {
    pub user_id: i64,
    pub blog_id: i64,
    pub reason: String,
}
