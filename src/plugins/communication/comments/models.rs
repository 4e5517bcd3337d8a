use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{BlogError, BlogResult};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub author_id: i64,
    pub blog_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub author_id: i64,
    pub blog_id: i64,
    pub created_at: DateTime<Utc>,
    pub text: String,
}

impl NewComment {
    pub fn new(author_id: i64, blog_id: i64, created_at: DateTime<Utc>, text: &str) -> BlogResult<Self> {
        if author_id <= 0 {
            return Err(BlogError::validation("author ID must be a positive integer"));
        }
        if blog_id <= 0 {
            return Err(BlogError::validation("blog ID must be a positive integer"));
        }
        validate_text(text)?;
        Ok(NewComment { author_id, blog_id, created_at, text: text.to_string() })
    }
}

/// A comment write that has to land together with the blog's status.
#[derive(Debug, Clone)]
pub enum CommentChange {
    Add(NewComment),
    Remove(i64),
}

pub fn validate_text(text: &str) -> BlogResult<()> {
    if text.trim().is_empty() {
        return Err(BlogError::validation("comment text cannot be empty"));
    }
    Ok(())
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreate {
    pub author_id: i64,
    pub blog_id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub text: String,
}

#[derive(Deserialize, Debug)]
pub struct CommentUpdate {
    pub text: String,
}
