use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::StoreError;
use crate::plugins::communication::blog::models::{Blog, BlogFilter, NewBlog};
use crate::plugins::communication::comments::models::{Comment, CommentChange};
use crate::plugins::communication::reports::models::{NewReport, Report};

mod memory;
mod postgres;
#[cfg(test)]
pub(crate) mod testing;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait BlogStore: Send + Sync + 'static {
    /// Persists a new blog; the id comes from the store's own sequence.
    async fn insert_blog(&self, new: NewBlog) -> Result<Blog, StoreError>;

    /// Loads the aggregate with its votes and comments attached.
    async fn load_blog(&self, id: i64) -> Result<Blog, StoreError>;

    /// Writes the aggregate back if the stored version still equals `blog.version`.
    /// Returns the stored aggregate with the bumped version and vote ids filled in.
    async fn save_blog(&self, blog: &Blog) -> Result<Blog, StoreError>;

    /// `save_blog` plus one comment write, applied together or not at all.
    /// Returns the stored aggregate and the comment that was added or removed.
    async fn save_blog_with_comment(&self, blog: &Blog, change: &CommentChange) -> Result<(Blog, Comment), StoreError>;

    async fn delete_blog(&self, id: i64) -> Result<(), StoreError>;

    async fn list_blogs(&self, filter: &BlogFilter, limit: i64, offset: i64) -> Result<(Vec<Blog>, i64), StoreError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync + 'static {
    async fn get_comment(&self, id: i64) -> Result<Comment, StoreError>;
    async fn update_comment_text(&self, id: i64, text: &str, updated_at: DateTime<Utc>) -> Result<Comment, StoreError>;
    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError>;
    async fn list_comments_by_blog(&self, blog_id: i64) -> Result<Vec<Comment>, StoreError>;
}

#[async_trait]
pub trait ReportStore: Send + Sync + 'static {
    async fn insert_report(&self, new: NewReport) -> Result<Report, StoreError>;
    async fn list_reports_by_blog(&self, blog_id: i64) -> Result<Vec<Report>, StoreError>;
}

pub trait Store: BlogStore + CommentStore + ReportStore {
    fn backend(&self) -> &'static str;
}

pub type DynStore = Arc<dyn Store>;
