use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy)]
pub enum SaveFault {
    Conflict,
    Database,
}

/// Wraps `InMemoryStore` to misbehave on demand: yield between load and save
/// so writers interleave, or fail every save.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryStore,
    yield_on_load: bool,
    fault: Option<SaveFault>,
    saves: AtomicUsize,
    conflicts: AtomicUsize,
}

impl FlakyStore {
    pub fn yielding() -> Self {
        Self { yield_on_load: true, ..Self::default() }
    }

    pub fn failing(fault: SaveFault) -> Self {
        Self { fault: Some(fault), ..Self::default() }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn conflicts(&self) -> usize {
        self.conflicts.load(Ordering::SeqCst)
    }

    fn injected(&self, blog: &Blog) -> Option<StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        match self.fault? {
            SaveFault::Conflict => Some(StoreError::VersionConflict { id: blog.id, expected: blog.version }),
            SaveFault::Database => Some(StoreError::Database(sqlx::Error::PoolTimedOut)),
        }
    }

    fn observe<T>(&self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        if matches!(result, Err(StoreError::VersionConflict { .. })) {
            self.conflicts.fetch_add(1, Ordering::SeqCst);
        }
        result
    }
}

#[async_trait]
impl BlogStore for FlakyStore {
    async fn insert_blog(&self, new: NewBlog) -> Result<Blog, StoreError> {
        self.inner.insert_blog(new).await
    }

    async fn load_blog(&self, id: i64) -> Result<Blog, StoreError> {
        let blog = self.inner.load_blog(id).await?;
        if self.yield_on_load {
            tokio::task::yield_now().await;
        }
        Ok(blog)
    }

    async fn save_blog(&self, blog: &Blog) -> Result<Blog, StoreError> {
        if let Some(e) = self.injected(blog) {
            return self.observe(Err(e));
        }
        self.observe(self.inner.save_blog(blog).await)
    }

    async fn save_blog_with_comment(&self, blog: &Blog, change: &CommentChange) -> Result<(Blog, Comment), StoreError> {
        if let Some(e) = self.injected(blog) {
            return self.observe(Err(e));
        }
        self.observe(self.inner.save_blog_with_comment(blog, change).await)
    }

    async fn delete_blog(&self, id: i64) -> Result<(), StoreError> {
        self.inner.delete_blog(id).await
    }

    async fn list_blogs(&self, filter: &BlogFilter, limit: i64, offset: i64) -> Result<(Vec<Blog>, i64), StoreError> {
        self.inner.list_blogs(filter, limit, offset).await
    }
}

#[async_trait]
impl CommentStore for FlakyStore {
    async fn get_comment(&self, id: i64) -> Result<Comment, StoreError> {
        self.inner.get_comment(id).await
    }

    async fn update_comment_text(&self, id: i64, text: &str, updated_at: DateTime<Utc>) -> Result<Comment, StoreError> {
        self.inner.update_comment_text(id, text, updated_at).await
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        self.inner.list_comments().await
    }

    async fn list_comments_by_blog(&self, blog_id: i64) -> Result<Vec<Comment>, StoreError> {
        self.inner.list_comments_by_blog(blog_id).await
    }
}

#[async_trait]
impl ReportStore for FlakyStore {
    async fn insert_report(&self, new: NewReport) -> Result<Report, StoreError> {
        self.inner.insert_report(new).await
    }

    async fn list_reports_by_blog(&self, blog_id: i64) -> Result<Vec<Report>, StoreError> {
        self.inner.list_reports_by_blog(blog_id).await
    }
}

impl Store for FlakyStore {
    fn backend(&self) -> &'static str {
        "flaky"
    }
}
