use super::*;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::plugins::communication::comments::models::NewComment;

#[derive(Default)]
struct Tables {
    // stored without comments; they are attached from `comments` on load
    blogs: BTreeMap<i64, Blog>,
    comments: BTreeMap<i64, Comment>,
    reports: BTreeMap<i64, Report>,
    last_blog_id: i64,
    last_vote_id: i64,
    last_comment_id: i64,
    last_report_id: i64,
}

impl Tables {
    fn comments_of(&self, blog_id: i64) -> Vec<Comment> {
        self.comments.values().filter(|c| c.blog_id == blog_id).cloned().collect()
    }

    fn attach(&self, blog: &Blog) -> Blog {
        let mut out = blog.clone();
        out.comments = self.comments_of(blog.id);
        out
    }

    fn check_version(&self, blog: &Blog) -> Result<(), StoreError> {
        let current = self.blogs.get(&blog.id).ok_or(StoreError::NotFound { entity: "blog", id: blog.id })?;
        if current.version != blog.version {
            return Err(StoreError::VersionConflict { id: blog.id, expected: blog.version });
        }
        Ok(())
    }

    // Caller has already run `check_version`.
    fn write_blog(&mut self, blog: &Blog) -> Blog {
        let mut stored = blog.clone();
        stored.comments = Vec::new();
        stored.version += 1;
        for vote in stored.votes.votes_mut() {
            if vote.id.is_none() {
                self.last_vote_id += 1;
                vote.id = Some(self.last_vote_id);
            }
        }
        self.blogs.insert(stored.id, stored.clone());
        self.attach(&stored)
    }

    fn add_comment(&mut self, new: &NewComment) -> Comment {
        self.last_comment_id += 1;
        let comment = Comment {
            id: self.last_comment_id,
            author_id: new.author_id,
            blog_id: new.blog_id,
            created_at: new.created_at,
            updated_at: None,
            text: new.text.clone(),
        };
        self.comments.insert(comment.id, comment.clone());
        comment
    }
}

/// Process-local store. Ids come from per-table monotonic counters.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_arc(self) -> DynStore {
        Arc::new(self)
    }
}

#[async_trait]
impl BlogStore for InMemoryStore {
    async fn insert_blog(&self, new: NewBlog) -> Result<Blog, StoreError> {
        let mut t = self.inner.lock();
        t.last_blog_id += 1;
        let blog = Blog::from_new(t.last_blog_id, Utc::now(), new);
        t.blogs.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn load_blog(&self, id: i64) -> Result<Blog, StoreError> {
        let t = self.inner.lock();
        let blog = t.blogs.get(&id).ok_or(StoreError::NotFound { entity: "blog", id })?;
        Ok(t.attach(blog))
    }

    async fn save_blog(&self, blog: &Blog) -> Result<Blog, StoreError> {
        let mut t = self.inner.lock();
        t.check_version(blog)?;
        Ok(t.write_blog(blog))
    }

    async fn save_blog_with_comment(&self, blog: &Blog, change: &CommentChange) -> Result<(Blog, Comment), StoreError> {
        let mut t = self.inner.lock();
        t.check_version(blog)?;
        let comment = match change {
            CommentChange::Add(new) => {
                if new.blog_id != blog.id {
                    return Err(StoreError::NotFound { entity: "blog", id: new.blog_id });
                }
                t.add_comment(new)
            }
            CommentChange::Remove(id) => {
                if !t.comments.get(id).is_some_and(|c| c.blog_id == blog.id) {
                    return Err(StoreError::NotFound { entity: "comment", id: *id });
                }
                t.comments.remove(id).ok_or(StoreError::NotFound { entity: "comment", id: *id })?
            }
        };
        Ok((t.write_blog(blog), comment))
    }

    async fn delete_blog(&self, id: i64) -> Result<(), StoreError> {
        let mut t = self.inner.lock();
        t.blogs.remove(&id).ok_or(StoreError::NotFound { entity: "blog", id })?;
        t.comments.retain(|_, c| c.blog_id != id);
        t.reports.retain(|_, r| r.blog_id != id);
        Ok(())
    }

    async fn list_blogs(&self, filter: &BlogFilter, limit: i64, offset: i64) -> Result<(Vec<Blog>, i64), StoreError> {
        let t = self.inner.lock();
        // newest first, like the SQL listing
        let matching: Vec<&Blog> = t.blogs.values().rev().filter(|b| filter.matches(b)).collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|b| t.attach(b))
            .collect();
        Ok((items, total))
    }
}

#[async_trait]
impl CommentStore for InMemoryStore {
    async fn get_comment(&self, id: i64) -> Result<Comment, StoreError> {
        self.inner.lock().comments.get(&id).cloned().ok_or(StoreError::NotFound { entity: "comment", id })
    }

    async fn update_comment_text(&self, id: i64, text: &str, updated_at: DateTime<Utc>) -> Result<Comment, StoreError> {
        let mut t = self.inner.lock();
        let comment = t.comments.get_mut(&id).ok_or(StoreError::NotFound { entity: "comment", id })?;
        comment.text = text.to_string();
        comment.updated_at = Some(updated_at);
        Ok(comment.clone())
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        Ok(self.inner.lock().comments.values().cloned().collect())
    }

    async fn list_comments_by_blog(&self, blog_id: i64) -> Result<Vec<Comment>, StoreError> {
        Ok(self.inner.lock().comments_of(blog_id))
    }
}

#[async_trait]
impl ReportStore for InMemoryStore {
    async fn insert_report(&self, new: NewReport) -> Result<Report, StoreError> {
        let mut t = self.inner.lock();
        if !t.blogs.contains_key(&new.blog_id) {
            return Err(StoreError::NotFound { entity: "blog", id: new.blog_id });
        }
        t.last_report_id += 1;
        let report = Report { id: t.last_report_id, blog_id: new.blog_id, user_id: new.user_id, reason: new.reason };
        t.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn list_reports_by_blog(&self, blog_id: i64) -> Result<Vec<Report>, StoreError> {
        Ok(self.inner.lock().reports.values().filter(|r| r.blog_id == blog_id).cloned().collect())
    }
}

impl Store for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}
