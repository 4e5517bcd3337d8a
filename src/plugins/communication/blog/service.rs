use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{BlogError, BlogResult, StoreError};
use crate::plugins::communication::blog::ledger::LedgerChange;
use crate::plugins::communication::blog::models::{Blog, BlogFilter, BlogTopic, NewBlog, VoteType};
use crate::plugins::communication::comments::models::{Comment, CommentChange};
use crate::plugins::communication::locks::BlogLocks;
use crate::plugins::communication::shared::{ListResponse, Pagination};
use crate::plugins::metrics::MetricsPlugin;
use crate::store::DynStore;

/// How many times a mutation is reapplied after losing a version race to
/// another process before the caller gets `Conflict`.
pub const MAX_CONFLICT_RETRIES: usize = 3;

#[derive(Clone)]
pub struct BlogService {
    store: DynStore,
    locks: Arc<BlogLocks>,
    metrics: Option<MetricsPlugin>,
}

impl BlogService {
    pub fn new(store: DynStore) -> Self {
        Self { store, locks: Arc::new(BlogLocks::new()), metrics: None }
    }

    pub fn with_metrics(mut self, metrics: MetricsPlugin) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn store(&self) -> &DynStore {
        &self.store
    }

    #[instrument(skip(self))]
    pub async fn find(&self, id: i64) -> BlogResult<Blog> {
        Ok(self.store.load_blog(id).await?)
    }

    pub async fn list(&self, filter: &BlogFilter, paging: Pagination) -> BlogResult<ListResponse<Blog>> {
        let (items, total) = self.store.list_blogs(filter, paging.limit(), paging.offset()).await?;
        Ok(ListResponse::new(items, paging, total))
    }

    #[instrument(skip(self, description))]
    pub async fn create(&self, title: &str, description: &str, author_id: i64, topic: BlogTopic) -> BlogResult<Blog> {
        let new = NewBlog::new(title, description, author_id, topic)?;
        let blog = self.store.insert_blog(new).await?;
        info!(blog_id = blog.id, "blog created");
        Ok(blog)
    }

    /// Changes title and description only; counts, status and visibility are untouched.
    #[instrument(skip(self, description))]
    pub async fn update(&self, id: i64, title: &str, description: &str) -> BlogResult<Blog> {
        self.mutate(id, |blog| {
            blog.rename(title, description)?;
            Ok(true)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn block(&self, id: i64) -> BlogResult<Blog> {
        self.mutate(id, |blog| {
            blog.block();
            Ok(true)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> BlogResult<()> {
        let _guard = self.locks.acquire(id).await;
        self.store.delete_blog(id).await?;
        info!(blog_id = id, "blog deleted");
        Ok(())
    }

    /// Records a user's vote and re-derives counts and status in one save.
    #[instrument(skip(self))]
    pub async fn set_vote(&self, blog_id: i64, user_id: i64, vote_type: VoteType) -> BlogResult<Blog> {
        if user_id <= 0 {
            return Err(BlogError::validation("user ID must be a positive integer"));
        }
        let mut outcome = LedgerChange::Unchanged;
        let blog = self
            .mutate(blog_id, |blog| {
                outcome = blog.set_vote(user_id, vote_type)?;
                Ok(outcome.changed())
            })
            .await?;
        if let Some(m) = &self.metrics {
            m.record_vote(vote_type, outcome);
        }
        debug!(blog_id, user_id, outcome = outcome.as_label(), vote_count = blog.vote_count, "vote recorded");
        Ok(blog)
    }

    /// Adds or removes a comment and re-derives the blog's status in the same
    /// version-checked write. Returns the comment that was added or removed.
    #[instrument(skip(self, change))]
    pub async fn change_comment(&self, blog_id: i64, change: CommentChange) -> BlogResult<Comment> {
        let (_, comment) = self
            .mutate_with(blog_id, Some(&change), |blog| {
                let count = match &change {
                    CommentChange::Add(_) => blog.comment_count() + 1,
                    CommentChange::Remove(id) => {
                        if !blog.comments.iter().any(|c| c.id == *id) {
                            return Err(BlogError::NotFound { entity: "comment", id: *id });
                        }
                        blog.comment_count() - 1
                    }
                };
                blog.refresh_status_with(count);
                Ok(true)
            })
            .await?;
        comment.ok_or_else(|| BlogError::Storage(format!("comment write on blog {} returned no row", blog_id)))
    }

    async fn mutate<F>(&self, id: i64, apply: F) -> BlogResult<Blog>
    where
        F: FnMut(&mut Blog) -> BlogResult<bool> + Send,
    {
        let (blog, _) = self.mutate_with(id, None, apply).await?;
        Ok(blog)
    }

    /// Serialized read-modify-write. `apply` returns whether the blog needs saving;
    /// `comment` is written in the same save when given.
    async fn mutate_with<F>(&self, id: i64, comment: Option<&CommentChange>, mut apply: F) -> BlogResult<(Blog, Option<Comment>)>
    where
        F: FnMut(&mut Blog) -> BlogResult<bool> + Send,
    {
        let _guard = self.locks.acquire(id).await;
        let mut attempt = 0;
        loop {
            let mut blog = self.store.load_blog(id).await?;
            let before = blog.status;
            if !apply(&mut blog)? {
                return Ok((blog, None));
            }
            blog.validate()?;

            let saved = match comment {
                None => self.store.save_blog(&blog).await.map(|b| (b, None)),
                Some(change) => self.store.save_blog_with_comment(&blog, change).await.map(|(b, c)| (b, Some(c))),
            };
            match saved {
                Ok((saved, written)) => {
                    if saved.status != before {
                        info!(blog_id = id, from = %before, to = %saved.status, "blog status changed");
                        if let Some(m) = &self.metrics {
                            m.record_status_transition(before, saved.status);
                        }
                    }
                    return Ok((saved, written));
                }
                Err(StoreError::VersionConflict { .. }) if attempt < MAX_CONFLICT_RETRIES => {
                    attempt += 1;
                    warn!(blog_id = id, attempt, "blog version moved underneath us, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
