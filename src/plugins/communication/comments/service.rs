use chrono::Utc;
use tracing::{info, instrument};

use crate::error::BlogResult;
use crate::plugins::communication::blog::service::BlogService;
use crate::plugins::communication::comments::models::{validate_text, Comment, CommentChange, CommentCreate, NewComment};

/// Comments live in their own table, but every change to a blog's comment
/// count is written together with that blog's recomputed status.
#[derive(Clone)]
pub struct CommentService {
    blogs: BlogService,
}

impl CommentService {
    pub fn new(blogs: BlogService) -> Self {
        Self { blogs }
    }

    #[instrument(skip(self, req), fields(blog_id = req.blog_id))]
    pub async fn create(&self, req: CommentCreate) -> BlogResult<Comment> {
        let new = NewComment::new(req.author_id, req.blog_id, req.created_at.unwrap_or_else(Utc::now), &req.text)?;
        let comment = self.blogs.change_comment(new.blog_id, CommentChange::Add(new)).await?;
        info!(comment_id = comment.id, "comment created");
        Ok(comment)
    }

    pub async fn find(&self, id: i64) -> BlogResult<Comment> {
        Ok(self.blogs.store().get_comment(id).await?)
    }

    pub async fn list(&self) -> BlogResult<Vec<Comment>> {
        Ok(self.blogs.store().list_comments().await?)
    }

    pub async fn list_by_blog(&self, blog_id: i64) -> BlogResult<Vec<Comment>> {
        Ok(self.blogs.store().list_comments_by_blog(blog_id).await?)
    }

    #[instrument(skip(self, text))]
    pub async fn update(&self, id: i64, text: &str) -> BlogResult<Comment> {
        validate_text(text)?;
        Ok(self.blogs.store().update_comment_text(id, text, Utc::now()).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> BlogResult<()> {
        let blog_id = self.find(id).await?.blog_id;
        self.blogs.change_comment(blog_id, CommentChange::Remove(id)).await?;
        info!(comment_id = id, blog_id, "comment deleted");
        Ok(())
    }
}
