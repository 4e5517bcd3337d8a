use super::*;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

use crate::plugins::communication::blog::ledger::Vote;
use crate::plugins::communication::blog::models::{BlogStatus, Visibility};
use crate::plugins::communication::blog::repo as blog_repo;
use crate::plugins::communication::comments::repo as comment_repo;
use crate::plugins::communication::reports::repo as report_repo;

const FOREIGN_KEY_VIOLATION: &str = "23503";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn into_arc(self) -> DynStore {
        Arc::new(self)
    }
}

// Inserts that reference a vanished blog fail on the foreign key; report that as a missing blog.
fn missing_blog_on_fk(e: StoreError, blog_id: i64) -> StoreError {
    if let StoreError::Database(sqlx::Error::Database(db)) = &e {
        if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return StoreError::NotFound { entity: "blog", id: blog_id };
        }
    }
    e
}

// Version-checked update of the blog row and its votes, inside the caller's transaction.
async fn write_blog(conn: &mut PgConnection, blog: &Blog) -> Result<(), StoreError> {
    if blog_repo::update_blog_if_version(&mut *conn, blog).await?.is_none() {
        return Err(if blog_repo::blog_exists(&mut *conn, blog.id).await? {
            StoreError::VersionConflict { id: blog.id, expected: blog.version }
        } else {
            StoreError::NotFound { entity: "blog", id: blog.id }
        });
    }
    for vote in blog.votes.votes() {
        blog_repo::upsert_vote(&mut *conn, vote).await?;
    }
    Ok(())
}

#[async_trait]
impl BlogStore for PgStore {
    async fn insert_blog(&self, new: NewBlog) -> Result<Blog, StoreError> {
        let row = blog_repo::insert_blog(&self.pool, &new, BlogStatus::Published.as_str(), Visibility::Public.as_str()).await?;
        row.into_blog(Vec::new(), Vec::new())
    }

    async fn load_blog(&self, id: i64) -> Result<Blog, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let row = blog_repo::get_blog_row(&mut conn, id).await?;
        let votes = blog_repo::votes_for(&mut conn, &[id]).await?;
        let comments = comment_repo::comments_for(&mut conn, &[id]).await?;
        row.into_blog(votes, comments)
    }

    async fn save_blog(&self, blog: &Blog) -> Result<Blog, StoreError> {
        let mut tx = self.pool.begin().await?;
        write_blog(&mut tx, blog).await?;
        tx.commit().await?;
        self.load_blog(blog.id).await
    }

    async fn save_blog_with_comment(&self, blog: &Blog, change: &CommentChange) -> Result<(Blog, Comment), StoreError> {
        let mut tx = self.pool.begin().await?;
        write_blog(&mut tx, blog).await?;
        // the blog row is locked by the update above until commit
        let comment = match change {
            CommentChange::Add(new) => comment_repo::insert_comment(&mut tx, new).await.map_err(|e| missing_blog_on_fk(e, new.blog_id))?,
            CommentChange::Remove(id) => comment_repo::delete_comment(&mut tx, *id, blog.id).await?,
        };
        tx.commit().await?;
        Ok((self.load_blog(blog.id).await?, comment))
    }

    async fn delete_blog(&self, id: i64) -> Result<(), StoreError> {
        blog_repo::delete_blog(&self.pool, id).await
    }

    async fn list_blogs(&self, filter: &BlogFilter, limit: i64, offset: i64) -> Result<(Vec<Blog>, i64), StoreError> {
        let (rows, total) = blog_repo::list_blog_rows(&self.pool, filter, limit, offset).await?;
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();

        let mut conn = self.pool.acquire().await?;
        let mut votes: HashMap<i64, Vec<Vote>> = HashMap::new();
        for v in blog_repo::votes_for(&mut conn, &ids).await? {
            votes.entry(v.blog_id).or_default().push(v);
        }
        let mut comments: HashMap<i64, Vec<Comment>> = HashMap::new();
        for c in comment_repo::comments_for(&mut conn, &ids).await? {
            comments.entry(c.blog_id).or_default().push(c);
        }

        let items = rows
            .into_iter()
            .map(|r| {
                let id = r.id;
                r.into_blog(votes.remove(&id).unwrap_or_default(), comments.remove(&id).unwrap_or_default())
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn get_comment(&self, id: i64) -> Result<Comment, StoreError> {
        comment_repo::get_comment(&self.pool, id).await
    }

    async fn update_comment_text(&self, id: i64, text: &str, updated_at: DateTime<Utc>) -> Result<Comment, StoreError> {
        comment_repo::update_comment_text(&self.pool, id, text, updated_at).await
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        comment_repo::list_comments(&self.pool).await
    }

    async fn list_comments_by_blog(&self, blog_id: i64) -> Result<Vec<Comment>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        comment_repo::comments_for(&mut conn, &[blog_id]).await
    }
}

#[async_trait]
impl ReportStore for PgStore {
    async fn insert_report(&self, new: NewReport) -> Result<Report, StoreError> {
        report_repo::insert_report(&self.pool, &new).await.map_err(|e| missing_blog_on_fk(e, new.blog_id))
    }

    async fn list_reports_by_blog(&self, blog_id: i64) -> Result<Vec<Report>, StoreError> {
        report_repo::reports_by_blog(&self.pool, blog_id).await
    }
}

impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }
}
