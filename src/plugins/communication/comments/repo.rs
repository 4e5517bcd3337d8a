use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::error::StoreError;
use crate::plugins::communication::comments::models::{Comment, NewComment};

pub async fn insert_comment(conn: &mut PgConnection, new: &NewComment) -> Result<Comment, StoreError> {
    let comment = sqlx::query_as::<_, Comment>("INSERT INTO comments (author_id, blog_id, created_at, text) VALUES ($1,$2,$3,$4) RETURNING id, author_id, blog_id, created_at, updated_at, text")
        .bind(new.author_id)
        .bind(new.blog_id)
        .bind(new.created_at)
        .bind(&new.text)
        .fetch_one(conn)
        .await?;
    Ok(comment)
}

pub async fn get_comment(pool: &PgPool, id: i64) -> Result<Comment, StoreError> {
    sqlx::query_as::<_, Comment>("SELECT id, author_id, blog_id, created_at, updated_at, text FROM comments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(StoreError::NotFound { entity: "comment", id })
}

pub async fn update_comment_text(pool: &PgPool, id: i64, text: &str, updated_at: DateTime<Utc>) -> Result<Comment, StoreError> {
    sqlx::query_as::<_, Comment>("UPDATE comments SET text = $1, updated_at = $2 WHERE id = $3 RETURNING id, author_id, blog_id, created_at, updated_at, text")
        .bind(text)
        .bind(updated_at)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(StoreError::NotFound { entity: "comment", id })
}

/// Deletes the comment only if it belongs to `blog_id`.
pub async fn delete_comment(conn: &mut PgConnection, id: i64, blog_id: i64) -> Result<Comment, StoreError> {
    sqlx::query_as::<_, Comment>("DELETE FROM comments WHERE id = $1 AND blog_id = $2 RETURNING id, author_id, blog_id, created_at, updated_at, text")
        .bind(id)
        .bind(blog_id)
        .fetch_optional(conn)
        .await?
        .ok_or(StoreError::NotFound { entity: "comment", id })
}

pub async fn list_comments(pool: &PgPool) -> Result<Vec<Comment>, StoreError> {
    let items = sqlx::query_as::<_, Comment>("SELECT id, author_id, blog_id, created_at, updated_at, text FROM comments ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn comments_for(conn: &mut PgConnection, blog_ids: &[i64]) -> Result<Vec<Comment>, StoreError> {
    let items = sqlx::query_as::<_, Comment>("SELECT id, author_id, blog_id, created_at, updated_at, text FROM comments WHERE blog_id = ANY($1) ORDER BY id")
        .bind(blog_ids)
        .fetch_all(conn)
        .await?;
    Ok(items)
}
