use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::StoreError;
use crate::plugins::communication::blog::ledger::{Vote, VoteLedger};
use crate::plugins::communication::blog::models::{Blog, BlogFilter, NewBlog};
use crate::plugins::communication::comments::models::Comment;

const BLOG_COLUMNS: &str = "id, title, description, date, author_id, status, visibility, topic, vote_count, upvote_count, downvote_count, version";

// Enum columns are plain TEXT; they are parsed when the row is turned into a Blog.
#[derive(Debug, FromRow)]
pub struct BlogRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub author_id: i64,
    pub status: String,
    pub visibility: String,
    pub topic: String,
    pub vote_count: i64,
    pub upvote_count: i64,
    pub downvote_count: i64,
    pub version: i64,
}

#[derive(Debug, FromRow)]
pub struct VoteRow {
    pub id: i64,
    pub user_id: i64,
    pub blog_id: i64,
    pub vote_type: String,
}

impl TryFrom<VoteRow> for Vote {
    type Error = StoreError;

    fn try_from(r: VoteRow) -> Result<Self, Self::Error> {
        Ok(Vote {
            id: Some(r.id),
            user_id: r.user_id,
            blog_id: r.blog_id,
            vote_type: r.vote_type.parse().map_err(|_| StoreError::Corrupt(format!("vote {} has type {}", r.id, r.vote_type)))?,
        })
    }
}

impl BlogRow {
    pub fn into_blog(self, votes: Vec<Vote>, comments: Vec<Comment>) -> Result<Blog, StoreError> {
        let corrupt = |field: &str, value: &str| StoreError::Corrupt(format!("blog {} has {} {}", self.id, field, value));
        Ok(Blog {
            status: self.status.parse().map_err(|_| corrupt("status", &self.status))?,
            visibility: self.visibility.parse().map_err(|_| corrupt("visibility", &self.visibility))?,
            topic: self.topic.parse().map_err(|_| corrupt("topic", &self.topic))?,
            id: self.id,
            title: self.title,
            description: self.description,
            date: self.date,
            author_id: self.author_id,
            vote_count: self.vote_count,
            upvote_count: self.upvote_count,
            downvote_count: self.downvote_count,
            comments,
            votes: VoteLedger::from_votes(votes),
            version: self.version,
        })
    }
}

pub async fn insert_blog(pool: &PgPool, new: &NewBlog, status: &str, visibility: &str) -> Result<BlogRow, StoreError> {
    let sql = format!(
        "INSERT INTO blogs (title, description, author_id, status, visibility, topic) VALUES ($1,$2,$3,$4,$5,$6) RETURNING {}",
        BLOG_COLUMNS
    );
    let row = sqlx::query_as::<_, BlogRow>(&sql)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.author_id)
        .bind(status)
        .bind(visibility)
        .bind(new.topic.as_str())
        .fetch_one(pool)
        .await?;
    Ok(row)
}

pub async fn get_blog_row(conn: &mut PgConnection, id: i64) -> Result<BlogRow, StoreError> {
    let sql = format!("SELECT {} FROM blogs WHERE id = $1", BLOG_COLUMNS);
    sqlx::query_as::<_, BlogRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(StoreError::NotFound { entity: "blog", id })
}

pub async fn votes_for(conn: &mut PgConnection, blog_ids: &[i64]) -> Result<Vec<Vote>, StoreError> {
    let rows = sqlx::query_as::<_, VoteRow>("SELECT id, user_id, blog_id, vote_type FROM votes WHERE blog_id = ANY($1) ORDER BY id")
        .bind(blog_ids)
        .fetch_all(conn)
        .await?;
    rows.into_iter().map(Vote::try_from).collect()
}

/// Compare-and-swap on `version`. Returns the new version, or `None` when the row
/// is missing or has moved on.
pub async fn update_blog_if_version(conn: &mut PgConnection, blog: &Blog) -> Result<Option<i64>, StoreError> {
    let version = sqlx::query_scalar::<_, i64>(
        "UPDATE blogs SET title = $1, description = $2, status = $3, visibility = $4, vote_count = $5, upvote_count = $6, downvote_count = $7, version = version + 1 WHERE id = $8 AND version = $9 RETURNING version",
    )
    .bind(&blog.title)
    .bind(&blog.description)
    .bind(blog.status.as_str())
    .bind(blog.visibility.as_str())
    .bind(blog.vote_count)
    .bind(blog.upvote_count)
    .bind(blog.downvote_count)
    .bind(blog.id)
    .bind(blog.version)
    .fetch_optional(conn)
    .await?;
    Ok(version)
}

pub async fn blog_exists(conn: &mut PgConnection, id: i64) -> Result<bool, StoreError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT id FROM blogs WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

pub async fn upsert_vote(conn: &mut PgConnection, vote: &Vote) -> Result<i64, StoreError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO votes (blog_id, user_id, vote_type) VALUES ($1,$2,$3) ON CONFLICT (blog_id, user_id) DO UPDATE SET vote_type = EXCLUDED.vote_type RETURNING id",
    )
    .bind(vote.blog_id)
    .bind(vote.user_id)
    .bind(vote.vote_type.as_str())
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn delete_blog(pool: &PgPool, id: i64) -> Result<(), StoreError> {
    let res = sqlx::query("DELETE FROM blogs WHERE id = $1").bind(id).execute(pool).await?;
    if res.rows_affected() == 0 {
        return Err(StoreError::NotFound { entity: "blog", id });
    }
    Ok(())
}

pub async fn list_blog_rows(pool: &PgPool, filter: &BlogFilter, per_page: i64, offset: i64) -> Result<(Vec<BlogRow>, i64), StoreError> {
    enum Param { Int(i64), Str(&'static str) }
    let mut where_clauses: Vec<String> = Vec::new();
    let mut params: Vec<Param> = Vec::new();
    if let Some(author_id) = filter.author_id {
        where_clauses.push(format!("author_id = ${}", params.len() + 1));
        params.push(Param::Int(author_id));
    }
    if let Some(topic) = filter.topic {
        where_clauses.push(format!("topic = ${}", params.len() + 1));
        params.push(Param::Str(topic.as_str()));
    }
    if let Some(status) = filter.status {
        where_clauses.push(format!("status = ${}", params.len() + 1));
        params.push(Param::Str(status.as_str()));
    }
    if let Some(visibility) = filter.visibility {
        where_clauses.push(format!("visibility = ${}", params.len() + 1));
        params.push(Param::Str(visibility.as_str()));
    }

    let where_sql = if where_clauses.is_empty() { "1=1".to_string() } else { where_clauses.join(" AND ") };

    let items_sql = format!("SELECT {} FROM blogs WHERE {} ORDER BY id DESC LIMIT ${} OFFSET ${}", BLOG_COLUMNS, where_sql, params.len() + 1, params.len() + 2);
    let mut items_q = sqlx::query_as::<_, BlogRow>(&items_sql);
    for p in &params {
        match p {
            Param::Int(i) => { items_q = items_q.bind(*i); }
            Param::Str(s) => { items_q = items_q.bind(*s); }
        }
    }
    let rows: Vec<BlogRow> = items_q.bind(per_page).bind(offset).fetch_all(pool).await?;

    let count_sql = format!("SELECT COUNT(*) FROM blogs WHERE {}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for p in &params {
        match p {
            Param::Int(i) => { count_q = count_q.bind(*i); }
            Param::Str(s) => { count_q = count_q.bind(*s); }
        }
    }
    let total: i64 = count_q.fetch_one(pool).await?;

    Ok((rows, total))
}
