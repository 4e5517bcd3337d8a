use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::error::BlogResult;
use crate::http_error::AppError;
use crate::plugins::communication::blog::models::{Blog, BlogCreate, BlogFilter, BlogTopic, BlogUpdate, Visibility, VoteRequest, VoteType};
use crate::plugins::communication::blog::service::BlogService;
use crate::plugins::communication::shared::{ListResponse, Pagination};

// Pagination params: page (1-based) and per_page, plus optional filters
#[derive(Debug, Default, serde::Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub author_id: Option<i64>,
    pub topic: Option<String>,
    pub status: Option<String>,
    pub visibility: Option<String>,
}

impl ListQuery {
    fn paging(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }

    fn filter(&self) -> BlogResult<BlogFilter> {
        Ok(BlogFilter {
            author_id: self.author_id,
            topic: self.topic.as_deref().map(str::parse).transpose()?,
            status: self.status.as_deref().map(str::parse).transpose()?,
            visibility: self.visibility.as_deref().map(str::parse).transpose()?,
        })
    }
}

pub async fn create_blog(Extension(service): Extension<BlogService>, Json(payload): Json<BlogCreate>) -> Result<(StatusCode, Json<Blog>), AppError> {
    let topic: BlogTopic = payload.topic.parse()?;
    let blog = service.create(&payload.title, &payload.description, payload.author_id, topic).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

pub async fn get_blog(Extension(service): Extension<BlogService>, Path(id): Path<i64>) -> Result<Json<Blog>, AppError> {
    Ok(Json(service.find(id).await?))
}

pub async fn list_blogs(Extension(service): Extension<BlogService>, Query(q): Query<ListQuery>) -> Result<Json<ListResponse<Blog>>, AppError> {
    let filter = q.filter()?;
    Ok(Json(service.list(&filter, q.paging()).await?))
}

pub async fn list_published(Extension(service): Extension<BlogService>, Query(q): Query<ListQuery>) -> Result<Json<ListResponse<Blog>>, AppError> {
    let filter = BlogFilter { visibility: Some(Visibility::Public), ..q.filter()? };
    Ok(Json(service.list(&filter, q.paging()).await?))
}

pub async fn list_by_author(Extension(service): Extension<BlogService>, Path(author_id): Path<i64>, Query(q): Query<ListQuery>) -> Result<Json<ListResponse<Blog>>, AppError> {
    let filter = BlogFilter { author_id: Some(author_id), ..q.filter()? };
    Ok(Json(service.list(&filter, q.paging()).await?))
}

pub async fn list_by_topic(Extension(service): Extension<BlogService>, Path(topic): Path<String>, Query(q): Query<ListQuery>) -> Result<Json<ListResponse<Blog>>, AppError> {
    let topic: BlogTopic = topic.parse()?;
    let filter = BlogFilter { topic: Some(topic), ..q.filter()? };
    Ok(Json(service.list(&filter, q.paging()).await?))
}

pub async fn update_blog(Extension(service): Extension<BlogService>, Path(id): Path<i64>, Json(payload): Json<BlogUpdate>) -> Result<Json<Blog>, AppError> {
    Ok(Json(service.update(id, &payload.title, &payload.description).await?))
}

pub async fn block_blog(Extension(service): Extension<BlogService>, Path(id): Path<i64>) -> Result<Json<Blog>, AppError> {
    Ok(Json(service.block(id).await?))
}

pub async fn delete_blog(Extension(service): Extension<BlogService>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn vote(Extension(service): Extension<BlogService>, Json(payload): Json<VoteRequest>) -> Result<Json<Blog>, AppError> {
    // unknown vote types are rejected here, before the blog is touched
    let vote_type: VoteType = payload.vote_type.parse()?;
    Ok(Json(service.set_vote(payload.blog_id, payload.user_id, vote_type).await?))
}
