use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::http_error::AppError;
use crate::plugins::communication::comments::models::{Comment, CommentCreate, CommentUpdate};
use crate::plugins::communication::comments::service::CommentService;

pub async fn create_comment(Extension(service): Extension<CommentService>, Json(payload): Json<CommentCreate>) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments(Extension(service): Extension<CommentService>) -> Result<Json<Vec<Comment>>, AppError> {
    Ok(Json(service.list().await?))
}

pub async fn list_blog_comments(Extension(service): Extension<CommentService>, Path(blog_id): Path<i64>) -> Result<Json<Vec<Comment>>, AppError> {
    Ok(Json(service.list_by_blog(blog_id).await?))
}

pub async fn get_comment(Extension(service): Extension<CommentService>, Path(id): Path<i64>) -> Result<Json<Comment>, AppError> {
    Ok(Json(service.find(id).await?))
}

pub async fn update_comment(Extension(service): Extension<CommentService>, Path(id): Path<i64>, Json(payload): Json<CommentUpdate>) -> Result<Json<Comment>, AppError> {
    Ok(Json(service.update(id, &payload.text).await?))
}

pub async fn delete_comment(Extension(service): Extension<CommentService>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
