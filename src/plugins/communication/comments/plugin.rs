use axum::{Router, routing::get, routing::post, Extension};
use crate::kernel::Plugin;
use crate::plugins::communication::comments::handlers::*;
use crate::plugins::communication::comments::service::CommentService;

pub struct CommentsPlugin { pub service: CommentService }

impl CommentsPlugin {
    pub fn new(service: CommentService) -> Self { Self { service } }
}

#[async_trait::async_trait]
impl Plugin for CommentsPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_comment).get(list_comments))
            .route("/blog/:id", get(list_blog_comments))
            .route("/:id", get(get_comment).put(update_comment).delete(delete_comment))
            .layer(Extension(self.service.clone()))
    }

    fn name(&self) -> &'static str { "comments" }
}
