use axum::{Router, routing::get, routing::post, Extension};
use crate::kernel::Plugin;
use crate::plugins::communication::blog::handlers::*;
use crate::plugins::communication::blog::service::BlogService;

pub struct BlogPlugin { pub service: BlogService }

impl BlogPlugin {
    pub fn new(service: BlogService) -> Self { Self { service } }
}

#[async_trait::async_trait]
impl Plugin for BlogPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_blog).get(list_blogs))
            .route("/published", get(list_published))
            .route("/author/:id", get(list_by_author))
            .route("/type/:topic", get(list_by_topic))
            .route("/votes", post(vote))
            .route("/:id", get(get_blog).put(update_blog).patch(block_blog).delete(delete_blog))
            .layer(Extension(self.service.clone()))
    }

    fn name(&self) -> &'static str { "blogs" }
}
