use crate::kernel::Plugin;
use axum::{Extension, Json, Router, routing::get};
use serde::Serialize;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    store: &'static str,
}

/// Liveness check; also reports which store backend the process runs on.
pub struct HealthPlugin {
    backend: &'static str,
}

impl HealthPlugin {
    pub fn new(backend: &'static str) -> Self {
        Self { backend }
    }
}

async fn health_handler(Extension(backend): Extension<&'static str>) -> Json<Health> {
    Json(Health { status: "ok", store: backend })
}

#[async_trait::async_trait]
impl Plugin for HealthPlugin {
    async fn router(&self) -> Router {
        Router::new().route("/", get(health_handler)).layer(Extension(self.backend))
    }

    fn name(&self) -> &'static str {
        "health"
    }

    async fn on_start(&self) {
        tracing::info!(store = self.backend, "health plugin started");
    }
}
