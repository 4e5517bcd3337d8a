use axum::extract::{MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use axum::{routing::get, Router};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Instant;

use crate::plugins::communication::blog::ledger::LedgerChange;
use crate::plugins::communication::blog::models::{BlogStatus, VoteType};

#[derive(Clone)]
pub struct MetricsPlugin {
    registry: Arc<Registry>,
    pub request_counter: Arc<IntCounterVec>,
    pub request_duration: Arc<HistogramVec>,
    pub votes: Arc<IntCounterVec>,
    pub status_transitions: Arc<IntCounterVec>,
}

impl MetricsPlugin {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let counter = IntCounterVec::new(Opts::new("requests_total", "Total HTTP requests"), &["method", "path", "status"])?;
        registry.register(Box::new(counter.clone()))?;

        let hist_opts = HistogramOpts::new("request_duration_seconds", "HTTP request latencies in seconds");
        let histogram = HistogramVec::new(hist_opts, &["method", "path"])?;
        registry.register(Box::new(histogram.clone()))?;

        let votes = IntCounterVec::new(Opts::new("votes_total", "Votes received, by type and ledger outcome"), &["vote_type", "outcome"])?;
        registry.register(Box::new(votes.clone()))?;

        let transitions = IntCounterVec::new(Opts::new("blog_status_transitions_total", "Blog status changes"), &["from", "to"])?;
        registry.register(Box::new(transitions.clone()))?;

        // process metrics are only collected on Linux
        #[cfg(target_os = "linux")]
        {
            let collector = prometheus::process_collector::ProcessCollector::for_self();
            registry.register(Box::new(collector)).ok();
        }

        Ok(MetricsPlugin {
            registry: Arc::new(registry),
            request_counter: Arc::new(counter),
            request_duration: Arc::new(histogram),
            votes: Arc::new(votes),
            status_transitions: Arc::new(transitions),
        })
    }

    pub fn record_vote(&self, vote_type: VoteType, outcome: LedgerChange) {
        self.votes.with_label_values(&[vote_type.as_str(), outcome.as_label()]).inc();
    }

    pub fn record_status_transition(&self, from: BlogStatus, to: BlogStatus) {
        self.status_transitions.with_label_values(&[from.as_str(), to.as_str()]).inc();
    }

    pub fn render(&self) -> Result<String, String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer).map_err(|e| e.to_string())?;
        String::from_utf8(buffer).map_err(|e| e.to_string())
    }

    pub fn router(&self) -> Router {
        let metrics = self.clone();
        Router::new().route("/", get(move || async move {
            match metrics.render() {
                Ok(body) => (StatusCode::OK, body),
                Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e),
            }
        }))
    }
}

/// Counts and times every request. The path label is the matched route template,
/// falling back to the mount point of the plugin.
pub async fn track_requests(State((metrics, mount)): State<(MetricsPlugin, &'static str)>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.extensions().get::<MatchedPath>().map(|p| p.as_str().to_string()).unwrap_or_else(|| mount.to_string());
    let started = Instant::now();

    let response = next.run(req).await;

    metrics.request_duration.with_label_values(&[method.as_str(), path.as_str()]).observe(started.elapsed().as_secs_f64());
    metrics.request_counter.with_label_values(&[method.as_str(), path.as_str(), response.status().as_str()]).inc();
    response
}
