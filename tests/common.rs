#![allow(dead_code)]

use std::process::Command;
use tokio::net::TcpListener;
use travelblog_api_kernel::kernel::build_app;
use travelblog_api_kernel::plugins::metrics::MetricsPlugin;
use travelblog_api_kernel::store::{DynStore, InMemoryStore};
use travelblog_api_kernel::{db, standard_plugins};

pub struct TestDbGuard {
    maintenance_url: String,
    unique_db: String,
}

impl TestDbGuard {
    pub fn new(maintenance_url: String, unique_db: String) -> Self {
        Self { maintenance_url, unique_db }
    }
}

impl Drop for TestDbGuard {
    fn drop(&mut self) {
        let _ = Command::new("psql")
            .arg(&self.maintenance_url)
            .arg("-c")
            .arg(format!(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}' AND pid <> pg_backend_pid();",
                self.unique_db
            ))
            .status();
        let _ = Command::new("psql")
            .arg(&self.maintenance_url)
            .arg("-c")
            .arg(format!("DROP DATABASE IF EXISTS \"{}\"", self.unique_db))
            .status();
    }
}

/// `None` when no test database is configured; Postgres tests skip themselves then.
pub fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok().filter(|s| !s.is_empty())
}

pub async fn create_test_db_and_pool(test_db: &str) -> anyhow::Result<(sqlx::PgPool, TestDbGuard)> {
    let mut maintenance_url = test_db.to_string();
    if let Some(idx) = maintenance_url.rfind('/') {
        maintenance_url.replace_range(idx + 1.., "postgres");
    }
    let base_db_name = test_db.rsplit('/').next().unwrap().split('?').next().unwrap();
    let unique_db = format!("{}_{}", base_db_name, uuid::Uuid::new_v4().to_string().replace('-', ""));
    let mut unique_db_url = test_db.to_string();
    if let Some(idx) = unique_db_url.rfind('/') {
        unique_db_url.replace_range(idx + 1.., &unique_db);
    }
    let _ = Command::new("psql").arg(&maintenance_url).arg("-c").arg(format!("DROP DATABASE IF EXISTS \"{}\"", unique_db)).status();
    let _ = Command::new("psql").arg(&maintenance_url).arg("-c").arg(format!("CREATE DATABASE \"{}\"", unique_db)).status();
    let guard = TestDbGuard::new(maintenance_url.clone(), unique_db.clone());
    let pool = db::init_db(&unique_db_url, 10).await?;
    Ok((pool, guard))
}

pub async fn spawn_app(store: DynStore, metrics: Option<MetricsPlugin>) -> anyhow::Result<(String, tokio::task::JoinHandle<()>)> {
    let plugins = standard_plugins(store, metrics.clone());
    let mut app = build_app(&plugins, metrics.clone()).await;
    if let Some(m) = metrics {
        app = app.nest("/metrics", m.router());
    }
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });
    Ok((format!("http://{}", addr), server_handle))
}

pub async fn spawn_memory_app() -> anyhow::Result<(String, tokio::task::JoinHandle<()>)> {
    spawn_app(InMemoryStore::new().into_arc(), None).await
}
