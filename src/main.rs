use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use travelblog_api_kernel::config::{Settings, StoreKind};
use travelblog_api_kernel::kernel::{build_app, Plugin};
use travelblog_api_kernel::plugins::metrics::MetricsPlugin;
use travelblog_api_kernel::store::{DynStore, InMemoryStore, PgStore};
use travelblog_api_kernel::{db, standard_plugins};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("travelblog_api_kernel=info,tower_http=info")))
        .init();

    let settings = Settings::from_env()?;

    let store: DynStore = match settings.store {
        StoreKind::Postgres => {
            let pool = db::init_db(&settings.database_url, settings.db_max_connections).await?;
            PgStore::new(pool).into_arc()
        }
        StoreKind::Memory => {
            tracing::warn!("running on the in-memory store; data is lost on exit");
            InMemoryStore::new().into_arc()
        }
    };

    let metrics_plugin = MetricsPlugin::new()?;
    let plugins_vec: Vec<Box<dyn Plugin>> = standard_plugins(store, Some(metrics_plugin.clone()));

    let plugin_names: Vec<&'static str> = plugins_vec.iter().map(|p| p.name()).collect();
    tracing::info!("mounting plugins: {:?}", plugin_names);

    let mut app: Router = build_app(&plugins_vec, Some(metrics_plugin.clone())).await;

    // not instrumented, scrapes would count themselves
    app = app.nest("/metrics", metrics_plugin.router());

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            for p in plugins_vec.iter() {
                p.on_shutdown().await;
            }
        })
        .await?;

    Ok(())
}
