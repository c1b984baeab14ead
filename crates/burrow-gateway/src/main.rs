use anyhow::Context;
use burrow_core::MappingStore;
use burrow_gateway::app::App;
use burrow_gateway::cli::{StoreBackendArg, CLI};
use burrow_gateway::state::AppState;
use burrow_service::{FormatConfig, ResolverService, ShortenerService, UrlFormatter};
use burrow_store::{InMemoryStore, MySqlStore};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = CLI::try_parse()?;

    info!(
        listen_addr = %config.listen_addr,
        store_backend = %config.store,
        speaking_urls = config.create_speaking_urls,
        "starting burrow gateway"
    );

    let format = FormatConfig::builder()
        .site_base_url(config.site_base_url.clone())
        .redirect_param_name(config.redirect_param.clone())
        .create_speaking_urls(config.create_speaking_urls)
        .speaking_url_template(config.speaking_url_template.clone())
        .build();

    match config.store {
        StoreBackendArg::InMemory => {
            run_server(config.listen_addr, InMemoryStore::new(), format).await
        }
        StoreBackendArg::Mysql => {
            let dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when the store backend is mysql")?;
            let store = MySqlStore::connect(dsn).await?;
            run_server(config.listen_addr, store, format).await
        }
    }
}

async fn run_server<S: MappingStore>(
    listen_addr: SocketAddr,
    store: S,
    format: FormatConfig,
) -> anyhow::Result<()> {
    let store = Arc::new(store);
    let state = AppState::new(
        Arc::new(ShortenerService::shared(Arc::clone(&store))),
        Arc::new(ResolverService::shared(store)),
        UrlFormatter::new(format),
    );

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state)).await?;
    Ok(())
}
