use anyhow::Context;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use swagger_versioning::api::{self, swagger_main};
use swagger_versioning::file_system::application_base_path;
use swagger_versioning::{app_env, logging};
use tokio::net::TcpListener;
use tracing::info;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let otel_exporters = match (
        env::var(app_env::OTEL_SPAN_EXPORT_URL),
        env::var(app_env::OTEL_METRIC_EXPORT_URL),
    ) {
        (Ok(span_url), Ok(metric_url)) => Some(logging::init_exporters(&span_url, &metric_url)?),
        _ => None,
    };
    logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters);

    let base_path = match env::var(app_env::DOCS_BASE_PATH) {
        Ok(path) => PathBuf::from(path),
        Err(_) => application_base_path().context("could not locate the running executable")?,
    };
    let docs = swagger_main::build_documentation(base_path)?;
    let app = logging::attach_tracing_http(api::api_routes().merge(docs));

    let listen_addr = env::var(app_env::LISTEN_ADDR).unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_owned());
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("could not bind to {listen_addr}"))?;

    info!("Starting server on {listen_addr}.");
    axum::serve(listener, app).await?;

    Ok(())
}
