use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use english_helper::application::upload_service::UploadService;
use english_helper::config::{Cli, Command, Settings};
use english_helper::infrastructure::axum_handler::{router, AppState};
use english_helper::infrastructure::file_storage::LocalFileStorage;
use english_helper::infrastructure::image_scaler::DefaultImageScaler;
use english_helper::infrastructure::process_image_client::ReqwestProcessImageClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.settings.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let upload_service = Arc::new(build_upload_service(&cli.settings)?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&cli.settings, upload_service).await,
        Command::Scale { input, output } => scale_file(&upload_service, &input, &output).await,
        Command::Submit { input } => submit_file(&upload_service, &input).await,
    }
}

fn build_upload_service(settings: &Settings) -> anyhow::Result<UploadService> {
    let scale_config = settings
        .scale_config()
        .context("invalid scale settings")?;
    let client = ReqwestProcessImageClient::new(&settings.api_url, settings.request_timeout())
        .context("failed to build HTTP client")?;
    tracing::info!(
        endpoint = %client.endpoint(),
        max_width = scale_config.bounding_box.max_width(),
        max_height = scale_config.bounding_box.max_height(),
        quality = scale_config.quality.value(),
        "upload service configured"
    );

    Ok(UploadService::new(
        Arc::new(DefaultImageScaler::new()),
        Arc::new(client),
        scale_config,
    ))
}

async fn serve(settings: &Settings, upload_service: Arc<UploadService>) -> anyhow::Result<()> {
    let addr: SocketAddr = settings
        .bind_address
        .parse()
        .with_context(|| format!("invalid bind address {}", settings.bind_address))?;
    let state = Arc::new(AppState { upload_service });
    let app = router(state, settings.max_upload_bytes, settings.static_dir.clone());

    tracing::info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn scale_file(upload_service: &UploadService, input: &Path, output: &Path) -> anyhow::Result<()> {
    let storage = LocalFileStorage::new();
    let source = storage
        .read_source_image(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;
    let scaled = upload_service.scale_image(source).await?;
    storage
        .save_scaled_image(output, &scaled)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(
        output = %output.display(),
        width = scaled.width,
        height = scaled.height,
        bytes = scaled.data.len(),
        "wrote scaled image"
    );
    Ok(())
}

async fn submit_file(upload_service: &UploadService, input: &Path) -> anyhow::Result<()> {
    let source = LocalFileStorage::new()
        .read_source_image(input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;
    // 選択時に縮小し、縮小済みの画像を送る
    let scaled = upload_service.scale_image(source).await?;
    let analysis = upload_service.submit_scaled(&scaled).await?;
    println!("{}", analysis);
    Ok(())
}
