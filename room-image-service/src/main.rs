use room_image_service::config::RoomImageConfig;
use room_image_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = RoomImageConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "room-image-service",
        &config.logging.level,
        config.logging.dir.as_deref(),
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    app.run_until_stopped().await?;

    Ok(())
}
