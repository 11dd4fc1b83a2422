use gateway::{
    config::get_configuration,
    logging::setup_logging,
    router,
    startup::{build_pipeline, verify_datasets},
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_configuration()?;
    let _telemetry = setup_logging(&config, "food-gateway")?;

    tracing::info!(
        environment = config.environment.as_str(),
        model = %config.model.url,
        "Food classifier gateway starting"
    );

    let pipeline = Arc::new(build_pipeline(&config)?);

    if config.verify_datasets_on_startup {
        verify_datasets(pipeline.as_ref()).await?;
    }

    // Load the model in the background; early requests wait on the same load
    let warm = Arc::clone(&pipeline);
    tokio::spawn(async move {
        if let Err(e) = warm.warm_up().await {
            tracing::error!(error = %e, "Model warm-up failed; /predict will return 503");
        }
    });

    let app = router(pipeline, config.max_upload_bytes);

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
