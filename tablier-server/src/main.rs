use tablier_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment first: .env is optional, real env vars win
    dotenv::dotenv().ok();

    let config = Config::from_env();

    let log_dir = std::path::Path::new(&config.work_dir).join("logs");
    std::fs::create_dir_all(&log_dir)?;
    init_logger_with_file(Some("info"), Some(&log_dir.to_string_lossy()));

    tracing::info!("tablier-server starting ({})", config.environment);

    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    Ok(())
}
