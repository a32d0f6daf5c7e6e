use transopt::{init_logging, start_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Engine log records, filtered by RUST_LOG
    init_logging();

    // Address and default backend from TRANSOPT_ADDRESS / TRANSOPT_BACKEND
    let config = ServerConfig::from_env()?;

    // Configure and start server
    start_server(config).await?;

    Ok(())
}
