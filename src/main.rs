use roster::config::{AppConfig, init_tracing};
use roster::lifecycle::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    tracing::info!("Starting roster...");

    let app = Application::builder().config(config).build().await?;

    let listener = tokio::net::TcpListener::bind(app.config().bind_address()).await?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);

    app.serve(listener).await?;

    tracing::info!("Server stopped");
    Ok(())
}
