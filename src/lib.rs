pub mod api;
pub mod citations;
pub mod commands;
pub mod config;
pub mod logging;
pub mod repl;
pub mod store;

pub use api::{ApiError, Backend, FileUpload, HttpBackend};
pub use commands::ChatApp;
pub use config::ClientConfig;
pub use store::models::{DocId, Document, Role, Turn};

use repl::Repl;
use tokio::io::BufReader;

/// Connects to the backend at `config.base_url` and drives a chat session on stdin/stdout.
pub async fn run(config: ClientConfig) -> anyhow::Result<()> {
    let backend = HttpBackend::new(&config)?;
    let app = ChatApp::new(backend);

    if let Ok(health) = app.health().await {
        tracing::info!(base_url = %config.base_url, status = %health.status, "backend reachable");
    }
    // The first document becomes the selection; failures are logged inside.
    let _ = app.refresh().await;

    let repl = Repl::new(app);
    repl.run(BufReader::new(tokio::io::stdin()), &mut std::io::stdout())
        .await?;
    Ok(())
}
