use clap::Parser;
use pdfqa_chat_lib::{config::ClientConfig, logging};

/// Chat with documents held by a PDF question-answering service.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Backend base URL (overrides PDFQA_API_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = args.base_url {
        config = config.with_base_url(&url)?;
    }

    pdfqa_chat_lib::run(config).await
}
