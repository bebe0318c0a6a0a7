use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "pdfqa_chat_lib=info,pdfqa_chat=info";

/// Installs the global fmt subscriber on stderr. `RUST_LOG` overrides the default filter.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
