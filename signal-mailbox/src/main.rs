use anyhow::Context;
use signal_mailbox::{MailboxConfig, SignalMailbox};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Signal Mailbox - shared mailbox for trading signals

USAGE:
    signal-mailbox [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                Server host (default: 0.0.0.0)
    PORT                Server port (default: 5000)
    SIGNALS_FILE        Persisted signals file (default: signals.json)
    RUST_LOG            Log level filter

EXAMPLES:
    # Run with defaults
    signal-mailbox

    # Run with config file
    signal-mailbox --config mailbox.json

    # Run with custom port
    PORT=9000 signal-mailbox
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signal_mailbox=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let base = if let Some(path) = config_path {
        tracing::info!("Loading configuration from: {}", path);
        MailboxConfig::from_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?
    } else {
        MailboxConfig::default()
    };
    let config = base.with_env_overrides(|key| std::env::var(key).ok());

    tracing::info!("Starting Signal Mailbox");
    tracing::info!("Signals file: {}", config.signals_file.display());

    let mailbox = SignalMailbox::new(config).await;
    tracing::info!("Active signals: {}", mailbox.registry.len().await);
    tracing::info!("Available endpoints:");
    tracing::info!("  POST /send-signal");
    tracing::info!("  GET  /get-signals");

    mailbox.run().await.context("serving signal mailbox")
}
