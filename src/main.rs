//! warble - a roster-tracking chat bot.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use warble::auth::HttpAuthClient;
use warble::collab::{LogSink, TracingChatLog};
use warble::config::Config;
use warble::handler::{Handler, HandlerParams};
use warble::net::{self, ChannelOutbound};
use warble::settings::JsonSettings;

// Outbound lines buffer briefly while the writer drains; the protocol is
// low-volume, so a small bound suffices.
const OUTBOUND_CHANNEL_SIZE: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        username = %config.identity.username,
        server = %config.server.host,
        rooms = config.rooms.len(),
        "Starting warble"
    );

    let settings = Arc::new(JsonSettings::open(&config.settings_path)?);

    let (tx, rx) = mpsc::channel::<String>(OUTBOUND_CHANNEL_SIZE);
    let outbound = Arc::new(ChannelOutbound::new(tx));

    let server = config.server.clone();
    let mut handler = Handler::new(HandlerParams {
        config,
        auth: Arc::new(HttpAuthClient::new()),
        command_sink: Arc::new(LogSink),
        chat_log: Arc::new(TracingChatLog),
        settings,
        outbound,
    });

    net::run(&server, &mut handler, rx).await?;

    Ok(())
}
