mod config;

use crate::config::{ParleyConfig, DISCORD_API_KEY_VAR, GOOGLE_API_KEY_VAR};
use clap::{Parser, Subcommand};
use parley_agent::LlmClient;
use parley_channels::{
    ChannelEvent, ChannelMessage, CommandDispatcher, DiscordChannel, TerminalChannel,
};
use parley_session::{ConversationSession, SharedSession};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parley", about = "Parley: a Gemini conversational relay")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "parley.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the model from this terminal
    Chat,
    /// Answer Discord messages read as JSON lines on stdin, replying over REST
    Discord,
    /// Print the resolved configuration with secrets masked
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    // A missing .env is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = ParleyConfig::load(&cli.config)?;
    config.apply_env(|name| std::env::var(name).ok());

    match cli.command {
        Commands::CheckConfig => {
            print!("{}", toml::to_string_pretty(&config.redacted())?);
        }
        Commands::Chat => {
            let session = start_session(&config).await?;
            let terminal = TerminalChannel::new(CommandDispatcher::new(session.clone(), None));

            tokio::select! {
                result = terminal.run_stdio() => result?,
                _ = tokio::signal::ctrl_c() => info!("Interrupted"),
            }

            close(&session).await;
        }
        Commands::Discord => {
            if config.discord.token.is_empty() {
                anyhow::bail!(
                    "No Discord bot token: set {DISCORD_API_KEY_VAR} or [discord].token in '{}'",
                    cli.config.display()
                );
            }
            let session = start_session(&config).await?;
            let dispatcher =
                CommandDispatcher::new(session.clone(), Some(config.discord.mention_prefix));
            let discord = DiscordChannel::new(config.discord.token);

            let (tx, rx) = mpsc::channel(64);
            let reader = tokio::spawn(forward_stdin(tx));
            info!("Discord relay ready");

            tokio::select! {
                _ = dispatcher.run(rx, &discord) => {}
                _ = tokio::signal::ctrl_c() => info!("Interrupted"),
            }

            reader.abort();
            close(&session).await;
        }
    }

    Ok(())
}

async fn start_session(config: &ParleyConfig) -> anyhow::Result<SharedSession> {
    if config.model.api_key.is_empty() {
        anyhow::bail!("No Gemini API key: set {GOOGLE_API_KEY_VAR} or [model].api_key");
    }

    let llm = Arc::new(LlmClient::new(config.model.clone()));
    let session = ConversationSession::start(llm, config.session.clone()).await?;
    info!(
        model = %config.model.model_id,
        history_file = %config.session.history_file.display(),
        "Session started"
    );
    Ok(SharedSession::new(session))
}

async fn close(session: &SharedSession) {
    match session.shutdown().await {
        Ok(()) => info!("Transcript flushed"),
        Err(e) => error!(error = %e, "Final transcript flush failed"),
    }
}

/// Feed one [`ChannelMessage`] per JSON line into `tx` until stdin closes.
async fn forward_stdin(tx: mpsc::Sender<ChannelEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let _ = tx.send(ChannelEvent::Connected("discord".into())).await;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Reading stdin failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ChannelMessage>(&line) {
            Ok(message) => {
                if tx.send(ChannelEvent::MessageReceived(message)).await.is_err() {
                    return;
                }
            }
            Err(e) => warn!(error = %e, "Skipping malformed event line"),
        }
    }

    let _ = tx.send(ChannelEvent::Disconnected("discord".into())).await;
}
