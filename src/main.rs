//! Courier entry point. Loads config, wires the channel, the 2FA gate and
//! the assistant provider together, and runs the gateway loop.

mod commands;
mod gateway;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use courier_auth::{SmtpCodeSender, TwoFactorGate};
use courier_channels::notifier::RequestMirror;
use courier_channels::telegram::TelegramChannel;
use courier_core::config::{self, shellexpand, AgentRegistry, Config};
use courier_core::traits::{CodeSender, Provider};
use courier_providers::{ClaudeCodeProvider, ShellRunner};
use courier_sessions::SessionStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::gateway::Gateway;

#[derive(Parser)]
#[command(name = "courier", about = "Telegram bridge to a local CLI assistant", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bridge
    Start,
    /// Show configuration and provider availability
    Status,
    /// Arm the gate and email a code once (delivery smoke test)
    SendCode,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load(&cli.config)?;
    init_tracing(&config.courier.log_level);

    match cli.command {
        Commands::Start => start(&cli.config, config).await,
        Commands::Status => status(&cli.config, &config).await,
        Commands::SendCode => send_code(&config).await,
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

async fn start(config_path: &str, config: Config) -> anyhow::Result<()> {
    if config.telegram.bot_token.is_empty() {
        bail!("telegram.bot_token is not set — edit {config_path}");
    }
    if config.telegram.allowed_chat_id == 0 {
        bail!("telegram.allowed_chat_id is not set — the bridge serves exactly one chat");
    }

    let mailer = SmtpCodeSender::new(&config.mail);
    if !mailer.is_configured() {
        warn!("mail credentials are not configured — 2FA codes cannot be delivered");
    }

    let data_dir = PathBuf::from(shellexpand(&config.courier.data_dir));
    let workspace = PathBuf::from(shellexpand(&config.claude.working_dir));

    let channel = Arc::new(TelegramChannel::new(config.telegram.clone()));
    let provider = Arc::new(ClaudeCodeProvider::from_config(
        config.claude.timeout_secs,
        workspace.clone(),
    ));
    let shell = ShellRunner::new(config.shell.timeout_secs, workspace);
    let sessions = SessionStore::open(data_dir.join("sessions.json"));
    let registry = AgentRegistry::new(config.agents.clone());
    let mirror = RequestMirror::new(&config.notifier);

    info!(
        "starting courier: chat {} | {} agent(s) | data dir {}",
        config.telegram.allowed_chat_id,
        registry.len().max(1),
        data_dir.display()
    );

    let gateway = Arc::new(Gateway::new(
        channel,
        provider,
        shell,
        Arc::new(mailer),
        sessions,
        registry,
        mirror,
        &config,
    ));
    gateway.run().await
}

async fn status(config_path: &str, config: &Config) -> anyhow::Result<()> {
    let registry = AgentRegistry::new(config.agents.clone());
    let mailer = SmtpCodeSender::new(&config.mail);
    let mirror = RequestMirror::new(&config.notifier);
    let provider = ClaudeCodeProvider::from_config(
        config.claude.timeout_secs,
        PathBuf::from(shellexpand(&config.claude.working_dir)),
    );

    println!("Courier configuration ({config_path})");
    println!("  data dir:      {}", shellexpand(&config.courier.data_dir));
    println!("  telegram chat: {}", display_or_unset(config.telegram.allowed_chat_id));
    println!(
        "  smtp:          {}:{} ({})",
        config.mail.smtp_host,
        config.mail.smtp_port,
        if mailer.is_configured() { "configured" } else { "no credentials" }
    );
    println!("  workspace:     {}", shellexpand(&config.claude.working_dir));
    println!("  claude timeout: {}s", config.claude.timeout_secs);
    println!("  shell timeout:  {}s", config.shell.timeout_secs);
    println!(
        "  agents:        {} configured, default '{}'",
        registry.len(),
        registry.default_id()
    );
    println!(
        "  audit mirror:  {}",
        if mirror.is_enabled() { "enabled" } else { "disabled" }
    );
    println!(
        "  claude CLI:    {}",
        if provider.is_available().await { "available" } else { "NOT FOUND" }
    );
    Ok(())
}

async fn send_code(config: &Config) -> anyhow::Result<()> {
    let mailer = SmtpCodeSender::new(&config.mail);
    if !mailer.is_configured() {
        bail!("mail credentials are not configured — set [mail] username and password");
    }

    let mut gate = TwoFactorGate::new();
    let code = gate.arm();
    mailer.send_code(&code).await?;
    println!("2FA code emailed — it is valid for 10 minutes.");
    Ok(())
}

fn display_or_unset(id: i64) -> String {
    if id == 0 {
        "(unset)".to_string()
    } else {
        id.to_string()
    }
}
