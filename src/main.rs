use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod ai;
mod app;
mod cache;
mod config;
mod daily;
mod error;
mod models;
mod services;

use ai::{ModelConfig, QuoteClient};
use app::{App, QuoteStatus};
use cache::CacheStore;
use config::Config;
use models::{Artifact, Mode};
use services::{ConfigCredentialStore, CredentialStore, QuoteService};

const WRAP_WIDTH: usize = 72;
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Parser)]
#[command(name = "daily-quote", version, about = "One thoughtful quote per day")]
struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show today's quote, generating it if needed (default)
    Today {
        #[arg(long, value_enum)]
        mode: Option<Mode>,

        /// Extra guidance for the generator
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Forget the cached quote
    ClearCache,
    /// Manage the API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Save the default mode and guidance
    Prefs {
        #[arg(long, value_enum)]
        mode: Option<Mode>,

        #[arg(long)]
        prompt: Option<String>,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store an API key
    Set { key: String },
    /// Remove the stored API key
    Delete,
    /// Report whether an API key is configured
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging (only show warnings and errors by default)
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    let credentials: Arc<dyn CredentialStore> =
        Arc::new(ConfigCredentialStore::new(config_path.clone()));

    let command = cli.command.unwrap_or(Command::Today {
        mode: None,
        prompt: None,
    });

    match command {
        Command::Today { mode, prompt } => {
            let mode = mode.unwrap_or(config.mode);
            let prompt = prompt.unwrap_or_else(|| config.user_prompt.clone());
            let mut app = build_app(&config, credentials)?;
            show_today(&mut app, &prompt, mode).await;
        }
        Command::ClearCache => {
            let app = build_app(&config, credentials)?;
            app.clear_cache().await.context("Failed to clear the quote cache")?;
            println!("Cleared the cached quote");
        }
        Command::Key { action } => match action {
            KeyAction::Set { key } => {
                credentials.save_credential(&key)?;
                println!("API key saved to {:?}", config_path);
            }
            KeyAction::Delete => {
                credentials.delete_credential()?;
                println!("API key removed");
            }
            KeyAction::Status => {
                if credentials.has_credential() {
                    println!("API key configured");
                } else {
                    println!("No API key saved yet");
                }
            }
        },
        Command::Prefs { mode, prompt } => {
            if let Some(mode) = mode {
                config.mode = mode;
            }
            if let Some(prompt) = prompt {
                config.user_prompt = prompt.trim().to_string();
            }
            config.save_to(&config_path)?;
            let model = ModelConfig::for_mode(config.mode);
            println!("Mode: {} ({})", config.mode.display_name(), model.model);
            if config.user_prompt.is_empty() {
                println!("Guidance: (none)");
            } else {
                println!("Guidance: {}", config.user_prompt);
            }
        }
    }

    Ok(())
}

fn build_app(config: &Config, credentials: Arc<dyn CredentialStore>) -> anyhow::Result<App> {
    let client = QuoteClient::new(config.base_url()?, Arc::clone(&credentials));
    let service = QuoteService::new(
        CacheStore::new(&config.cache_dir),
        Arc::new(client),
        config.time_zone,
    );
    Ok(App::new(Arc::new(service), credentials))
}

async fn show_today(app: &mut App, prompt: &str, mode: Mode) {
    app.start_load(prompt, mode);

    // Ctrl-C cancels the load; nothing is cached afterwards
    if let Some(cancel) = app.cancel_handle() {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    if std::io::stderr().is_terminal() {
        let mut ticker = tokio::time::interval(Duration::from_millis(100));
        let mut frame = 0;
        while app.is_loading() {
            ticker.tick().await;
            eprint!("\r{} Writing today's quote...", SPINNER[frame % SPINNER.len()]);
            frame += 1;
            app.poll_result();
        }
        eprint!("\r\x1b[2K");
    } else {
        app.wait_result().await;
    }

    match &app.status {
        QuoteStatus::Loaded(artifact) => print_quote(artifact),
        QuoteStatus::Failed { message, .. } => eprintln!("{}", message),
        QuoteStatus::Idle | QuoteStatus::Loading => eprintln!("Cancelled"),
    }
}

fn print_quote(artifact: &Artifact) {
    println!();
    for line in textwrap::wrap(&format!("\u{201c}{}\u{201d}", artifact.quote), WRAP_WIDTH) {
        println!("  {}", line);
    }
    println!();
    for line in textwrap::wrap(&artifact.context, WRAP_WIDTH) {
        println!("  {}", line);
    }
    println!();
    println!("  {} \u{00b7} {}", artifact.day_key, artifact.mode.display_name());
}
