use clap::{Parser, Subcommand};
use std::sync::Arc;

use atbash_bot::application::errors::{BotError, ConfigError};
use atbash_bot::application::messaging::{Dispatcher, MessageParser};
use atbash_bot::domain::cipher::{fold_final_letters, transform};
use atbash_bot::domain::traits::Bot;
use atbash_bot::infrastructure::adapters::console::{self, ConsoleAdapter};
use atbash_bot::infrastructure::adapters::telegram::{polling, webhook, TelegramAdapter};
use atbash_bot::infrastructure::config::Config;
use atbash_bot::infrastructure::random::ThreadRandom;
use atbash_bot::infrastructure::storage::{MemoryGameStore, MemoryStatsStore};

#[derive(Parser)]
#[command(name = "atbash-bot")]
#[command(about = "Telegram bot for the Atbash cipher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot (webhook if a URL is configured, else polling)
    Run,
    /// Chat with the bot on stdin/stdout
    Console,
    /// Replace the registered webhook and print its info
    SetWebhook,
    /// Convert text once and print it
    Convert {
        /// Text to convert
        text: Vec<String>,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Version => {
            println!("atbash-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
        Commands::Convert { text } => {
            let config = load_config(&cli.config, cli.token);
            convert(&config, &text.join(" "))
        }
        Commands::Run => {
            let config = load_config(&cli.config, cli.token);
            block_on(run_telegram(config))
        }
        Commands::Console => {
            let config = load_config(&cli.config, cli.token);
            block_on(run_console(config))
        }
        Commands::SetWebhook => {
            let config = load_config(&cli.config, cli.token);
            block_on(set_webhook(config))
        }
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn block_on<F>(future: F) -> Result<(), BotError>
where
    F: std::future::Future<Output = Result<(), BotError>>,
{
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(future)
}

fn load_config(path: &str, token_override: Option<String>) -> Config {
    let mut config = if std::path::Path::new(path).exists() {
        match Config::load(path) {
            Ok(mut config) => {
                config.apply_env();
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Config::load_env()
            }
        }
    } else {
        Config::load_env()
    };

    if let Some(token) = token_override {
        config.telegram.token = Some(token);
    }

    config
}

fn build_dispatcher(config: &Config) -> Result<Dispatcher, ConfigError> {
    let table = config.cipher_table()?;
    Ok(Dispatcher::new(
        table,
        Arc::new(MemoryStatsStore::new()),
        Arc::new(MemoryGameStore::new()),
        Arc::new(ThreadRandom),
    )
    .with_final_letter_folding(config.cipher.fold_final_letters))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

async fn run_telegram(config: Config) -> Result<(), BotError> {
    config.validate()?;

    tracing::info!("Starting {}", config.bot.name);

    let dispatcher = Arc::new(build_dispatcher(&config)?);
    let parser = MessageParser::new(config.bot.prefix.clone());

    let mut bot = TelegramAdapter::new(config.token()?);
    if let Err(e) = bot.fetch_bot_info().await {
        tracing::warn!("Failed to fetch bot info: {}", e);
    }
    bot.start().await?;
    tracing::info!("Bot started: @{}", bot.bot_info().username);
    let bot = Arc::new(bot);

    let host = config.server.host.clone();
    let port = config.server.port;

    match config.webhook_endpoint() {
        Some(url) => {
            bot.set_webhook(
                &url,
                config.telegram.secret_token.as_deref(),
                config.telegram.drop_pending_updates,
            )
            .await?;

            let state = webhook::WebhookState::new(
                bot.clone(),
                dispatcher,
                parser,
                config.telegram.secret_token.clone(),
            );
            let app = webhook::router(state, &config.normalized_webhook_path());
            webhook::serve(&host, port, app, shutdown_signal()).await
        }
        None => {
            // getUpdates is refused while a webhook is registered
            bot.delete_webhook(false).await?;

            tokio::select! {
                _ = polling::run_polling(
                    bot.clone(),
                    dispatcher,
                    parser,
                    config.telegram.poll_timeout_seconds,
                ) => Ok(()),
                result = webhook::serve(&host, port, webhook::health_router(), shutdown_signal()) => result,
            }
        }
    }
}

async fn run_console(config: Config) -> Result<(), BotError> {
    let dispatcher = build_dispatcher(&config)?;
    let parser = MessageParser::new(config.bot.prefix.clone());
    let bot = ConsoleAdapter::new();
    console::run_console(&bot, &dispatcher, &parser).await
}

async fn set_webhook(config: Config) -> Result<(), BotError> {
    let url = config
        .webhook_endpoint()
        .ok_or_else(|| ConfigError::MissingField("telegram.webhook-url (or WEBHOOK_URL)".to_string()))?;
    let bot = TelegramAdapter::new(config.token()?);

    bot.delete_webhook(config.telegram.drop_pending_updates).await?;
    bot.set_webhook(
        &url,
        config.telegram.secret_token.as_deref(),
        config.telegram.drop_pending_updates,
    )
    .await?;

    let info = bot.get_webhook_info().await?;
    let json = serde_json::to_string_pretty(&info)
        .map_err(|e| BotError::Parse(e.to_string()))?;
    println!("Current webhook info:\n{}", json);

    if info.url == url {
        println!("\nWebhook set successfully!");
        Ok(())
    } else {
        Err(BotError::Api(format!("Webhook is {}, expected {}", info.url, url)))
    }
}

fn convert(config: &Config, text: &str) -> Result<(), BotError> {
    let table = config.cipher_table()?;
    let converted = if config.cipher.fold_final_letters {
        transform(&table, &fold_final_letters(text))
    } else {
        transform(&table, text)
    };
    println!("{}", converted);
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let config = Config::default();
    let yaml = config.to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
