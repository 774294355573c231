use clap::{Parser, Subcommand};
use std::sync::Arc;

use glyph_bot::application::errors::CommandError;
use glyph_bot::application::messaging::MessageParser;
use glyph_bot::application::services::{Action, CommandService, LifecycleManager};
use glyph_bot::cogs::{self, CogContext, CogHost};
use glyph_bot::domain::entities::{Content, Embed, Message};
use glyph_bot::domain::traits::Bot;
use glyph_bot::infrastructure::adapters::console::ConsoleAdapter;
use glyph_bot::infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "glyph-bot")]
#[command(about = "An emoji and asset preview bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
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

    match cli.command {
        Commands::Run => {
            run_bot(cli.config);
        }
        Commands::Version => {
            println!("glyph-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config(cli.config);
        }
    }
}

fn run_bot(config_path: String) {
    // Load config
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting glyph-bot: {}", config.bot.name);
    let bot_name = config.bot.name.clone();
    let prefix = config.bot.prefix.clone();
    let autoload = config.extensions.autoload.clone();

    // Wire the extension system: context -> host -> manager, then publish
    // the manager back into the context for the management cog.
    let ctx = match CogContext::new(config) {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            tracing::error!("Failed to initialize: {}", e);
            return;
        }
    };
    let host = Arc::new(CogHost::new(ctx.clone()));
    let manager = Arc::new(LifecycleManager::new(
        host.clone(),
        cogs::known_units().clone(),
        cogs::unload_denylist().clone(),
        cogs::root_depth(),
    ));
    ctx.set_manager(manager.clone());

    // Built-in commands
    let mut commands = CommandService::new(&prefix);
    commands.register_defaults();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let report = manager.apply_batch(Action::Load, &autoload).await;
        if report.failed() {
            tracing::warn!("{}", report.message);
        }
        tracing::info!(
            "Extension system initialized with {} / {} extensions loaded",
            report.success_count(),
            report.total
        );

        let bot = ConsoleAdapter::new(bot_name);
        run_console_bot(bot, host, commands, prefix).await;
    });
}

async fn run_console_bot(
    bot: ConsoleAdapter,
    host: Arc<CogHost>,
    commands: CommandService,
    prefix: String,
) {
    if let Err(e) = bot.start().await {
        tracing::error!("Failed to start bot: {}", e);
        return;
    }

    let parser = MessageParser::new(prefix);
    let chat_id = "console";

    loop {
        let Some(line) = bot.read_line("> ").await else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let message = parser.parse(chat_id, line, None);
        if let Some(response) = dispatch(&message, &host, &commands).await {
            if let Err(e) = bot.send_message(chat_id, &response).await {
                tracing::error!("Failed to send message: {}", e);
            }
        }
    }
}

async fn dispatch(
    message: &Message,
    host: &Arc<CogHost>,
    commands: &CommandService,
) -> Option<String> {
    let Content::Command { name, .. } = &message.content else {
        return Some("Type /help for a list of commands.".to_string());
    };

    // Loaded cogs take priority over built-ins.
    if let Some(cog) = host.cog_for_command(name) {
        let text = match cog.handle(message).await {
            Ok(reply) => reply.to_text(),
            Err(CommandError::InvalidArgs(detail)) => Embed::error(detail).to_text(),
            Err(e) => Embed::error(e.to_string()).to_text(),
        };
        return Some(text);
    }

    match commands.handle(message) {
        Ok(response) => response,
        Err(e) => Some(format!("Error: {}", e)),
    }
}

fn init_config(path: String) {
    let config = Config::default();
    match config.save(&path) {
        Ok(()) => println!("Wrote default config to {}", path),
        Err(e) => eprintln!("Failed to write config: {}", e),
    }
}
