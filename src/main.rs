mod bot;
mod config;
mod telegram_log;

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

use bot::{AdminRegistry, BotEngine, Database, InboundMessage, SystemClock, TelegramClient};
use config::Config;

type Engine = BotEngine<TelegramClient>;

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "promptdesk.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.telegram_bot_token);
    let telegram = Arc::new(TelegramClient::new(bot.clone()));

    // Setup logging
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("promptdesk.log"))
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file: {e}");
            std::process::exit(1);
        }
    };
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    let registry = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        );

    if let Some(log_chat_id) = config.log_chat_id {
        let chat_layer = telegram_log::ChatLogLayer::new(telegram.clone(), log_chat_id);
        registry.with(chat_layer).init();
    } else {
        registry.init();
    }

    info!("🚀 Starting promptdesk...");
    info!("Loaded config from {config_path}");

    let database = match Database::open(&config.database_path()) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    let admins = match AdminRegistry::load_or_seed(database.as_ref(), config.seed_admin_id) {
        Ok(admins) => admins,
        Err(e) => {
            error!("Failed to load admin registry: {e}");
            std::process::exit(1);
        }
    };
    info!("Admin registry: {} operator(s)", admins.len());

    let engine: Arc<Engine> = Arc::new(BotEngine::new(
        database,
        Arc::new(SystemClock),
        Arc::new(admins),
        telegram,
    ));

    let handler = Update::filter_message().endpoint(handle_new_message);

    // The default distribution key is the chat, so each conversation's
    // messages are handled one at a time.
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![engine])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_new_message(msg: Message, engine: Arc<Engine>) -> ResponseResult<()> {
    let Some(inbound) = telegram_to_inbound(&msg) else {
        return Ok(());
    };
    engine.handle_message(inbound).await;
    Ok(())
}

/// Text messages with a sender; everything else is ignored.
fn telegram_to_inbound(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?;
    let user = msg.from.as_ref()?;
    let display_name = user
        .username
        .clone()
        .unwrap_or_else(|| user.first_name.clone());

    Some(InboundMessage {
        conversation_id: msg.chat.id.0,
        author_id: user.id.0 as i64,
        author_display_name: Some(display_name),
        source_message_id: msg.id.0 as i64,
        text: text.to_string(),
    })
}
