use std::sync::Arc;

use tracing::{error, info};

use hyperchat::web::ws::ChatWsState;
use hyperchat::{ChatHub, Config, Database, MessagePipeline, SqliteMessageStore, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = hyperchat::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        hyperchat::logging::init_console_only(&config.logging.level);
    }

    info!("HyperChat starting");

    if let Err(e) = run(config).await {
        error!("HyperChat stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> hyperchat::Result<()> {
    let db = Database::open(&config.database.path).await?;
    info!("Database opened at {}", config.database.path);

    let hub = Arc::new(ChatHub::new());
    let store = Arc::new(SqliteMessageStore::new(db));
    let pipeline = MessagePipeline::from_config(&config.chat, hub.clone(), store)?;

    info!(
        admins = config.chat.admins.len(),
        special_users = config.chat.special_users.len(),
        max_message_length = config.chat.max_message_length,
        "Chat pipeline ready"
    );

    let state = ChatWsState::new(Arc::new(pipeline), hub);
    WebServer::new(&config.server, &config.web, state)?.run().await
}
