use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shopcalc::bot::{self, BotServices};
use shopcalc::config::AppConfig;
use shopcalc::dialogue::CalcDialogueState;
use shopcalc::localization::init_localization_from;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!("Starting shopping calculator bot");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    info!(locales_dir = %config.locales_dir, "Loading translations");
    init_localization_from(&config.locales_dir)?;

    info!(
        rate_api = %config.rate.api_base,
        analytics_enabled = config.analytics.webhook_url.is_some(),
        assistant_enabled = config.assistant.api_key.is_some(),
        "Configuration loaded"
    );

    // Initialize the bot
    let bot = Bot::new(config.bot_token.clone());
    let services = Arc::new(BotServices::new(config)?);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .enter_dialogue::<Message, InMemStorage<CalcDialogueState>, CalcDialogueState>()
                .endpoint(bot::message_handler),
        )
        .branch(
            Update::filter_callback_query()
                .enter_dialogue::<CallbackQuery, InMemStorage<CalcDialogueState>, CalcDialogueState>()
                .endpoint(bot::callback_handler),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<CalcDialogueState>::new(), services])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
