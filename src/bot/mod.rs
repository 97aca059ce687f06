//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Handles commands, menu buttons and wizard answers
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats result messages
//! - `dialogue_manager`: Drives the calculator wizards

pub mod callback_handler;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

use crate::analytics::AnalyticsClient;
use crate::assistant::DealAssistant;
use crate::config::AppConfig;
use crate::errors::RateError;
use crate::rates::{NbuClient, RateFetcher};

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

// Re-export utility functions that might be used elsewhere
pub use dialogue_manager::{unit_price_message, wizard_result_message};
pub use message_handler::{help_message, parse_quick_unit_price, welcome_message, QuickUnitPrice};
pub use ui_builder::{
    create_main_menu_keyboard, create_unit_keyboard, parse_command, recognize_action, MenuAction,
};

/// Shared collaborators injected into every handler
pub struct BotServices {
    pub config: AppConfig,
    pub rates: RateFetcher<NbuClient>,
    pub analytics: AnalyticsClient,
    pub assistant: DealAssistant,
}

impl BotServices {
    pub fn new(config: AppConfig) -> Result<Self, RateError> {
        let rates = RateFetcher::new(NbuClient::new(&config.rate)?);
        let analytics = AnalyticsClient::new(&config.analytics);
        let assistant = DealAssistant::new(config.assistant.clone());
        Ok(Self {
            config,
            rates,
            analytics,
            assistant,
        })
    }
}
