//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::debug;

// Import localization
use crate::localization::t_lang;

// Import calculator types
use crate::calculator::UnitKind;

// Import dialogue types
use crate::dialogue::{parse_answer, CalcDialogue, CalcDialogueState};

use crate::platform::TelegramUser;

// Import dialogue manager functions
use super::dialogue_manager::{
    handle_assistant_query_input, handle_currency_amount_input, handle_currency_code_input,
    handle_unit_input, handle_wizard_input, start_flow, unit_price_message,
};

// Import UI builder functions
use super::ui_builder::{create_main_menu_keyboard, recognize_action, MenuAction};
use super::BotServices;

lazy_static! {
    /// "<price> <weight>[unit]", e.g. "50 200", "50 200g", "120 1,5 kg"
    static ref QUICK_UNIT_PRICE: Regex = Regex::new(
        r"(?i)^\s*(\d+(?:[.,]\d+)?)\s+(\d+(?:[.,]\d+)?)\s*(g|gr|kg|ml|l|г|гр|кг|мл|л)?\.?\s*$"
    )
    .expect("Quick unit price pattern should be valid");
}

/// Parsed quick unit price message
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickUnitPrice {
    pub price: f64,
    pub weight: f64,
    pub unit: UnitKind,
    /// No unit was typed and grams were assumed
    pub assumed_unit: bool,
}

/// Parse a "price weight" shortcut message
///
/// A missing unit means grams. Zero weight is not a request.
pub fn parse_quick_unit_price(text: &str) -> Option<QuickUnitPrice> {
    let captures = QUICK_UNIT_PRICE.captures(text)?;
    let price = parse_answer(captures.get(1)?.as_str())?;
    let weight = parse_answer(captures.get(2)?.as_str())?;
    if weight <= 0.0 {
        return None;
    }
    let (unit, assumed_unit) = match captures.get(3) {
        Some(unit) => (UnitKind::parse(unit.as_str())?, false),
        None => (UnitKind::Gram, true),
    };
    Some(QuickUnitPrice {
        price,
        weight,
        unit,
        assumed_unit,
    })
}

/// Welcome text shown on /start
pub fn welcome_message(language_code: Option<&str>) -> String {
    format!(
        "👋 {}\n\n{}",
        t_lang("welcome-title", language_code),
        t_lang("welcome-choose", language_code)
    )
}

/// Help text shown on /help
pub fn help_message(language_code: Option<&str>) -> String {
    [
        "help-title",
        "help-description",
        "help-commands",
        "help-quick",
        "help-cancel",
    ]
    .iter()
    .map(|key| t_lang(key, language_code))
    .collect::<Vec<_>>()
    .join("\n\n")
}

async fn handle_action(
    bot: &Bot,
    msg: &Message,
    dialogue: CalcDialogue,
    services: &BotServices,
    action: MenuAction,
    language_code: Option<&str>,
) -> Result<()> {
    match action {
        MenuAction::Start => {
            dialogue.exit().await?;
            if let Some(user) = msg.from.as_ref() {
                services
                    .analytics
                    .log_visit(&TelegramUser::from(user), "telegram-bot");
            }
            bot.send_message(msg.chat.id, welcome_message(language_code))
                .reply_markup(create_main_menu_keyboard(language_code))
                .await?;
        }
        MenuAction::Help => {
            bot.send_message(msg.chat.id, help_message(language_code))
                .await?;
        }
        MenuAction::Cancel => {
            dialogue.exit().await?;
            bot.send_message(msg.chat.id, t_lang("cancelled", language_code))
                .reply_markup(create_main_menu_keyboard(language_code))
                .await?;
        }
        _ => start_flow(bot, msg.chat.id, dialogue, action, language_code).await?,
    }
    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    dialogue: CalcDialogue,
    services: Arc<BotServices>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message from user");

    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str());

    // Commands and menu buttons always win over a running wizard
    if let Some(action) = recognize_action(text) {
        return handle_action(bot, msg, dialogue, &services, action, language_code).await;
    }

    // Check dialogue state next
    let dialogue_state = dialogue.get().await?;
    match dialogue_state {
        Some(CalcDialogueState::Collecting {
            wizard,
            answers,
            language_code: dialogue_lang_code,
        }) => {
            // Use dialogue language code if available, otherwise fall back to message language
            let effective_language_code = dialogue_lang_code.as_deref().or(language_code);
            return handle_wizard_input(
                bot,
                msg,
                dialogue,
                wizard,
                answers,
                text,
                effective_language_code,
            )
            .await;
        }
        Some(CalcDialogueState::AwaitingUnit {
            price,
            weight,
            language_code: dialogue_lang_code,
        }) => {
            let effective_language_code = dialogue_lang_code.as_deref().or(language_code);
            return handle_unit_input(bot, msg, dialogue, price, weight, text, effective_language_code)
                .await;
        }
        Some(CalcDialogueState::AwaitingCurrencyCode {
            language_code: dialogue_lang_code,
        }) => {
            let effective_language_code = dialogue_lang_code.as_deref().or(language_code);
            return handle_currency_code_input(bot, msg, dialogue, text, effective_language_code).await;
        }
        Some(CalcDialogueState::AwaitingCurrencyAmount {
            currency,
            language_code: dialogue_lang_code,
        }) => {
            let effective_language_code = dialogue_lang_code.as_deref().or(language_code);
            return handle_currency_amount_input(
                bot,
                msg,
                dialogue,
                &services,
                currency,
                text,
                effective_language_code,
            )
            .await;
        }
        Some(CalcDialogueState::AwaitingAssistantQuery {
            language_code: dialogue_lang_code,
        }) => {
            let effective_language_code = dialogue_lang_code.as_deref().or(language_code);
            return handle_assistant_query_input(
                bot,
                msg,
                dialogue,
                &services,
                text,
                effective_language_code,
            )
            .await;
        }
        Some(CalcDialogueState::Start) | None => {
            // Continue with free-text handling
        }
    }

    if let Some(quick) = parse_quick_unit_price(text) {
        debug!(user_id = %msg.chat.id, assumed_unit = quick.assumed_unit, "Quick unit price request");
        let mut reply = unit_price_message(quick.price, quick.weight, quick.unit, language_code);
        if quick.assumed_unit {
            reply.push_str("\n\n");
            reply.push_str(&t_lang("quick-assumed-grams", language_code));
        }
        bot.send_message(msg.chat.id, reply)
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    }

    bot.send_message(
        msg.chat.id,
        format!(
            "{} {}",
            t_lang("text-response", language_code),
            t_lang("text-tip", language_code)
        ),
    )
    .reply_markup(create_main_menu_keyboard(language_code))
    .await?;
    Ok(())
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message) -> Result<()> {
    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str());

    debug!(user_id = %msg.chat.id, "Received unsupported message type from user");

    bot.send_message(msg.chat.id, t_lang("unsupported-message", language_code))
        .await?;
    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: CalcDialogue,
    services: Arc<BotServices>,
) -> Result<()> {
    if msg.text().is_some() {
        handle_text_message(&bot, &msg, dialogue, services).await?;
    } else {
        handle_unsupported_message(&bot, &msg).await?;
    }

    Ok(())
}
