//! Dialogue Manager module for handling wizard state transitions

use anyhow::Result;
use chrono::Local;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, info, warn};

// Import localization
use crate::localization::{t_args_lang, t_lang};

// Import calculator functions
use crate::calculator::{
    convert, discount, margin, promo, promo_plan, reverse_discount, unit_price, ConversionDirection,
    UnitKind,
};

// Import dialogue types
use crate::dialogue::{advance_wizard, parse_answer, CalcDialogue, CalcDialogueState, WizardKind, WizardStep};

use crate::config::QUOTE_CURRENCY;
use crate::errors::RateError;
use crate::rates::normalize_currency_code;

use super::ui_builder::{
    create_main_menu_keyboard, create_unit_keyboard, format_currency_result, format_discount_result,
    format_margin_result, format_promo_plan_result, format_promo_result, format_reverse_discount_result,
    format_unit_price_result, MenuAction,
};
use super::BotServices;

fn owned(language_code: Option<&str>) -> Option<String> {
    language_code.map(|s| s.to_string())
}

/// Enter the flow behind a menu action and ask its first question
pub async fn start_flow(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: CalcDialogue,
    action: MenuAction,
    language_code: Option<&str>,
) -> Result<()> {
    let wizard = match action {
        MenuAction::Discount => WizardKind::Discount,
        MenuAction::Promo => WizardKind::Promo,
        MenuAction::PromoPlan => WizardKind::PromoPlan,
        MenuAction::UnitPrice => WizardKind::UnitPrice,
        MenuAction::ReverseDiscount => WizardKind::ReverseDiscount,
        MenuAction::Margin => WizardKind::Margin,
        MenuAction::Currency => {
            bot.send_message(chat_id, t_lang("prompt-currency-code", language_code))
                .await?;
            dialogue
                .update(CalcDialogueState::AwaitingCurrencyCode {
                    language_code: owned(language_code),
                })
                .await?;
            return Ok(());
        }
        MenuAction::Assistant => {
            bot.send_message(chat_id, t_lang("prompt-assistant", language_code))
                .await?;
            dialogue
                .update(CalcDialogueState::AwaitingAssistantQuery {
                    language_code: owned(language_code),
                })
                .await?;
            return Ok(());
        }
        MenuAction::Start | MenuAction::Help | MenuAction::Cancel => return Ok(()),
    };

    debug!(user_id = %chat_id, wizard = ?wizard, "Starting calculator wizard");

    bot.send_message(chat_id, t_lang(wizard.prompts()[0], language_code))
        .await?;
    dialogue
        .update(CalcDialogueState::Collecting {
            wizard,
            answers: Vec::new(),
            language_code: owned(language_code),
        })
        .await?;
    Ok(())
}

/// Result message for a completed numeric wizard
///
/// `None` for the unit price wizard, which still needs a unit.
pub fn wizard_result_message(
    wizard: WizardKind,
    answers: &[f64],
    language_code: Option<&str>,
) -> Option<String> {
    let a = |i: usize| answers.get(i).copied().unwrap_or(0.0);
    let message = match wizard {
        WizardKind::Discount => {
            format_discount_result(a(0), a(1), &discount(a(0), a(1)), language_code)
        }
        WizardKind::Promo => format_promo_result(a(1), a(2), &promo(a(0), a(1), a(2)), language_code),
        WizardKind::PromoPlan => format_promo_plan_result(
            a(0),
            a(1),
            a(2),
            &promo_plan(a(0), a(1), a(2), a(3)),
            language_code,
        ),
        WizardKind::ReverseDiscount => {
            format_reverse_discount_result(a(0), a(1), &reverse_discount(a(0), a(1)), language_code)
        }
        WizardKind::Margin => format_margin_result(a(0), a(1), &margin(a(0), a(1)), language_code),
        WizardKind::UnitPrice => return None,
    };
    Some(message)
}

/// Unit price message once the unit is known
pub fn unit_price_message(price: f64, weight: f64, unit: UnitKind, language_code: Option<&str>) -> String {
    format_unit_price_result(price, weight, unit, &unit_price(price, weight, unit), language_code)
}

/// Send a final result, restore the main menu and leave the wizard
async fn finish_with(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: CalcDialogue,
    message: String,
    language_code: Option<&str>,
) -> Result<()> {
    bot.send_message(chat_id, message)
        .parse_mode(ParseMode::Html)
        .reply_markup(create_main_menu_keyboard(language_code))
        .await?;
    dialogue.exit().await?;
    Ok(())
}

/// Abandon the wizard after an answer that is not a number
async fn abandon(bot: &Bot, chat_id: ChatId, dialogue: CalcDialogue, language_code: Option<&str>) -> Result<()> {
    bot.send_message(chat_id, t_lang("error-not-a-number", language_code))
        .reply_markup(create_main_menu_keyboard(language_code))
        .await?;
    dialogue.exit().await?;
    Ok(())
}

/// Handle one answer to a numeric wizard
pub async fn handle_wizard_input(
    bot: &Bot,
    msg: &Message,
    dialogue: CalcDialogue,
    wizard: WizardKind,
    mut answers: Vec<f64>,
    input: &str,
    language_code: Option<&str>,
) -> Result<()> {
    match advance_wizard(wizard, &mut answers, input) {
        WizardStep::Ask(prompt) => {
            bot.send_message(msg.chat.id, t_lang(prompt, language_code))
                .await?;
            dialogue
                .update(CalcDialogueState::Collecting {
                    wizard,
                    answers,
                    language_code: owned(language_code),
                })
                .await?;
        }
        WizardStep::Complete(values) => {
            info!(user_id = %msg.chat.id, wizard = ?wizard, "Wizard completed");
            match wizard_result_message(wizard, &values, language_code) {
                Some(message) => finish_with(bot, msg.chat.id, dialogue, message, language_code).await?,
                None => {
                    bot.send_message(msg.chat.id, t_lang("prompt-unit", language_code))
                        .reply_markup(create_unit_keyboard(language_code))
                        .await?;
                    dialogue
                        .update(CalcDialogueState::AwaitingUnit {
                            price: values[0],
                            weight: values[1],
                            language_code: owned(language_code),
                        })
                        .await?;
                }
            }
        }
        WizardStep::Invalid => {
            debug!(user_id = %msg.chat.id, wizard = ?wizard, "Wizard abandoned on invalid input");
            abandon(bot, msg.chat.id, dialogue, language_code).await?;
        }
    }
    Ok(())
}

/// Finish the unit price wizard with the chosen unit
pub async fn complete_unit_price(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: CalcDialogue,
    price: f64,
    weight: f64,
    unit: UnitKind,
    language_code: Option<&str>,
) -> Result<()> {
    let message = unit_price_message(price, weight, unit, language_code);
    finish_with(bot, chat_id, dialogue, message, language_code).await
}

/// Handle a typed unit while the unit keyboard is shown
pub async fn handle_unit_input(
    bot: &Bot,
    msg: &Message,
    dialogue: CalcDialogue,
    price: f64,
    weight: f64,
    input: &str,
    language_code: Option<&str>,
) -> Result<()> {
    match UnitKind::parse(input) {
        Some(unit) => complete_unit_price(bot, msg.chat.id, dialogue, price, weight, unit, language_code).await,
        None => {
            bot.send_message(msg.chat.id, t_lang("error-unknown-unit", language_code))
                .reply_markup(create_unit_keyboard(language_code))
                .await?;
            Ok(())
        }
    }
}

/// Handle the currency code answer
pub async fn handle_currency_code_input(
    bot: &Bot,
    msg: &Message,
    dialogue: CalcDialogue,
    input: &str,
    language_code: Option<&str>,
) -> Result<()> {
    match normalize_currency_code(input) {
        Ok(currency) => {
            bot.send_message(
                msg.chat.id,
                t_args_lang("prompt-currency-amount", &[("currency", &currency)], language_code),
            )
            .await?;
            dialogue
                .update(CalcDialogueState::AwaitingCurrencyAmount {
                    currency,
                    language_code: owned(language_code),
                })
                .await?;
        }
        Err(_) => {
            bot.send_message(msg.chat.id, t_lang("currency-code-invalid", language_code))
                .reply_markup(create_main_menu_keyboard(language_code))
                .await?;
            dialogue.exit().await?;
        }
    }
    Ok(())
}

/// Handle the amount answer: fetch the rate and convert
pub async fn handle_currency_amount_input(
    bot: &Bot,
    msg: &Message,
    dialogue: CalcDialogue,
    services: &BotServices,
    currency: String,
    input: &str,
    language_code: Option<&str>,
) -> Result<()> {
    let Some(amount) = parse_answer(input) else {
        return abandon(bot, msg.chat.id, dialogue, language_code).await;
    };

    bot.send_message(msg.chat.id, t_lang("currency-loading", language_code))
        .await?;

    let today = Local::now().date_naive();
    let message = match services.rates.fetch(&currency, today).await {
        Ok(snapshot) => {
            let converted = convert(amount, snapshot.rate, ConversionDirection::ToLocal).converted_amount;
            let inverse = convert(1.0, snapshot.rate, ConversionDirection::ToForeign).converted_amount;
            info!(user_id = %msg.chat.id, currency = %currency, rate = snapshot.rate, "Currency converted");
            format_currency_result(amount, converted, inverse, &snapshot, language_code)
        }
        Err(RateError::NotFound(_)) => {
            warn!(user_id = %msg.chat.id, currency = %currency, "No rate published for currency");
            t_lang("currency-not-found", language_code)
        }
        Err(e) => {
            warn!(user_id = %msg.chat.id, currency = %currency, error = %e, "Rate lookup failed");
            t_lang("currency-bank-error", language_code)
        }
    };

    finish_with(bot, msg.chat.id, dialogue, message, language_code).await
}

/// Handle a free-text question for the deal assistant
pub async fn handle_assistant_query_input(
    bot: &Bot,
    msg: &Message,
    dialogue: CalcDialogue,
    services: &BotServices,
    input: &str,
    language_code: Option<&str>,
) -> Result<()> {
    let query = input.trim();
    if query.is_empty() {
        bot.send_message(msg.chat.id, t_lang("prompt-assistant", language_code))
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, t_lang("assistant-thinking", language_code))
        .await?;

    let answer = services.assistant.analyze(query, QUOTE_CURRENCY, language_code).await;

    bot.send_message(msg.chat.id, answer)
        .reply_markup(create_main_menu_keyboard(language_code))
        .await?;
    dialogue.exit().await?;
    Ok(())
}
