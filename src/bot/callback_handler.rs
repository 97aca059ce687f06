//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error};

// Import dialogue types
use crate::dialogue::{unit_from_callback, CalcDialogue, CalcDialogueState};

use super::dialogue_manager::complete_unit_price;
use super::BotServices;

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: CalcDialogue,
    _services: Arc<BotServices>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    // Check dialogue state
    let dialogue_state = dialogue.get().await?;
    debug!(user_id = %q.from.id, dialogue_state = ?dialogue_state, "Retrieved dialogue state");

    let data = q.data.as_deref().unwrap_or("");

    match (dialogue_state, &q.message) {
        (
            Some(CalcDialogueState::AwaitingUnit {
                price,
                weight,
                language_code: dialogue_lang_code,
            }),
            Some(msg),
        ) => match unit_from_callback(data) {
            Some(unit) => {
                let language_code = dialogue_lang_code
                    .as_deref()
                    .or(q.from.language_code.as_deref());

                // Drop the unit keyboard so it cannot be pressed twice
                if let Err(e) = bot
                    .edit_message_reply_markup(msg.chat().id, msg.id())
                    .await
                {
                    debug!(user_id = %q.from.id, error = %e, "Failed to remove unit keyboard");
                }

                complete_unit_price(
                    &bot,
                    msg.chat().id,
                    dialogue,
                    price,
                    weight,
                    unit,
                    language_code,
                )
                .await?;
            }
            None => {
                debug!(user_id = %q.from.id, data = %data, "Ignoring unknown callback data");
            }
        },
        (state, _) => {
            debug!(user_id = %q.from.id, data = %data, state = ?state, "Callback outside of unit selection");
        }
    }

    // Answer the callback query to remove the loading state
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        error!(user_id = %q.from.id, error = %e, "Failed to answer callback query");
    }

    Ok(())
}
