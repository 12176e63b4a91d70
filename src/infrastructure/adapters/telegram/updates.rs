//! Decoding Telegram updates and delivering replies

use super::Update;
use crate::application::errors::BotError;
use crate::application::messaging::{Dispatcher, MessageParser};
use crate::domain::entities::InboundEvent;
use crate::domain::traits::Bot;

/// An update the dispatcher can handle, plus where to send the reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub chat_id: String,
    pub event: InboundEvent,
}

/// Map a raw update to an event. Non-text messages and unknown button tags
/// decode to `None`.
pub fn decode_update(parser: &MessageParser, update: &Update) -> Option<Incoming> {
    if let Some(msg) = &update.message {
        let text = msg.text.as_deref()?;
        let user_id = msg
            .from
            .as_ref()
            .map(|u| u.id)
            .unwrap_or(msg.chat.id)
            .to_string();
        return Some(Incoming {
            chat_id: msg.chat.id.to_string(),
            event: parser.parse(user_id, text),
        });
    }

    if let Some(query) = &update.callback_query {
        let data = query.data.as_deref()?;
        let user_id = query.from.id.to_string();
        let chat_id = query
            .message
            .as_ref()
            .map(|m| m.chat.id)
            .unwrap_or(query.from.id)
            .to_string();
        let event = parser.parse_callback(user_id, data)?;
        return Some(Incoming { chat_id, event });
    }

    None
}

/// Handle one update end to end: answer the button press, dispatch, reply.
pub async fn process_update<B>(
    bot: &B,
    dispatcher: &Dispatcher,
    parser: &MessageParser,
    update: &Update,
) -> Result<(), BotError>
where
    B: Bot + ?Sized,
{
    // Always clear the button's loading state, even for tags we ignore
    if let Some(query) = &update.callback_query {
        if let Err(e) = bot.answer_callback(&query.id, None).await {
            tracing::warn!(update_id = update.update_id, error = %e, "Failed to answer callback");
        }
    }

    let Some(incoming) = decode_update(parser, update) else {
        tracing::debug!(update_id = update.update_id, "Ignoring update");
        return Ok(());
    };

    let reply = dispatcher.handle_event(&incoming.event);
    bot.send_reply(&incoming.chat_id, &reply).await?;
    Ok(())
}
