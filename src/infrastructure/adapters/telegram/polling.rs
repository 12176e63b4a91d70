//! Long-poll delivery via getUpdates

use std::sync::Arc;
use std::time::Duration;

use super::{process_update, TelegramAdapter};
use crate::application::messaging::{Dispatcher, MessageParser};

/// Pause before retrying after a failed getUpdates call
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Poll until the future is dropped. Delivery failures are logged and never
/// stop the loop.
pub async fn run_polling(
    bot: Arc<TelegramAdapter>,
    dispatcher: Arc<Dispatcher>,
    parser: MessageParser,
    timeout_seconds: u64,
) {
    let mut offset: i64 = 0;

    tracing::info!("Starting message loop...");

    loop {
        match bot.get_updates(offset, timeout_seconds).await {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::debug!("Received {} updates", updates.len());
                }
                if let Some(next) = TelegramAdapter::get_next_offset(&updates) {
                    offset = offset.max(next);
                }
                for update in &updates {
                    if let Err(e) = process_update(bot.as_ref(), &dispatcher, &parser, update).await {
                        tracing::error!(update_id = update.update_id, error = %e, "Failed to handle update");
                    }
                }
            }
            Err(e) => {
                tracing::warn!("getUpdates failed: {}, retrying in {:?}", e, RETRY_DELAY);
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}
