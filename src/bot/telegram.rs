//! Telegram transport using teloxide.

use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, MessageId};
use tracing::{info, warn};

use crate::bot::engine::Transport;
use crate::bot::menu::Menu;

/// Tracing target of this module's events.
pub const LOG_TARGET: &str = module_path!();

/// Telegram API client.
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Render a menu as a resized reply keyboard.
fn keyboard(menu: &Menu) -> KeyboardMarkup {
    let rows = menu
        .rows
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect::<Vec<_>>());
    KeyboardMarkup::new(rows).resize_keyboard()
}

impl Transport for TelegramClient {
    async fn reply(&self, conversation_id: i64, text: &str, menu: Option<&Menu>) -> Result<(), String> {
        let mut request = self.bot.send_message(ChatId(conversation_id), text);

        if let Some(menu) = menu {
            request = request.reply_markup(keyboard(menu));
        }

        request.await.map(|_| ()).map_err(|e| {
            let msg = format!("Failed to send: {e}");
            warn!("{}", msg);
            msg
        })
    }

    async fn forward(
        &self,
        conversation_id: i64,
        from_conversation_id: i64,
        source_message_id: i64,
    ) -> Result<(), String> {
        info!(
            "↪️ Forwarding msg {} from chat {} to chat {}",
            source_message_id, from_conversation_id, conversation_id
        );

        self.bot
            .forward_message(
                ChatId(conversation_id),
                ChatId(from_conversation_id),
                MessageId(source_message_id as i32),
            )
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to forward: {e}");
                warn!("{}", msg);
                msg
            })
    }
}
