//! Bot engine - runs one turn per inbound message and delivers its effects.

use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

use crate::bot::menu::Menu;
use crate::bot::message::{Effect, InboundMessage};
use crate::bot::prompts::Clock;
use crate::bot::roles::RoleLookup;
use crate::bot::router::Router;
use crate::bot::store::Store;

/// Outbound side of the chat transport. One attempt per effect.
pub trait Transport: Send + Sync {
    fn reply(
        &self,
        conversation_id: i64,
        text: &str,
        menu: Option<&Menu>,
    ) -> impl Future<Output = Result<(), String>> + Send;

    fn forward(
        &self,
        conversation_id: i64,
        from_conversation_id: i64,
        source_message_id: i64,
    ) -> impl Future<Output = Result<(), String>> + Send;
}

/// The bot engine.
pub struct BotEngine<T> {
    router: Router,
    transport: Arc<T>,
}

impl<T: Transport> BotEngine<T> {
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        roles: Arc<dyn RoleLookup>,
        transport: Arc<T>,
    ) -> Self {
        Self {
            router: Router::new(store, clock, roles),
            transport,
        }
    }

    #[cfg(test)]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Handle an incoming message.
    ///
    /// A store failure aborts the turn: nothing is sent and the session
    /// stays where it was.
    pub async fn handle_message(&self, msg: InboundMessage) {
        info!(
            "📨 {} ({}): \"{}\"",
            msg.author_display_name.as_deref().unwrap_or("unknown"),
            msg.author_id,
            msg.text.chars().take(50).collect::<String>()
        );

        match self.router.route(&msg) {
            Ok(effects) => self.deliver(effects).await,
            Err(e) => error!("Turn aborted for chat {}: {}", msg.conversation_id, e),
        }
    }

    /// Send effects in order. Failed sends are not retried.
    async fn deliver(&self, effects: Vec<Effect>) {
        for effect in effects {
            let result = match &effect {
                Effect::Reply { conversation_id, text, menu } => {
                    self.transport.reply(*conversation_id, text, menu.as_ref()).await
                }
                Effect::Forward { conversation_id, from_conversation_id, source_message_id } => {
                    self.transport
                        .forward(*conversation_id, *from_conversation_id, *source_message_id)
                        .await
                }
            };
            // The transport logs its own failures
            result.ok();
        }
    }
}
