//! Tracing layer that mirrors operational logs into a chat.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::bot::engine::Transport;
use crate::bot::telegram;

/// Telegram rejects messages longer than this.
const MAX_LOG_CHARS: usize = 4000;

/// Buffered INFO lines that force an early flush.
const FLUSH_AT: usize = 50;

/// Log message with priority.
#[derive(Debug, PartialEq, Eq)]
enum LogMessage {
    /// High priority (WARN/ERROR) - send immediately
    Urgent(String),
    /// Low priority (INFO) - batch and send periodically
    Info(String),
}

impl LogMessage {
    /// None for levels below INFO.
    fn from_event(level: Level, message: String) -> Option<Self> {
        match level {
            Level::ERROR => Some(LogMessage::Urgent(format!("❌ {}", message))),
            Level::WARN => Some(LogMessage::Urgent(format!("⚠️ {}", message))),
            Level::INFO => Some(LogMessage::Info(message)),
            _ => None,
        }
    }
}

pub struct ChatLogLayer {
    tx: mpsc::UnboundedSender<LogMessage>,
}

impl ChatLogLayer {
    pub fn new<T: Transport + 'static>(transport: Arc<T>, chat_id: i64) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<LogMessage>();

        tokio::spawn(async move {
            let mut info_buffer: Vec<String> = Vec::new();
            let mut interval = tokio::time::interval(Duration::from_secs(5));

            loop {
                tokio::select! {
                    msg = rx.recv() => {
                        match msg {
                            Some(LogMessage::Urgent(text)) => {
                                send_log(transport.as_ref(), chat_id, &text).await;
                            }
                            Some(LogMessage::Info(text)) => {
                                info_buffer.push(text);
                                if info_buffer.len() >= FLUSH_AT {
                                    flush_buffer(transport.as_ref(), chat_id, &mut info_buffer).await;
                                }
                            }
                            None => break,
                        }
                    }
                    _ = interval.tick() => {
                        if !info_buffer.is_empty() {
                            flush_buffer(transport.as_ref(), chat_id, &mut info_buffer).await;
                        }
                    }
                }
            }
        });

        Self { tx }
    }
}

fn truncate_log(text: &str) -> String {
    if text.chars().count() > MAX_LOG_CHARS {
        let truncated: String = text.chars().take(MAX_LOG_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

async fn send_log<T: Transport>(transport: &T, chat_id: i64, text: &str) {
    if let Err(e) = transport.reply(chat_id, &truncate_log(text), None).await {
        // Logging here would feed back into this layer
        eprintln!("Failed to send log to chat: {e}");
    }
}

async fn flush_buffer<T: Transport>(transport: &T, chat_id: i64, buffer: &mut Vec<String>) {
    if buffer.is_empty() {
        return;
    }
    let combined = buffer.join("\n");
    buffer.clear();
    send_log(transport, chat_id, &combined).await;
}

struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else if self.message.is_empty() {
            self.message = format!("{} = {:?}", field.name(), value);
        } else {
            self.message
                .push_str(&format!(", {} = {:?}", field.name(), value));
        }
    }
}

impl<S: Subscriber> Layer<S> for ChatLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if level > Level::INFO {
            return;
        }
        // Transport failures would loop back through this layer
        if event.metadata().target() == telegram::LOG_TARGET {
            return;
        }

        let mut visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut visitor);

        let Some(msg) = LogMessage::from_event(level, visitor.message) else {
            return;
        };
        if self.tx.send(msg).is_err() {
            eprintln!("Log channel closed, message dropped");
        }
    }
}
