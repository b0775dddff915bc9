//! Bot module - menu-driven prompt desk over a chat transport.

pub mod copy;
pub mod engine;
pub mod menu;
pub mod message;
pub mod operator;
pub mod participant;
pub mod prompts;
pub mod records;
pub mod roles;
pub mod router;
pub mod selection;
pub mod session;
pub mod store;
pub mod telegram;
pub mod views;


pub use engine::BotEngine;
pub use message::InboundMessage;
pub use prompts::SystemClock;
pub use roles::AdminRegistry;
pub use store::Database;
pub use telegram::TelegramClient;
