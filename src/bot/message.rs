//! Inbound messages and the outbound effects a turn produces.

use crate::bot::menu::Menu;

/// A text message received from a conversation.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Chat the message arrived in; replies go back here.
    pub conversation_id: i64,
    pub author_id: i64,
    pub author_display_name: Option<String>,
    pub source_message_id: i64,
    pub text: String,
}

/// Something the transport should do on behalf of a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Reply {
        conversation_id: i64,
        text: String,
        menu: Option<Menu>,
    },
    /// Forward `source_message_id` from `from_conversation_id` into
    /// `conversation_id`.
    Forward {
        conversation_id: i64,
        from_conversation_id: i64,
        source_message_id: i64,
    },
}

/// Effects queued for one conversation during a turn.
///
/// Nothing is sent until the turn finishes; a failed turn drops the lot.
#[derive(Debug)]
pub struct Outbox {
    conversation_id: i64,
    effects: Vec<Effect>,
}

impl Outbox {
    pub fn new(conversation_id: i64) -> Self {
        Self { conversation_id, effects: Vec::new() }
    }

    pub fn reply(&mut self, text: impl Into<String>, menu: Menu) {
        self.push_reply(text.into(), Some(menu));
    }

    /// Reply that leaves the current keyboard in place.
    pub fn say(&mut self, text: impl Into<String>) {
        self.push_reply(text.into(), None);
    }

    pub fn forward(&mut self, from_conversation_id: i64, source_message_id: i64) {
        self.effects.push(Effect::Forward {
            conversation_id: self.conversation_id,
            from_conversation_id,
            source_message_id,
        });
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }

    fn push_reply(&mut self, text: String, menu: Option<Menu>) {
        self.effects.push(Effect::Reply {
            conversation_id: self.conversation_id,
            text,
            menu,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbox_targets_its_conversation() {
        let mut out = Outbox::new(77);
        out.forward(5, 900);
        out.say("details");
        out.reply("done", Menu::back());

        let effects = out.into_effects();
        assert_eq!(effects.len(), 3);
        assert_eq!(
            effects[0],
            Effect::Forward { conversation_id: 77, from_conversation_id: 5, source_message_id: 900 }
        );
        assert!(matches!(&effects[1], Effect::Reply { conversation_id: 77, menu: None, .. }));
        assert!(matches!(&effects[2], Effect::Reply { menu: Some(_), .. }));
    }
}
