//! Top-level dispatch of inbound messages.

use std::sync::Arc;
use tracing::debug;

use crate::bot::copy;
use crate::bot::menu::{self, Menu};
use crate::bot::message::{Effect, InboundMessage, Outbox};
use crate::bot::prompts::{Clock, PromptLifecycle};
use crate::bot::records::Submission;
use crate::bot::roles::{Role, RoleLookup};
use crate::bot::session::SessionStore;
use crate::bot::store::{Store, StoreError};
use crate::bot::{operator, participant};

/// Everything a mode handler may touch while handling one message.
pub struct Turn<'a> {
    pub store: &'a dyn Store,
    pub clock: &'a dyn Clock,
    pub msg: &'a InboundMessage,
}

impl<'a> Turn<'a> {
    pub fn text(&self) -> &'a str {
        &self.msg.text
    }

    pub fn prompts(&self) -> PromptLifecycle<'a> {
        PromptLifecycle::new(self.store, self.clock)
    }

    /// The inbound message as a submission record, text kept verbatim.
    pub fn submission(&self, prompt_id: Option<String>) -> Submission {
        Submission {
            author_id: self.msg.author_id,
            author_display_name: self.msg.author_display_name.clone(),
            conversation_id: Some(self.msg.conversation_id),
            source_message_id: self.msg.source_message_id,
            text: self.msg.text.clone(),
            timestamp: self.clock.now(),
            prompt_id,
        }
    }
}

pub fn greeting(role: Role) -> &'static str {
    match role {
        Role::Operator => copy::OPERATOR_GREETING,
        Role::Participant => copy::PARTICIPANT_GREETING,
    }
}

pub struct Router {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    roles: Arc<dyn RoleLookup>,
    sessions: SessionStore,
}

impl Router {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, roles: Arc<dyn RoleLookup>) -> Self {
        Self {
            store,
            clock,
            roles,
            sessions: SessionStore::new(),
        }
    }

    #[cfg(test)]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one message to completion and return the effects to deliver.
    ///
    /// On error the session is left as it was and no effects are returned.
    pub fn route(&self, msg: &InboundMessage) -> Result<Vec<Effect>, StoreError> {
        let role = self.roles.role_of(msg.author_id);
        let mut out = Outbox::new(msg.conversation_id);

        if menu::is_back(&msg.text) {
            self.sessions.reset(msg.conversation_id);
            out.reply(greeting(role), Menu::home(role));
            return Ok(out.into_effects());
        }

        let session = self.sessions.get(msg.conversation_id);
        let turn = Turn {
            store: self.store.as_ref(),
            clock: self.clock.as_ref(),
            msg,
        };

        let before = session.mode;
        let next = match role {
            Role::Operator => operator::handle(&turn, session, &mut out)?,
            Role::Participant => participant::handle(&turn, session, &mut out)?,
        };
        let after = next.mode;
        self.sessions.set(msg.conversation_id, next);
        debug!(
            "Chat {} ({:?}): {:?} → {:?}, {} active session(s)",
            msg.conversation_id,
            role,
            before,
            after,
            self.sessions.active()
        );
        Ok(out.into_effects())
    }
}
