//! Per-conversation session state.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::bot::selection::SelectionList;

/// How the next freeform message in a conversation is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Operator: next text becomes the new current prompt.
    NewPrompt,
    /// Operator: next text becomes an info note.
    AddInfo,
    /// Participant: next text is an answer to the current prompt.
    Answer,
    Comment,
    FreeQuestion,
    /// Choosing a prompt whose answers to view.
    SelectAnswers,
    /// Operator: choosing a record to delete.
    SelectDelete,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub mode: Mode,
    pub selection: Option<SelectionList>,
}

impl Session {
    /// Home state: idle, no selection list.
    pub fn home() -> Self {
        Self::default()
    }

    /// Enter a data-collecting mode. Drops any selection list.
    pub fn enter(mode: Mode) -> Self {
        Self { mode, selection: None }
    }

    pub fn selecting(mode: Mode, list: SelectionList) -> Self {
        Self { mode, selection: Some(list) }
    }

    pub fn is_home(&self) -> bool {
        self.mode == Mode::Idle && self.selection.is_none()
    }
}

/// Sessions keyed by conversation id.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for a conversation; home if none is recorded.
    pub fn get(&self, conversation_id: i64) -> Session {
        self.lock().get(&conversation_id).cloned().unwrap_or_default()
    }

    pub fn set(&self, conversation_id: i64, session: Session) {
        let mut sessions = self.lock();
        if session.is_home() {
            sessions.remove(&conversation_id);
        } else {
            sessions.insert(conversation_id, session);
        }
    }

    pub fn reset(&self, conversation_id: i64) {
        self.lock().remove(&conversation_id);
    }

    /// Conversations currently away from home.
    pub fn active(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<i64, Session>> {
        // A panic mid-update leaves at worst one stale session
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
