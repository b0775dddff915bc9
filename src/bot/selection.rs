//! Ephemeral selection lists and label resolution.
//!
//! Every selectable item is tagged with a [`SelectionKey`] when the list is
//! built. A later choice is resolved by comparing normalized labels and
//! returning the key; the record is then addressed by the id in the key,
//! never by re-parsing the label or by position in a re-queried list.

use std::fmt;
use unicode_normalization::UnicodeNormalization;

use crate::bot::session::Session;

/// Stable id of a selectable item: an operation tag plus a record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionKey {
    ViewAnswers { prompt_id: String },
    DeleteAnswer { doc_id: i64 },
    DeleteFreeQuestion { doc_id: i64 },
    DeleteCurrentPrompt { prompt_id: String },
    DeleteArchivedPrompt { prompt_id: String },
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ViewAnswers { prompt_id } => write!(f, "answers-view:{}", prompt_id),
            Self::DeleteAnswer { doc_id } => write!(f, "answer-delete:{}", doc_id),
            Self::DeleteFreeQuestion { doc_id } => write!(f, "question-delete:{}", doc_id),
            Self::DeleteCurrentPrompt { prompt_id } => write!(f, "current-delete:{}", prompt_id),
            Self::DeleteArchivedPrompt { prompt_id } => write!(f, "archive-delete:{}", prompt_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    pub label: String,
    pub key: SelectionKey,
}

/// Ordered `(label, key)` pairs offered to one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionList {
    entries: Vec<SelectionEntry>,
}

impl SelectionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A label that would collide with an earlier one
    /// after normalization gets a numeric suffix so each label maps to
    /// exactly one key.
    pub fn push(&mut self, label: impl Into<String>, key: SelectionKey) {
        let base = label.into();
        let mut label = base.clone();
        let mut n = 2;
        while self.position(&label).is_some() {
            label = format!("{} ({})", base, n);
            n += 1;
        }
        self.entries.push(SelectionEntry { label, key });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Key of the entry whose label matches `text`.
    pub fn resolve(&self, text: &str) -> Option<&SelectionKey> {
        self.position(text).map(|i| &self.entries[i].key)
    }

    fn position(&self, text: &str) -> Option<usize> {
        let wanted = normalize_label(text);
        self.entries
            .iter()
            .position(|e| normalize_label(&e.label) == wanted)
    }
}

/// Resolve incoming text against the session's active selection list.
pub fn resolve(session: &Session, incoming: &str) -> Option<SelectionKey> {
    session
        .selection
        .as_ref()
        .and_then(|list| list.resolve(incoming))
        .cloned()
}

/// NFKC fold and collapse whitespace. Used for label comparison only.
pub fn normalize_label(s: &str) -> String {
    let folded: String = s.nfkc().collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
