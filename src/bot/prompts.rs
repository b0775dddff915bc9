//! Current/archived prompt lifecycle.
//!
//! The current prompt lives alone in `current_prompt`; closed prompts are
//! copied into `archived_prompts` with an end time. At most one current
//! prompt exists after every operation here.

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::bot::records::Prompt;
use crate::bot::store::{Collection, Filter, Store, StoreError, StoreExt};

/// Source of "now" for prompt timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Result of [`PromptLifecycle::stop`].
#[derive(Debug, Clone, PartialEq)]
pub enum StopOutcome {
    Archived(Prompt),
    NothingToStop,
}

pub struct PromptLifecycle<'a> {
    store: &'a dyn Store,
    clock: &'a dyn Clock,
}

impl<'a> PromptLifecycle<'a> {
    pub fn new(store: &'a dyn Store, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    pub fn current(&self) -> Result<Option<Prompt>, StoreError> {
        Ok(self
            .store
            .find_one_as::<Prompt>(Collection::CurrentPrompt, &Filter::All)?
            .map(|s| s.record))
    }

    /// Archived prompts, oldest first.
    pub fn archived(&self) -> Result<Vec<Prompt>, StoreError> {
        Ok(self
            .store
            .find_all_as::<Prompt>(Collection::ArchivedPrompts, &Filter::All)?
            .into_iter()
            .map(|s| s.record)
            .collect())
    }

    /// Look a prompt up by id, current first.
    pub fn find(&self, id: &str) -> Result<Option<Prompt>, StoreError> {
        let by_id = Filter::eq("id", id);
        if let Some(p) = self.store.find_one_as::<Prompt>(Collection::CurrentPrompt, &by_id)? {
            return Ok(Some(p.record));
        }
        Ok(self
            .store
            .find_one_as::<Prompt>(Collection::ArchivedPrompts, &by_id)?
            .map(|s| s.record))
    }

    /// Archive the current prompt (if any) and open a new one.
    pub fn submit_new(&self, text: &str) -> Result<Prompt, StoreError> {
        if let Some(current) = self.current()? {
            self.archive(current)?;
        }

        let prompt = Prompt {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            start_time: self.clock.now(),
            end_time: None,
        };
        self.store.insert_record(Collection::CurrentPrompt, &prompt)?;
        info!("🖋 New prompt {}: \"{}\"", prompt.id, preview(&prompt.text));
        Ok(prompt)
    }

    /// Close the current prompt without opening another.
    pub fn stop(&self) -> Result<StopOutcome, StoreError> {
        match self.current()? {
            Some(current) => Ok(StopOutcome::Archived(self.archive(current)?)),
            None => Ok(StopOutcome::NothingToStop),
        }
    }

    /// Remove the current prompt without archiving it.
    pub fn delete_current(&self) -> Result<bool, StoreError> {
        let deleted = self.store.delete_one(Collection::CurrentPrompt, &Filter::All)?;
        if deleted {
            info!("🗑️ Deleted current prompt");
        }
        Ok(deleted)
    }

    pub fn delete_archived(&self, id: &str) -> Result<bool, StoreError> {
        let deleted = self.store.delete_one(Collection::ArchivedPrompts, &Filter::eq("id", id))?;
        if deleted {
            info!("🗑️ Deleted archived prompt {}", id);
        }
        Ok(deleted)
    }

    /// Delete a prompt by id wherever it currently lives.
    ///
    /// A prompt listed as current may have been archived since; the id
    /// still finds it.
    pub fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        match self.current()? {
            Some(current) if current.id == id => self.delete_current(),
            _ => self.delete_archived(id),
        }
    }

    fn archive(&self, current: Prompt) -> Result<Prompt, StoreError> {
        let archived = Prompt {
            end_time: Some(closing_time(current.start_time, self.clock.now())),
            ..current
        };
        self.store.insert_record(Collection::ArchivedPrompts, &archived)?;
        self.store.delete_one(Collection::CurrentPrompt, &Filter::eq("id", archived.id.as_str()))?;
        info!("📦 Archived prompt {}", archived.id);
        Ok(archived)
    }
}

/// End time strictly after the start, even if the clock has not moved.
fn closing_time(start: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > start {
        now
    } else {
        start + Duration::milliseconds(1)
    }
}

fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}
