//! Document store over SQLite.
//!
//! Every collection lives in one `documents` table as JSON bodies. Filters are
//! applied on the decoded documents, so records need no schema beyond serde.

use rusqlite::{Connection, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Named record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Admins,
    CurrentPrompt,
    ArchivedPrompts,
    Answers,
    FreeQuestions,
    Comments,
    InfoNotes,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Admins,
        Collection::CurrentPrompt,
        Collection::ArchivedPrompts,
        Collection::Answers,
        Collection::FreeQuestions,
        Collection::Comments,
        Collection::InfoNotes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Admins => "admins",
            Collection::CurrentPrompt => "current_prompt",
            Collection::ArchivedPrompts => "archived_prompts",
            Collection::Answers => "answers",
            Collection::FreeQuestions => "free_questions",
            Collection::Comments => "comments",
            Collection::InfoNotes => "info_notes",
        }
    }
}

/// Which documents an operation applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// Top-level field equals the value.
    Eq(String, Value),
    /// The store-assigned document id.
    DocId(i64),
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(field.to_string(), value.into())
    }

    fn matches(&self, doc_id: i64, body: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => body.get(field) == Some(value),
            Filter::DocId(id) => *id == doc_id,
        }
    }
}

/// A raw document as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub doc_id: i64,
    pub body: Value,
}

/// A decoded record with its document id.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub doc_id: i64,
    pub record: T,
}

/// Errors from the persistence layer.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Json(serde_json::Error),
    /// The connection lock was poisoned by a panicking holder.
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(e) => write!(f, "sqlite error: {}", e),
            Self::Json(e) => write!(f, "malformed document: {}", e),
            Self::Poisoned => write!(f, "database lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Poisoned => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Generic CRUD surface over named collections.
///
/// No transactions: callers issuing several operations get no atomicity.
pub trait Store: Send + Sync {
    /// Matching documents in insertion order.
    fn find_all(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, StoreError> {
        Ok(self.find_all(collection, filter)?.into_iter().next())
    }

    /// Insert a document, returning its new document id.
    fn insert(&self, collection: Collection, body: Value) -> Result<i64, StoreError>;

    /// Delete the first matching document. Returns false if none matched.
    fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<bool, StoreError>;
}

/// Typed helpers for any [`Store`].
pub trait StoreExt: Store {
    fn find_all_as<T: DeserializeOwned>(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Stored<T>>, StoreError> {
        self.find_all(collection, filter)?
            .into_iter()
            .map(decode)
            .collect()
    }

    fn find_one_as<T: DeserializeOwned>(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Stored<T>>, StoreError> {
        self.find_one(collection, filter)?.map(decode).transpose()
    }

    fn insert_record<T: Serialize>(&self, collection: Collection, record: &T) -> Result<i64, StoreError> {
        self.insert(collection, serde_json::to_value(record)?)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

fn decode<T: DeserializeOwned>(doc: Document) -> Result<Stored<T>, StoreError> {
    Ok(Stored {
        doc_id: doc.doc_id,
        record: serde_json::from_value(doc.body)?,
    })
}

/// SQLite-backed [`Store`].
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Create a new in-memory database.
    #[cfg(test)]
    pub fn new() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn: Mutex::new(conn) };
        db.init_schema()?;
        Ok(db)
    }

    /// Open (or create) a database file.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let db = Self { conn: Mutex::new(conn) };
        db.init_schema()?;

        let counts = db
            .counts()?
            .into_iter()
            .map(|(c, n)| format!("{} {}", n, c.name()))
            .collect::<Vec<_>>()
            .join(", ");
        info!("Loaded database from {:?} ({})", path, counts);

        Ok(db)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute_batch(r#"
            CREATE TABLE IF NOT EXISTS documents (
                doc_id INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                body TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
        "#)?;
        Ok(())
    }

    /// Document count per collection.
    pub fn counts(&self) -> Result<Vec<(Collection, usize)>, StoreError> {
        let conn = self.lock()?;
        Collection::ALL
            .iter()
            .map(|&c| -> Result<(Collection, usize), StoreError> {
                let n: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                    params![c.name()],
                    |row| row.get(0),
                )?;
                Ok((c, n as usize))
            })
            .collect()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl Store for Database {
    fn find_all(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT doc_id, body FROM documents WHERE collection = ?1 ORDER BY doc_id"
        )?;

        let rows = stmt.query_map(params![collection.name()], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (doc_id, body) = row?;
            let body: Value = serde_json::from_str(&body)?;
            if filter.matches(doc_id, &body) {
                docs.push(Document { doc_id, body });
            }
        }
        Ok(docs)
    }

    fn insert(&self, collection: Collection, body: Value) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (collection, body) VALUES (?1, ?2)",
            params![collection.name(), body.to_string()],
        )?;
        let doc_id = conn.last_insert_rowid();
        debug!("Inserted doc {} into {}", doc_id, collection.name());
        Ok(doc_id)
    }

    fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<bool, StoreError> {
        let Some(doc) = self.find_one(collection, filter)? else {
            return Ok(false);
        };

        let conn = self.lock()?;
        let n = conn.execute(
            "DELETE FROM documents WHERE doc_id = ?1 AND collection = ?2",
            params![doc.doc_id, collection.name()],
        )?;
        debug!("Deleted doc {} from {}", doc.doc_id, collection.name());
        Ok(n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_find_in_order() {
        let db = Database::new().unwrap();
        db.insert(Collection::Comments, json!({"text": "first"})).unwrap();
        db.insert(Collection::Comments, json!({"text": "second"})).unwrap();
        db.insert(Collection::InfoNotes, json!({"text": "elsewhere"})).unwrap();

        let docs = db.find_all(Collection::Comments, &Filter::All).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].body["text"], "first");
        assert_eq!(docs[1].body["text"], "second");
    }

    #[test]
    fn test_filter_by_field() {
        let db = Database::new().unwrap();
        db.insert(Collection::Answers, json!({"promptId": "a", "text": "1"})).unwrap();
        db.insert(Collection::Answers, json!({"promptId": "b", "text": "2"})).unwrap();

        let docs = db.find_all(Collection::Answers, &Filter::eq("promptId", "b")).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].body["text"], "2");

        assert!(db.find_one(Collection::Answers, &Filter::eq("promptId", "zzz")).unwrap().is_none());
    }

    #[test]
    fn test_delete_one_by_doc_id() {
        let db = Database::new().unwrap();
        let a = db.insert(Collection::Answers, json!({"text": "keep"})).unwrap();
        let b = db.insert(Collection::Answers, json!({"text": "drop"})).unwrap();

        assert!(db.delete_one(Collection::Answers, &Filter::DocId(b)).unwrap());
        assert!(!db.delete_one(Collection::Answers, &Filter::DocId(b)).unwrap());

        let docs = db.find_all(Collection::Answers, &Filter::All).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].doc_id, a);
    }

    #[test]
    fn test_delete_respects_collection() {
        let db = Database::new().unwrap();
        let id = db.insert(Collection::Comments, json!({"text": "c"})).unwrap();

        assert!(!db.delete_one(Collection::Answers, &Filter::DocId(id)).unwrap());
        assert_eq!(db.find_all(Collection::Comments, &Filter::All).unwrap().len(), 1);
    }

    #[test]
    fn test_typed_helpers() {
        use crate::bot::records::InfoNote;

        let db = Database::new().unwrap();
        db.insert_record(Collection::InfoNotes, &InfoNote { text: "doors open at 9".to_string() }).unwrap();

        let notes = db.find_all_as::<InfoNote>(Collection::InfoNotes, &Filter::All).unwrap();
        assert_eq!(notes[0].record.text, "doors open at 9");
    }

    #[test]
    fn test_open_file_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("promptdesk.db");
        {
            let db = Database::open(&path).unwrap();
            db.insert(Collection::InfoNotes, json!({"text": "x"})).unwrap();
        }

        let db = Database::open(&path).unwrap();
        let counts = db.counts().unwrap();
        assert!(counts.contains(&(Collection::InfoNotes, 1)));
        assert!(counts.contains(&(Collection::Answers, 0)));
    }
}
