//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped persistence APIs for notes and their tag sets.
//! - Own filtering and ordering for paginated listing.
//!
//! # Invariants
//! - Every read and write is constrained by `(id, user_id)` or `user_id`.
//! - List order is `created_at DESC, id ASC` so pages are stable even when
//!   creation timestamps collide.
//! - Note rows and tag links are written in one transaction.

use crate::db::DbError;
use crate::listing::page::PageRequest;
use crate::model::note::{Note, NoteId, Tag};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    text,
    created_at
FROM notes";

const TAG_FILTER_SQL: &str = " AND EXISTS (
    SELECT 1
    FROM note_tags nt
    WHERE nt.note_id = notes.id
      AND nt.tag = ?
)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// No note matched `(id, user_id)`. Deliberately carries no owner.
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "note store is missing required table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One storage page plus the total row count across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPage {
    /// Sorted `created_at DESC, id ASC`.
    pub items: Vec<Note>,
    pub total_items: u64,
}

/// Storage collaborator for owner-scoped notes.
pub trait NoteRepository {
    /// Finds one note owned by `user_id`.
    fn find_one(&self, id: &str, user_id: &str) -> RepoResult<Option<Note>>;
    /// Lists one page of `user_id`'s notes, optionally restricted to `tag`.
    fn find_page(
        &self,
        user_id: &str,
        tag: Option<Tag>,
        request: &PageRequest,
    ) -> RepoResult<StoredPage>;
    /// Persists a new note together with its tag set.
    fn insert_note(&mut self, note: &Note) -> RepoResult<()>;
    /// Replaces title, text and tags of the note matching `(note.id, note.user_id)`.
    fn update_note(&mut self, note: &Note) -> RepoResult<()>;
    /// Hard-deletes the note matching `(id, user_id)`; tags cascade.
    fn delete_one(&mut self, id: &str, user_id: &str) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["notes", "note_tags"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn find_one(&self, id: &str, user_id: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id, user_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(self.conn, row)?));
        }

        Ok(None)
    }

    fn find_page(
        &self,
        user_id: &str,
        tag: Option<Tag>,
        request: &PageRequest,
    ) -> RepoResult<StoredPage> {
        let mut filter = String::from(" WHERE user_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(user_id.to_string())];
        if let Some(tag) = tag {
            filter.push_str(TAG_FILTER_SQL);
            bind_values.push(Value::Text(tag.as_str().to_string()));
        }

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM notes{filter};"),
            params_from_iter(bind_values.iter()),
            |row| row.get(0),
        )?;
        let total_items = u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{total}`")))?;

        let sql = format!(
            "{NOTE_SELECT_SQL}{filter}
             ORDER BY created_at DESC, id ASC
             LIMIT ? OFFSET ?;"
        );
        bind_values.push(Value::Integer(request.limit()));
        bind_values.push(Value::Integer(request.offset()));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_note_row(self.conn, row)?);
        }

        Ok(StoredPage { items, total_items })
    }

    fn insert_note(&mut self, note: &Note) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO notes (id, user_id, title, text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                note.id.as_str(),
                note.user_id.as_str(),
                note.title.as_str(),
                note.text.as_str(),
                note.created_at,
            ],
        )?;
        write_tags(&tx, note.id.as_str(), &note.tags)?;
        tx.commit()?;
        Ok(())
    }

    fn update_note(&mut self, note: &Note) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE notes
             SET
                title = ?3,
                text = ?4
             WHERE id = ?1
               AND user_id = ?2;",
            params![
                note.id.as_str(),
                note.user_id.as_str(),
                note.title.as_str(),
                note.text.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(note.id.clone()));
        }

        tx.execute(
            "DELETE FROM note_tags WHERE note_id = ?1;",
            [note.id.as_str()],
        )?;
        write_tags(&tx, note.id.as_str(), &note.tags)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_one(&mut self, id: &str, user_id: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes
             WHERE id = ?1
               AND user_id = ?2;",
            params![id, user_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

fn write_tags(tx: &Transaction<'_>, note_id: &str, tags: &BTreeSet<Tag>) -> RepoResult<()> {
    for tag in tags {
        tx.execute(
            "INSERT INTO note_tags (note_id, tag) VALUES (?1, ?2);",
            params![note_id, tag.as_str()],
        )?;
    }
    Ok(())
}

fn parse_note_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Note> {
    let id: String = row.get("id")?;
    let tags = load_tags_for_note(conn, &id)?;
    Ok(Note {
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
        tags,
        id,
    })
}

fn load_tags_for_note(conn: &Connection, note_id: &str) -> RepoResult<BTreeSet<Tag>> {
    let mut stmt = conn.prepare("SELECT tag FROM note_tags WHERE note_id = ?1;")?;
    let mut rows = stmt.query([note_id])?;
    let mut tags = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        let tag = value.parse::<Tag>().map_err(|_| {
            RepoError::InvalidData(format!("invalid tag `{value}` in note_tags.tag"))
        })?;
        tags.insert(tag);
    }
    Ok(tags)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
