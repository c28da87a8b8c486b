use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};
use uuid::Uuid;

use super::{ReviewStore, StoreError};
use crate::models::{Anchor, Comment, Identity, Plan, Reviewer, Thread, ThreadStatus, Version};

/// SQLite-backed store. Timestamps are stored as Unix milliseconds.
#[derive(Debug)]
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and migrates it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        let store = Self {
            path: Some(path),
            conn,
        };
        store.migrate()?;
        log::debug!("opened review store at {:?}", store.path);
        Ok(store)
    }

    /// A private in-memory database with the full schema.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            path: None,
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA foreign_keys=ON;

            CREATE TABLE IF NOT EXISTS plans (
              id TEXT PRIMARY KEY,
              title TEXT NOT NULL,
              project_name TEXT NOT NULL DEFAULT '',
              plan_filename TEXT NOT NULL DEFAULT '',
              created_by_email TEXT NOT NULL,
              created_by_name TEXT NOT NULL,
              created_at INTEGER NOT NULL,
              updated_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS plan_versions (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              plan_id TEXT NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
              version INTEGER NOT NULL,
              content TEXT NOT NULL,
              submitted_by_email TEXT NOT NULL,
              submitted_by_name TEXT NOT NULL,
              created_at INTEGER NOT NULL,
              UNIQUE(plan_id, version)
            );

            CREATE TABLE IF NOT EXISTS reviewers (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              plan_id TEXT NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
              version INTEGER NOT NULL,
              email TEXT NOT NULL,
              name TEXT NOT NULL,
              completed_at INTEGER,
              UNIQUE(plan_id, version, email)
            );

            CREATE TABLE IF NOT EXISTS block_threads (
              id TEXT PRIMARY KEY,
              plan_id TEXT NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
              version INTEGER NOT NULL,
              block_id TEXT NOT NULL,
              start_line INTEGER NOT NULL,
              end_line INTEGER NOT NULL,
              author_email TEXT NOT NULL,
              author_name TEXT NOT NULL,
              status TEXT NOT NULL DEFAULT 'open',
              created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS block_comments (
              id TEXT PRIMARY KEY,
              thread_id TEXT NOT NULL REFERENCES block_threads(id) ON DELETE CASCADE,
              author_email TEXT NOT NULL,
              author_name TEXT NOT NULL,
              content TEXT NOT NULL,
              created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS block_threads_plan_version
              ON block_threads(plan_id, version);
            CREATE INDEX IF NOT EXISTS block_comments_thread
              ON block_comments(thread_id);
            "#,
        )?;
        Ok(())
    }

    fn comments_of(&self, thread_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, thread_id, author_email, author_name, content, created_at
            FROM block_comments
            WHERE thread_id = ?1
            ORDER BY created_at ASC, rowid ASC
            "#,
        )?;
        let rows = stmt.query_map(params![thread_id.to_string()], comment_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn attach_comments(&self, mut threads: Vec<Thread>) -> Result<Vec<Thread>, StoreError> {
        for thread in &mut threads {
            thread.comments = self.comments_of(thread.id)?;
        }
        Ok(threads)
    }
}

const PLAN_COLUMNS: &str = "id, title, project_name, plan_filename, created_by_email, created_by_name, created_at, updated_at";
const VERSION_COLUMNS: &str =
    "plan_id, version, content, submitted_by_email, submitted_by_name, created_at";
const THREAD_COLUMNS: &str = "id, plan_id, version, block_id, start_line, end_line, author_email, author_name, status, created_at";

impl ReviewStore for SqliteStore {
    fn insert_plan(&mut self, plan: &Plan, first: &Version) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            &format!("INSERT INTO plans ({PLAN_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            params![
                plan.id,
                plan.title,
                plan.project_name,
                plan.plan_filename,
                plan.created_by.email,
                plan.created_by.name,
                plan.created_at.timestamp_millis(),
                plan.updated_at.timestamp_millis(),
            ],
        )
        .map_err(|e| constraint(e, || format!("plan {}", plan.id)))?;
        insert_version(&tx, first)?;
        tx.commit()?;
        Ok(())
    }

    fn plan(&self, id: &str) -> Result<Option<Plan>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = ?1"),
                params![id],
                plan_row,
            )
            .optional()?)
    }

    fn plans(&self) -> Result<Vec<Plan>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans ORDER BY updated_at DESC, rowid ASC"
        ))?;
        let rows = stmt.query_map([], plan_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn rename_plan(
        &mut self,
        id: &str,
        title: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "UPDATE plans SET title = ?1, updated_at = ?2 WHERE id = ?3",
            params![title, at.timestamp_millis(), id],
        )?;
        Ok(changed > 0)
    }

    fn append_version(&mut self, version: &Version) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        insert_version(&tx, version)?;
        tx.execute(
            "UPDATE plans SET updated_at = ?1 WHERE id = ?2",
            params![version.created_at.timestamp_millis(), version.plan_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn latest_version(&self, plan_id: &str) -> Result<Option<Version>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {VERSION_COLUMNS} FROM plan_versions WHERE plan_id = ?1 ORDER BY version DESC LIMIT 1"
                ),
                params![plan_id],
                version_row,
            )
            .optional()?)
    }

    fn versions(&self, plan_id: &str) -> Result<Vec<Version>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VERSION_COLUMNS} FROM plan_versions WHERE plan_id = ?1 ORDER BY version DESC"
        ))?;
        let rows = stmt.query_map(params![plan_id], version_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn version(&self, plan_id: &str, number: u32) -> Result<Option<Version>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {VERSION_COLUMNS} FROM plan_versions WHERE plan_id = ?1 AND version = ?2"
                ),
                params![plan_id, number],
                version_row,
            )
            .optional()?)
    }

    fn add_reviewer(&mut self, reviewer: &Reviewer) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO reviewers (plan_id, version, email, name, completed_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    reviewer.plan_id,
                    reviewer.version,
                    reviewer.identity.email,
                    reviewer.identity.name,
                    reviewer.completed_at.map(|t| t.timestamp_millis()),
                ],
            )
            .map_err(|e| {
                constraint(e, || {
                    format!(
                        "reviewer {} on version {} of plan {}",
                        reviewer.identity.email, reviewer.version, reviewer.plan_id
                    )
                })
            })?;
        Ok(())
    }

    fn reviewers(&self, plan_id: &str, version: u32) -> Result<Vec<Reviewer>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT plan_id, version, email, name, completed_at
            FROM reviewers
            WHERE plan_id = ?1 AND version = ?2
            ORDER BY id ASC
            "#,
        )?;
        let rows = stmt.query_map(params![plan_id, version], |row| {
            Ok(Reviewer {
                plan_id: row.get(0)?,
                version: row.get(1)?,
                identity: Identity {
                    email: row.get(2)?,
                    name: row.get(3)?,
                },
                completed_at: row
                    .get::<_, Option<i64>>(4)?
                    .map(|ms| millis(4, ms))
                    .transpose()?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn set_review_completed(
        &mut self,
        plan_id: &str,
        version: u32,
        email: &str,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "UPDATE reviewers SET completed_at = ?1 WHERE plan_id = ?2 AND version = ?3 AND email = ?4",
            params![
                completed_at.map(|t| t.timestamp_millis()),
                plan_id,
                version,
                email
            ],
        )?;
        Ok(changed > 0)
    }

    fn insert_thread(&mut self, thread: &Thread) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            &format!(
                "INSERT INTO block_threads ({THREAD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                thread.id.to_string(),
                thread.plan_id,
                thread.version,
                thread.anchor.block_id.as_str(),
                thread.anchor.start_line as i64,
                thread.anchor.end_line as i64,
                thread.author.email,
                thread.author.name,
                thread.status.as_str(),
                thread.created_at.timestamp_millis(),
            ],
        )
        .map_err(|e| constraint(e, || format!("thread {} on plan {}", thread.id, thread.plan_id)))?;
        for comment in &thread.comments {
            insert_comment(&tx, comment)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn threads(&self, plan_id: &str, version: Option<u32>) -> Result<Vec<Thread>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {THREAD_COLUMNS}
            FROM block_threads
            WHERE plan_id = ?1 AND (?2 IS NULL OR version = ?2)
            ORDER BY created_at ASC, rowid ASC
            "#
        ))?;
        let threads = stmt
            .query_map(params![plan_id, version], thread_row)?
            .collect::<Result<Vec<_>, _>>()?;
        self.attach_comments(threads)
    }

    fn thread(&self, id: Uuid) -> Result<Option<Thread>, StoreError> {
        let thread = self
            .conn
            .query_row(
                &format!("SELECT {THREAD_COLUMNS} FROM block_threads WHERE id = ?1"),
                params![id.to_string()],
                thread_row,
            )
            .optional()?;
        match thread {
            Some(t) => Ok(self.attach_comments(vec![t])?.pop()),
            None => Ok(None),
        }
    }

    fn set_thread_status(&mut self, id: Uuid, status: ThreadStatus) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "UPDATE block_threads SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn delete_thread(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM block_comments WHERE thread_id = ?1",
            params![id.to_string()],
        )?;
        let deleted = tx.execute(
            "DELETE FROM block_threads WHERE id = ?1",
            params![id.to_string()],
        )?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    fn insert_comment(&mut self, comment: &Comment) -> Result<(), StoreError> {
        insert_comment(&self.conn, comment)
    }
}

fn insert_version(conn: &Connection, version: &Version) -> Result<(), StoreError> {
    conn.execute(
        &format!("INSERT INTO plan_versions ({VERSION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
        params![
            version.plan_id,
            version.number,
            version.content,
            version.submitted_by.email,
            version.submitted_by.name,
            version.created_at.timestamp_millis(),
        ],
    )
    .map_err(|e| {
        constraint(e, || {
            format!("version {} of plan {}", version.number, version.plan_id)
        })
    })?;
    Ok(())
}

fn insert_comment(conn: &Connection, comment: &Comment) -> Result<(), StoreError> {
    conn.execute(
        r#"
        INSERT INTO block_comments (id, thread_id, author_email, author_name, content, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            comment.id.to_string(),
            comment.thread_id.to_string(),
            comment.author.email,
            comment.author.name,
            comment.content,
            comment.created_at.timestamp_millis(),
        ],
    )
    .map_err(|e| constraint(e, || format!("comment {} on thread {}", comment.id, comment.thread_id)))?;
    Ok(())
}

/// Maps constraint violations to the store's own variants.
fn constraint(err: rusqlite::Error, what: impl FnOnce() -> String) -> StoreError {
    match err.sqlite_error() {
        Some(e) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
            StoreError::MissingParent(what())
        }
        Some(e)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            StoreError::Duplicate(what())
        }
        _ => StoreError::Sqlite(err),
    }
}

fn millis(idx: usize, ms: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ms))
}

fn uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn plan_row(row: &Row<'_>) -> rusqlite::Result<Plan> {
    Ok(Plan {
        id: row.get(0)?,
        title: row.get(1)?,
        project_name: row.get(2)?,
        plan_filename: row.get(3)?,
        created_by: Identity {
            email: row.get(4)?,
            name: row.get(5)?,
        },
        created_at: millis(6, row.get(6)?)?,
        updated_at: millis(7, row.get(7)?)?,
    })
}

fn version_row(row: &Row<'_>) -> rusqlite::Result<Version> {
    Ok(Version {
        plan_id: row.get(0)?,
        number: row.get(1)?,
        content: row.get(2)?,
        submitted_by: Identity {
            email: row.get(3)?,
            name: row.get(4)?,
        },
        created_at: millis(5, row.get(5)?)?,
    })
}

fn thread_row(row: &Row<'_>) -> rusqlite::Result<Thread> {
    let status: String = row.get(8)?;
    let status = status
        .parse::<ThreadStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;
    Ok(Thread {
        id: uuid_at(row, 0)?,
        plan_id: row.get(1)?,
        version: row.get(2)?,
        anchor: Anchor::new(
            row.get::<_, String>(3)?,
            row.get::<_, i64>(4)? as usize,
            row.get::<_, i64>(5)? as usize,
        ),
        author: Identity {
            email: row.get(6)?,
            name: row.get(7)?,
        },
        status,
        created_at: millis(9, row.get(9)?)?,
        comments: Vec::new(),
    })
}

fn comment_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: uuid_at(row, 0)?,
        thread_id: uuid_at(row, 1)?,
        author: Identity {
            email: row.get(2)?,
            name: row.get(3)?,
        },
        content: row.get(4)?,
        created_at: millis(5, row.get(5)?)?,
    })
}
