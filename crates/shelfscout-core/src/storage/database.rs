use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OpenFlags, params};

use crate::error::{Result, ShelfError};
use crate::models::{LocalRecord, NewLocalRecord};

/// SQLite store holding the user's own library.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        register_functions(&conn)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        register_functions(&conn)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an existing database without creating the file or touching the schema.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        register_functions(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ShelfError::LockPoisoned)
    }

    fn init_schema(&self) -> Result<()> {
        self.connection()?.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS books (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                title       TEXT NOT NULL,
                author      TEXT NOT NULL,
                page_count  INTEGER NOT NULL,
                cover_url   TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
            CREATE INDEX IF NOT EXISTS idx_books_author ON books(author);
            ",
        )?;
        Ok(())
    }

    pub fn insert_record(&self, record: &NewLocalRecord) -> Result<LocalRecord> {
        if record.title.trim().is_empty() {
            return Err(ShelfError::ValidationError("title is empty".to_string()));
        }
        if record.author.trim().is_empty() {
            return Err(ShelfError::ValidationError("author is empty".to_string()));
        }

        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO books (title, author, page_count, cover_url) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.title,
                record.author,
                record.page_count,
                record.cover_url
            ],
        )?;

        Ok(LocalRecord {
            id: conn.last_insert_rowid(),
            title: record.title.clone(),
            author: record.author.clone(),
            page_count: record.page_count,
            cover_url: record.cover_url.clone(),
        })
    }

    pub fn count_records(&self) -> Result<usize> {
        let count: i64 = self
            .connection()?
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Records whose title or author contains `text`, ignoring case,
    /// in insertion order. `%` and `_` in `text` match literally.
    pub fn search_records(&self, text: &str) -> Result<Vec<LocalRecord>> {
        let pattern = format!("%{}%", escape_like(&text.to_lowercase()));
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, author, page_count, cover_url
             FROM books
             WHERE lower_unicode(title) LIKE ?1 ESCAPE '\\'
                OR lower_unicode(author) LIKE ?1 ESCAPE '\\'
             ORDER BY id",
        )?;

        let rows = stmt
            .query_map(params![pattern], row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

/// `lower_unicode(text)`: full Unicode lower-casing; SQLite's own `lower` folds ASCII only.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "lower_unicode",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    Ok(())
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<LocalRecord> {
    Ok(LocalRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        page_count: row.get(3)?,
        cover_url: row.get(4)?,
    })
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
