use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Handle to the grades store. Cheap to clone; every unit of work opens its
/// own connection so staging tables never leak between requests.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Store {
    pub fn open(path: impl Into<PathBuf>, busy_timeout: Duration) -> anyhow::Result<Store> {
        let store = Store {
            path: path.into(),
            busy_timeout,
        };
        if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = store.connect()?;
        ensure_schema(&conn)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> anyhow::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(conn)
    }

    pub fn ping(&self) -> anyhow::Result<()> {
        let conn = self.connect()?;
        let one: i64 = conn.query_row("SELECT 1", [], |r| r.get(0))?;
        anyhow::ensure!(one == 1, "unexpected liveness result: {}", one);
        Ok(())
    }
}

pub fn ensure_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS grades(
            id INTEGER PRIMARY KEY,
            grade_date TEXT NOT NULL,
            group_no TEXT NOT NULL,
            full_name TEXT NOT NULL,
            grade INTEGER NOT NULL CHECK(grade BETWEEN 2 AND 5),
            UNIQUE(grade_date, group_no, full_name, grade)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_grades_full_name ON grades(full_name)",
        [],
    )?;
    Ok(())
}

/// Connection-scoped staging table; other connections never see it.
pub fn ensure_stage(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TEMP TABLE IF NOT EXISTS grades_stage(
            grade_date TEXT NOT NULL,
            group_no TEXT NOT NULL,
            full_name TEXT NOT NULL,
            grade INTEGER NOT NULL
        )",
        [],
    )?;
    Ok(())
}

pub fn grades_count(conn: &Connection) -> anyhow::Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM grades", [], |r| r.get(0))?)
}
