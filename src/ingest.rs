use crate::db::{self, Store};
use crate::roster::{self, ColumnLabels, DecodeError, Encoding, ParsedRow, RosterError, RowError};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// What happens to a staged row whose four-column key already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    Skip,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub records_loaded: usize,
    pub students: usize,
}

#[derive(Debug)]
pub enum IngestError {
    Decode(DecodeError),
    Roster(RosterError),
    Rows(Vec<RowError>),
    Store(anyhow::Error),
}

impl IngestError {
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::Decode(_) => "decode_failed",
            IngestError::Roster(e) => e.code(),
            IngestError::Rows(_) => "validation_failed",
            IngestError::Store(_) => "ingest_failed",
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Decode(e) => e.fmt(f),
            IngestError::Roster(e) => e.fmt(f),
            IngestError::Rows(_) => f.write_str("Validation failed"),
            IngestError::Store(e) => write!(f, "ingestion failed: {e}"),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<DecodeError> for IngestError {
    fn from(e: DecodeError) -> Self {
        IngestError::Decode(e)
    }
}

impl From<RosterError> for IngestError {
    fn from(e: RosterError) -> Self {
        IngestError::Roster(e)
    }
}

/// Rows ready to commit, produced without touching the store.
#[derive(Debug)]
pub struct PreparedUpload {
    pub encoding: Encoding,
    pub rows: Vec<ParsedRow>,
}

impl PreparedUpload {
    /// Distinct full names across the submitted rows, duplicates included.
    pub fn students(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.full_name.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Decodes and validates an upload. Any row error rejects the whole upload.
pub fn prepare_upload(bytes: &[u8], labels: &ColumnLabels) -> Result<PreparedUpload, IngestError> {
    let (text, encoding) = roster::decode_upload(bytes)?;
    let parsed = roster::parse_roster(&text, labels)?;
    if !parsed.errors.is_empty() {
        return Err(IngestError::Rows(parsed.errors));
    }
    Ok(PreparedUpload {
        encoding,
        rows: parsed.rows,
    })
}

/// Stages `rows` and merges them into `grades` in one transaction. Returns
/// how many rows were newly inserted.
pub fn commit_rows(
    conn: &mut Connection,
    rows: &[ParsedRow],
    policy: ConflictPolicy,
) -> anyhow::Result<usize> {
    db::ensure_stage(conn)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute("DELETE FROM temp.grades_stage", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO temp.grades_stage(grade_date, group_no, full_name, grade)
             VALUES(?, ?, ?, ?)",
        )?;
        for r in rows {
            stmt.execute((&r.grade_date, &r.group_no, &r.full_name, r.grade))?;
        }
    }
    let inserted = merge_staged(&tx, policy)?;
    tx.commit()?;
    Ok(inserted)
}

fn merge_staged(conn: &Connection, policy: ConflictPolicy) -> rusqlite::Result<usize> {
    // `WHERE true` keeps SQLite from reading ON CONFLICT as a join clause.
    let sql = match policy {
        ConflictPolicy::Skip => {
            "INSERT INTO grades(grade_date, group_no, full_name, grade)
             SELECT grade_date, group_no, full_name, grade FROM temp.grades_stage WHERE true
             ON CONFLICT(grade_date, group_no, full_name, grade) DO NOTHING"
        }
        ConflictPolicy::Fail => {
            "INSERT INTO grades(grade_date, group_no, full_name, grade)
             SELECT grade_date, group_no, full_name, grade FROM temp.grades_stage"
        }
    };
    conn.execute(sql, [])
}

/// Full upload path: validate, then commit unless there is nothing to load.
/// The store is only touched once the upload is known to be clean.
pub fn ingest_upload(
    store: &Store,
    bytes: &[u8],
    labels: &ColumnLabels,
) -> Result<UploadSummary, IngestError> {
    let prepared = prepare_upload(bytes, labels)?;
    if prepared.rows.is_empty() {
        return Ok(UploadSummary {
            records_loaded: 0,
            students: 0,
        });
    }
    let mut conn = store.connect().map_err(IngestError::Store)?;
    let records_loaded =
        commit_rows(&mut conn, &prepared.rows, ConflictPolicy::Skip).map_err(IngestError::Store)?;
    tracing::debug!(
        encoding = ?prepared.encoding,
        attempted = prepared.rows.len(),
        records_loaded,
        "merged staged grades"
    );
    Ok(UploadSummary {
        records_loaded,
        students: prepared.students(),
    })
}
