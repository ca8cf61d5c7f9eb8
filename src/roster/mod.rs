pub mod decode;
pub mod fields;
pub mod reader;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub use decode::{decode_upload, DecodeError, Encoding};
pub use fields::FieldError;

pub const CSV_DELIMITER: char = ';';
pub const DEFAULT_COLUMN_LABELS: [&str; 4] = ["Дата", "Номер группы", "ФИО", "Оценка"];

/// Key under which cells past the header width are kept in `RowError::raw`.
pub const EXTRA_CELLS_KEY: &str = "_extra";

/// Header labels in column order: date, group, full name, grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLabels {
    pub date: String,
    pub group: String,
    pub full_name: String,
    pub grade: String,
}

impl ColumnLabels {
    pub fn as_array(&self) -> [&str; 4] {
        [
            self.date.as_str(),
            self.group.as_str(),
            self.full_name.as_str(),
            self.grade.as_str(),
        ]
    }
}

impl Default for ColumnLabels {
    fn default() -> Self {
        let [date, group, full_name, grade] = DEFAULT_COLUMN_LABELS;
        Self {
            date: date.to_string(),
            group: group.to_string(),
            full_name: full_name.to_string(),
            grade: grade.to_string(),
        }
    }
}

impl FromStr for ColumnLabels {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(CSV_DELIMITER)
            .map(|p| p.trim().to_string())
            .collect::<Vec<_>>();
        if parts.iter().any(|p| p.is_empty()) {
            anyhow::bail!("column labels must not be empty, got {:?}", s);
        }
        for (i, p) in parts.iter().enumerate() {
            if parts[..i].contains(p) {
                anyhow::bail!("duplicate column label: {}", p);
            }
        }
        let [date, group, full_name, grade]: [String; 4] = parts.try_into().map_err(|_| {
            anyhow::anyhow!(
                "expected four column labels separated by '{}', got {:?}",
                CSV_DELIMITER,
                s
            )
        })?;
        Ok(Self {
            date,
            group,
            full_name,
            grade,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub grade_date: NaiveDate,
    pub group_no: String,
    pub full_name: String,
    pub grade: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub line: usize,
    pub error: String,
    pub raw: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    EmptyFile,
    InvalidHeaders { expected: Vec<String>, got: Vec<String> },
}

impl RosterError {
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::EmptyFile => "empty_file",
            RosterError::InvalidHeaders { .. } => "invalid_headers",
        }
    }
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::EmptyFile => f.write_str("CSV is empty"),
            RosterError::InvalidHeaders { expected, got } => write!(
                f,
                "Invalid CSV headers: expected {:?}, got {:?}",
                expected, got
            ),
        }
    }
}

impl std::error::Error for RosterError {}

#[derive(Debug, Default)]
pub struct RosterParse {
    pub rows: Vec<ParsedRow>,
    pub errors: Vec<RowError>,
}

pub fn validate_headers(headers: &[String], labels: &ColumnLabels) -> Result<(), RosterError> {
    let got = headers.iter().map(|h| h.trim()).collect::<Vec<_>>();
    if got != labels.as_array() {
        return Err(RosterError::InvalidHeaders {
            expected: labels.as_array().iter().map(|s| s.to_string()).collect(),
            got: got.into_iter().map(str::to_string).collect(),
        });
    }
    Ok(())
}

/// Validates the header, then parses every data row. Row failures are
/// collected (first failing field per row) and never stop the scan.
///
/// The header must be the first line. A blank first line is an empty header.
pub fn parse_roster(text: &str, labels: &ColumnLabels) -> Result<RosterParse, RosterError> {
    if text.is_empty() {
        return Err(RosterError::EmptyFile);
    }
    let mut records = reader::read_records(text, CSV_DELIMITER).into_iter();
    let header = match records.next() {
        Some(record) if record.line == 1 => record,
        _ => {
            return Err(RosterError::InvalidHeaders {
                expected: labels.as_array().iter().map(|s| s.to_string()).collect(),
                got: Vec::new(),
            });
        }
    };
    validate_headers(&header.fields, labels)?;

    let mut out = RosterParse::default();
    for record in records {
        match parse_record(&record.fields) {
            Ok(row) => out.rows.push(row),
            Err(e) => out.errors.push(RowError {
                line: record.line,
                error: e.to_string(),
                raw: raw_row(&header.fields, &record.fields),
            }),
        }
    }
    Ok(out)
}

fn parse_record(cells: &[String]) -> Result<ParsedRow, FieldError> {
    let cell = |i: usize| cells.get(i).map(String::as_str);
    Ok(ParsedRow {
        grade_date: fields::parse_date(cell(0))?,
        group_no: fields::parse_group(cell(1))?,
        full_name: fields::parse_name(cell(2))?,
        grade: fields::parse_grade(cell(3))?,
    })
}

fn raw_row(header: &[String], cells: &[String]) -> Map<String, Value> {
    let mut raw = Map::new();
    for (i, name) in header.iter().enumerate() {
        let v = cells
            .get(i)
            .map(|c| Value::String(c.clone()))
            .unwrap_or(Value::Null);
        raw.insert(name.clone(), v);
    }
    if cells.len() > header.len() {
        let extra = cells[header.len()..]
            .iter()
            .map(|c| Value::String(c.clone()))
            .collect::<Vec<_>>();
        raw.insert(EXTRA_CELLS_KEY.to_string(), Value::Array(extra));
    }
    raw
}
