use chrono::NaiveDate;
use std::fmt;
use std::num::IntErrorKind;

pub const GROUP_MAX_CHARS: usize = 32;
pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 256;
pub const GRADE_MIN: i64 = 2;
pub const GRADE_MAX: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    InvalidDate(String),
    EmptyGroup,
    GroupTooLong,
    EmptyName,
    NameTooShort,
    NameTooLong,
    EmptyGrade,
    GradeNotInteger(String),
    GradeOutOfRange(String),
}

impl FieldError {
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::InvalidDate(_) => "invalid_date",
            FieldError::EmptyGroup => "empty_group",
            FieldError::GroupTooLong => "group_too_long",
            FieldError::EmptyName => "empty_name",
            FieldError::NameTooShort => "name_too_short",
            FieldError::NameTooLong => "name_too_long",
            FieldError::EmptyGrade => "empty_grade",
            FieldError::GradeNotInteger(_) => "grade_not_integer",
            FieldError::GradeOutOfRange(_) => "grade_out_of_range",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::InvalidDate(v) => write!(f, "Invalid date: {v}"),
            FieldError::EmptyGroup => f.write_str("Group is empty"),
            FieldError::GroupTooLong => f.write_str("Group is too long"),
            FieldError::EmptyName => f.write_str("Full name is empty"),
            FieldError::NameTooShort => f.write_str("Full name is too short"),
            FieldError::NameTooLong => f.write_str("Full name is too long"),
            FieldError::EmptyGrade => f.write_str("Grade is empty"),
            FieldError::GradeNotInteger(v) => write!(f, "Grade is not an integer: {v}"),
            FieldError::GradeOutOfRange(v) => {
                write!(f, "Grade out of range [{GRADE_MIN}..{GRADE_MAX}]: {v}")
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// Absent cells behave like empty ones.
fn trimmed(value: Option<&str>) -> &str {
    value.map(str::trim).unwrap_or("")
}

/// Accepts `DD.MM.YYYY` only: two-digit day and month, four-digit year.
pub fn parse_date(value: Option<&str>) -> Result<NaiveDate, FieldError> {
    let v = trimmed(value);
    let b = v.as_bytes();
    let shaped = b.len() == 10
        && b[2] == b'.'
        && b[5] == b'.'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 2 || i == 5 || c.is_ascii_digit());
    if !shaped {
        return Err(FieldError::InvalidDate(v.to_string()));
    }
    NaiveDate::parse_from_str(v, "%d.%m.%Y").map_err(|_| FieldError::InvalidDate(v.to_string()))
}

pub fn parse_group(value: Option<&str>) -> Result<String, FieldError> {
    let v = trimmed(value);
    if v.is_empty() {
        return Err(FieldError::EmptyGroup);
    }
    if v.chars().count() > GROUP_MAX_CHARS {
        return Err(FieldError::GroupTooLong);
    }
    Ok(v.to_string())
}

pub fn parse_name(value: Option<&str>) -> Result<String, FieldError> {
    let v = trimmed(value);
    if v.is_empty() {
        return Err(FieldError::EmptyName);
    }
    let len = v.chars().count();
    if len < NAME_MIN_CHARS {
        return Err(FieldError::NameTooShort);
    }
    if len > NAME_MAX_CHARS {
        return Err(FieldError::NameTooLong);
    }
    Ok(v.to_string())
}

pub fn parse_grade(value: Option<&str>) -> Result<i64, FieldError> {
    let v = trimmed(value);
    if v.is_empty() {
        return Err(FieldError::EmptyGrade);
    }
    let g = match v.parse::<i64>() {
        Ok(g) => g,
        Err(e) => {
            return Err(match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    FieldError::GradeOutOfRange(v.to_string())
                }
                _ => FieldError::GradeNotInteger(v.to_string()),
            })
        }
    };
    if !(GRADE_MIN..=GRADE_MAX).contains(&g) {
        return Err(FieldError::GradeOutOfRange(g.to_string()));
    }
    Ok(g)
}
