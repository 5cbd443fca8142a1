use std::fmt;

use jiff::civil::Date;
use serde::Serialize;

pub const NOT_NULL: &str = "field cannot be null";
pub const NOT_EMPTY: &str = "field cannot be empty";
pub const NOT_BEFORE_TODAY: &str = "date must be before the current date";
pub const NOT_A_DATE: &str = "date must use the YYYY-MM-DD format";

/// A single failed rule, reported to clients as `{path, message}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Collects rule failures while a model is being checked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, path: &str, message: impl Into<String>) {
        self.0.push(FieldError { path: path.to_string(), message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Records a null failure when `value` is absent.
    pub fn require<'a, T>(&mut self, path: &str, value: Option<&'a T>) -> Option<&'a T> {
        if value.is_none() {
            self.push(path, NOT_NULL);
        }
        value
    }

    /// Returns whether `value` has content, recording a failure otherwise.
    pub fn not_empty(&mut self, path: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.push(path, NOT_EMPTY);
            return false;
        }
        true
    }

    pub fn max_chars(&mut self, path: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.push(path, format!("field cannot be longer than {max} characters"));
        }
    }

    pub fn within(&mut self, path: &str, value: f64, min: f64, max: f64) {
        if !value.is_finite() || value < min || value > max {
            self.push(path, format!("field must be between {min} and {max}"));
        }
    }

    pub fn non_negative(&mut self, path: &str, value: i64) {
        if value < 0 {
            self.push(path, "field cannot be negative");
        }
    }

    /// Checks that `value` is a calendar date strictly earlier than `today`.
    pub fn before(&mut self, path: &str, value: &str, today: Date) {
        match value.trim().parse::<Date>() {
            Ok(date) if date < today => {},
            Ok(_) => self.push(path, NOT_BEFORE_TODAY),
            Err(_) => self.push(path, NOT_A_DATE),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.path, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
