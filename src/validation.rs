//! Declarative form validation and sanitization.
//!
//! Each form field runs through an ordered list of [`Rule`]s. Sanitizers
//! (trim, escape) always apply so a rejected form can be redisplayed with the
//! user's cleaned-up input. Checks stop at the first failure within a field,
//! but every field is checked before the outcome is returned.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;
use validator::ValidateLength;

/// Accepted calendar-date format for date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One step of a field pipeline
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Strip leading and trailing whitespace
    Trim,
    /// Character count must fall within `min..=max`
    Length {
        min: u64,
        max: Option<u64>,
        message: &'static str,
    },
    /// Replace markup-significant characters with HTML entities
    Escape,
    /// ASCII letters and digits only
    Alphanumeric(&'static str),
    /// Value must parse as a document identifier
    Identifier(&'static str),
}

impl Rule {
    /// Required non-empty field
    pub const fn required(message: &'static str) -> Self {
        Rule::Length {
            min: 1,
            max: None,
            message,
        }
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered list of field errors, in field declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether `field` already has an error recorded
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// First message recorded for `field`
    pub fn message(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Sanitized values paired with the errors found while producing them
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub value: T,
    pub errors: FieldErrors,
}

impl<T> Validated<T> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Accumulates errors across the fields of one form
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a text field through its pipeline and return the sanitized value.
    /// An absent field is treated as the empty string.
    pub fn text(&mut self, field: &'static str, raw: Option<&str>, rules: &[Rule]) -> String {
        let mut value = raw.unwrap_or_default().to_string();
        let mut failed = false;

        for rule in rules {
            match *rule {
                Rule::Trim => value = value.trim().to_string(),
                Rule::Escape => value = escape(&value),
                _ if failed => {}
                Rule::Length { min, max, message } => {
                    if !value.validate_length(Some(min), max, None) {
                        self.push(field, message);
                        failed = true;
                    }
                }
                Rule::Alphanumeric(message) => {
                    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
                        self.push(field, message);
                        failed = true;
                    }
                }
                Rule::Identifier(message) => {
                    if Uuid::parse_str(&value).is_err() {
                        self.push(field, message);
                        failed = true;
                    }
                }
            }
        }

        value
    }

    /// Optional calendar date: empty means absent, anything else must be a
    /// strict `YYYY-MM-DD` date.
    pub fn optional_date(
        &mut self,
        field: &'static str,
        raw: Option<&str>,
        message: &'static str,
    ) -> Option<NaiveDate> {
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return None;
        }
        match parse_strict_date(value) {
            Some(date) => Some(date),
            None => {
                self.push(field, message);
                None
            }
        }
    }

    /// Record a failure found outside the rule pipeline. Ignored when the
    /// field already failed.
    pub fn reject(&mut self, field: &'static str, message: &'static str) {
        if !self.errors.iter().any(|e| e.field == field) {
            self.push(field, message);
        }
    }

    pub fn finish<T>(self, value: T) -> Validated<T> {
        Validated {
            value,
            errors: FieldErrors(self.errors),
        }
    }

    fn push(&mut self, field: &'static str, message: &str) {
        self.errors.push(FieldError {
            field,
            message: message.to_string(),
        });
    }
}

/// Escape `& < > " ' / \` and backticks as HTML entities
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// `YYYY-MM-DD` with exactly four, two and two digits
fn parse_strict_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}
