//! Book instance (physical copy) model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::dates;
use crate::validation::{Rule, Validated, Validator};

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status text that names none of the known statuses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown book instance status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for BookInstanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for BookInstanceStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookInstanceFields {
    /// Book identifier. Nil on a rejected form whose book did not parse.
    pub book: Uuid,
    pub imprint: String,
    #[sqlx(try_from = "String")]
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

/// Book instance document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: BookInstanceFields,
}

impl BookInstanceFields {
    pub fn with_id(self, id: Uuid) -> BookInstance {
        BookInstance { id, fields: self }
    }

    pub fn view(&self) -> BookInstanceView<'_> {
        BookInstanceView::new(None, self)
    }
}

impl BookInstance {
    pub fn url(&self) -> String {
        url(self.id)
    }

    pub fn view(&self) -> BookInstanceView<'_> {
        BookInstanceView::new(Some(self.id), &self.fields)
    }
}

pub fn url(id: Uuid) -> String {
    format!("/catalog/bookinstance/{}", id)
}

#[derive(Debug, Serialize)]
pub struct BookInstanceView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub fields: &'a BookInstanceFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub due_back_formatted: String,
    pub due_back_yyyy_mm_dd: String,
}

impl<'a> BookInstanceView<'a> {
    fn new(id: Option<Uuid>, fields: &'a BookInstanceFields) -> Self {
        Self {
            id,
            url: id.map(url),
            due_back_formatted: dates::medium(fields.due_back),
            due_back_yyyy_mm_dd: dates::iso(fields.due_back),
            fields,
        }
    }
}

const BOOK: &[Rule] = &[
    Rule::Trim,
    Rule::required("Book must be specified"),
    Rule::Escape,
    Rule::Identifier("Book must be specified"),
];

const IMPRINT: &[Rule] = &[
    Rule::Trim,
    Rule::required("Imprint must be specified"),
    Rule::Escape,
];

const STATUS: &[Rule] = &[Rule::Trim, Rule::Escape];

/// Book instance create/update form body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookInstanceForm {
    pub book: Option<String>,
    pub imprint: Option<String>,
    pub status: Option<String>,
    pub due_back: Option<String>,
}

impl BookInstanceForm {
    pub fn validate(&self) -> Validated<BookInstanceFields> {
        let mut v = Validator::new();
        let book = v.text("book", self.book.as_deref(), BOOK);
        let imprint = v.text("imprint", self.imprint.as_deref(), IMPRINT);
        let status = v.text("status", self.status.as_deref(), STATUS);
        let status = if status.is_empty() {
            BookInstanceStatus::default()
        } else {
            status.parse::<BookInstanceStatus>().unwrap_or_else(|_| {
                v.reject("status", "Invalid status");
                BookInstanceStatus::default()
            })
        };
        let due_back = v.optional_date("due_back", self.due_back.as_deref(), "Invalid date");

        v.finish(BookInstanceFields {
            book: Uuid::parse_str(&book).unwrap_or_default(),
            imprint,
            status,
            due_back,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in BookInstanceStatus::ALL {
            assert_eq!(status.as_str().parse::<BookInstanceStatus>(), Ok(status));
        }
        assert!("Lost".parse::<BookInstanceStatus>().is_err());
    }

    #[test]
    fn test_valid_form() {
        let book = Uuid::new_v4();
        let out = BookInstanceForm {
            book: Some(book.to_string()),
            imprint: Some(" Penguin, 2003 ".into()),
            status: Some("Loaned".into()),
            due_back: Some("2024-03-01".into()),
        }
        .validate();
        assert!(out.is_valid());
        assert_eq!(out.value.book, book);
        assert_eq!(out.value.imprint, "Penguin, 2003");
        assert_eq!(out.value.status, BookInstanceStatus::Loaned);
        assert_eq!(out.value.due_back, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_defaults_and_errors() {
        let out = BookInstanceForm::default().validate();
        assert_eq!(out.value.status, BookInstanceStatus::Maintenance);
        assert_eq!(out.errors.message("book"), Some("Book must be specified"));
        assert_eq!(
            out.errors.message("imprint"),
            Some("Imprint must be specified")
        );
        assert!(!out.errors.has("status"));

        let out = BookInstanceForm {
            status: Some("Lost".into()),
            due_back: Some("soon".into()),
            ..Default::default()
        }
        .validate();
        assert_eq!(out.errors.message("status"), Some("Invalid status"));
        assert_eq!(out.errors.message("due_back"), Some("Invalid date"));
    }

    #[test]
    fn test_view_dates() {
        let instance = BookInstanceFields {
            book: Uuid::new_v4(),
            imprint: "Penguin".into(),
            status: BookInstanceStatus::Available,
            due_back: NaiveDate::from_ymd_opt(2024, 3, 1),
        }
        .with_id(Uuid::new_v4());
        let value = serde_json::to_value(instance.view()).unwrap();
        assert_eq!(value["status"], "Available");
        assert_eq!(value["due_back_formatted"], "Mar 1, 2024");
        assert_eq!(value["due_back_yyyy_mm_dd"], "2024-03-01");
        assert_eq!(value["url"], format!("/catalog/bookinstance/{}", instance.id));
    }
}
