//! Author model and related types

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;

use super::dates;
use crate::validation::{Rule, Validated, Validator};

/// Sentinel shown when no birth date is known
pub const UNKNOWN_LIFESPAN: &str = "Age information not found";

/// Stored author fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AuthorFields {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Author document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: AuthorFields,
}

/// Age in completed years, or unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifespan {
    Years(u32),
    Unknown,
}

impl Serialize for Lifespan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Lifespan::Years(years) => serializer.serialize_u32(*years),
            Lifespan::Unknown => serializer.serialize_str(UNKNOWN_LIFESPAN),
        }
    }
}

impl std::fmt::Display for Lifespan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifespan::Years(years) => write!(f, "{}", years),
            Lifespan::Unknown => f.write_str(UNKNOWN_LIFESPAN),
        }
    }
}

impl AuthorFields {
    /// `"family_name, first_name"`, or empty if either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Lifespan measured to the date of death, or to today for living authors
    pub fn lifespan(&self) -> Lifespan {
        self.lifespan_at(Utc::now().date_naive())
    }

    pub fn lifespan_at(&self, today: NaiveDate) -> Lifespan {
        match self.date_of_birth {
            Some(born) => Lifespan::Years(dates::whole_years_between(
                born,
                self.date_of_death.unwrap_or(today),
            )),
            None => Lifespan::Unknown,
        }
    }

    pub fn with_id(self, id: Uuid) -> Author {
        Author { id, fields: self }
    }

    pub fn view(&self) -> AuthorView<'_> {
        AuthorView::new(None, self)
    }
}

impl Author {
    pub fn url(&self) -> String {
        url(self.id)
    }

    pub fn name(&self) -> String {
        self.fields.name()
    }

    pub fn view(&self) -> AuthorView<'_> {
        AuthorView::new(Some(self.id), &self.fields)
    }
}

/// Canonical URL of an author
pub fn url(id: Uuid) -> String {
    format!("/catalog/author/{}", id)
}

/// Author as handed to the view renderer, with the derived fields filled in
#[derive(Debug, Serialize)]
pub struct AuthorView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub fields: &'a AuthorFields,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub lifespan: Lifespan,
    pub date_of_birth_formatted: String,
    pub date_of_death_formatted: String,
    pub date_of_birth_yyyy_mm_dd: String,
    pub date_of_death_yyyy_mm_dd: String,
}

impl<'a> AuthorView<'a> {
    fn new(id: Option<Uuid>, fields: &'a AuthorFields) -> Self {
        Self {
            id,
            name: fields.name(),
            url: id.map(url),
            lifespan: fields.lifespan(),
            date_of_birth_formatted: dates::medium(fields.date_of_birth),
            date_of_death_formatted: dates::medium(fields.date_of_death),
            date_of_birth_yyyy_mm_dd: dates::iso(fields.date_of_birth),
            date_of_death_yyyy_mm_dd: dates::iso(fields.date_of_death),
            fields,
        }
    }
}

const FIRST_NAME: &[Rule] = &[
    Rule::Trim,
    Rule::required("First name must be specified."),
    Rule::Length {
        min: 1,
        max: Some(100),
        message: "First name must not exceed 100 characters.",
    },
    Rule::Escape,
    Rule::Alphanumeric("First name has non-alphanumeric characters."),
];

const FAMILY_NAME: &[Rule] = &[
    Rule::Trim,
    Rule::required("Family name must be specified."),
    Rule::Length {
        min: 1,
        max: Some(100),
        message: "Family name must not exceed 100 characters.",
    },
    Rule::Escape,
    Rule::Alphanumeric("Family name has non-alphanumeric characters."),
];

/// Author create/update form body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorForm {
    pub first_name: Option<String>,
    pub family_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
}

impl AuthorForm {
    pub fn validate(&self) -> Validated<AuthorFields> {
        let mut v = Validator::new();
        let first_name = v.text("first_name", self.first_name.as_deref(), FIRST_NAME);
        let family_name = v.text("family_name", self.family_name.as_deref(), FAMILY_NAME);
        let date_of_birth = v.optional_date(
            "date_of_birth",
            self.date_of_birth.as_deref(),
            "Invalid date of birth",
        );
        let date_of_death = v.optional_date(
            "date_of_death",
            self.date_of_death.as_deref(),
            "Invalid date of death",
        );
        v.finish(AuthorFields {
            first_name,
            family_name,
            date_of_birth,
            date_of_death,
        })
    }
}
