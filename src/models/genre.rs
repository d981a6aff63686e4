//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{Rule, Validated, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GenreFields {
    pub name: String,
}

/// Genre document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: GenreFields,
}

impl GenreFields {
    pub fn with_id(self, id: Uuid) -> Genre {
        Genre { id, fields: self }
    }
}

impl Genre {
    pub fn url(&self) -> String {
        url(self.id)
    }

    pub fn view(&self) -> GenreView<'_> {
        GenreView {
            genre: self,
            url: self.url(),
        }
    }
}

pub fn url(id: Uuid) -> String {
    format!("/catalog/genre/{}", id)
}

#[derive(Debug, Serialize)]
pub struct GenreView<'a> {
    #[serde(flatten)]
    pub genre: &'a Genre,
    pub url: String,
}

const NAME: &[Rule] = &[
    Rule::Trim,
    Rule::Length {
        min: 3,
        max: None,
        message: "Genre name must contain at least 3 characters",
    },
    Rule::Length {
        min: 0,
        max: Some(100),
        message: "Genre name must not exceed 100 characters",
    },
    Rule::Escape,
];

/// Genre create/update form body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreForm {
    pub name: Option<String>,
}

impl GenreForm {
    pub fn validate(&self) -> Validated<GenreFields> {
        let mut v = Validator::new();
        let name = v.text("name", self.name.as_deref(), NAME);
        v.finish(GenreFields { name })
    }
}
