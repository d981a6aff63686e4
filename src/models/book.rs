//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{Rule, Validated, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookFields {
    pub title: String,
    /// Author identifier. Nil on a rejected form whose author did not parse.
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    /// Genre identifiers
    pub genre: Vec<Uuid>,
}

/// Book document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: BookFields,
}

impl BookFields {
    pub fn with_id(self, id: Uuid) -> Book {
        Book { id, fields: self }
    }

    pub fn has_genre(&self, genre: Uuid) -> bool {
        self.genre.contains(&genre)
    }
}

impl Book {
    pub fn url(&self) -> String {
        url(self.id)
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn view(&self) -> BookView<'_> {
        BookView {
            book: self,
            url: self.url(),
        }
    }
}

pub fn url(id: Uuid) -> String {
    format!("/catalog/book/{}", id)
}

#[derive(Debug, Serialize)]
pub struct BookView<'a> {
    #[serde(flatten)]
    pub book: &'a Book,
    pub url: String,
}

const TITLE: &[Rule] = &[
    Rule::Trim,
    Rule::required("Title must not be empty."),
    Rule::Escape,
];

const AUTHOR: &[Rule] = &[
    Rule::Trim,
    Rule::required("Author must not be empty."),
    Rule::Escape,
    Rule::Identifier("Invalid author"),
];

const SUMMARY: &[Rule] = &[
    Rule::Trim,
    Rule::required("Summary must not be empty."),
    Rule::Escape,
];

const ISBN: &[Rule] = &[
    Rule::Trim,
    Rule::required("ISBN must not be empty"),
    Rule::Escape,
];

const GENRE: &[Rule] = &[
    Rule::Trim,
    Rule::Escape,
    Rule::Identifier("Invalid genre"),
];

/// Book create/update form body. `genre` may repeat.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub isbn: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
}

impl BookForm {
    pub fn validate(&self) -> Validated<BookFields> {
        let mut v = Validator::new();
        let title = v.text("title", self.title.as_deref(), TITLE);
        let author = v.text("author", self.author.as_deref(), AUTHOR);
        let summary = v.text("summary", self.summary.as_deref(), SUMMARY);
        let isbn = v.text("isbn", self.isbn.as_deref(), ISBN);
        let genre = self
            .genre
            .iter()
            .map(|raw| v.text("genre", Some(raw), GENRE))
            .filter(|g| !g.is_empty())
            .filter_map(|g| Uuid::parse_str(&g).ok())
            .collect();

        v.finish(BookFields {
            title,
            author: Uuid::parse_str(&author).unwrap_or_default(),
            summary,
            isbn,
            genre,
        })
    }
}
