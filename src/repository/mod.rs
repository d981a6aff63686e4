//! Repository layer: one store trait per catalog collection.
//!
//! Controllers only see the traits. [`Repository::postgres`] backs them with
//! sqlx; [`Repository::memory`] keeps documents in process, for development
//! and tests.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, AuthorFields, Book, BookFields, BookInstance, BookInstanceFields,
        BookInstanceStatus, Genre, GenreFields,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// All authors, ordered by family name
    async fn list(&self) -> AppResult<Vec<Author>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>>;

    /// Insert a new author under a freshly generated identifier
    async fn insert(&self, fields: &AuthorFields) -> AppResult<Author>;

    /// Replace the stored fields. `NotFound` if the author is gone.
    async fn replace(&self, id: Uuid, fields: &AuthorFields) -> AppResult<Author>;

    /// Returns whether a document was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// All genres, in insertion order
    async fn list(&self) -> AppResult<Vec<Genre>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>>;

    /// Genres among `ids`, ordered by name. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>>;

    /// First genre whose name matches `name` ignoring case
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>>;

    async fn insert(&self, fields: &GenreFields) -> AppResult<Genre>;

    async fn replace(&self, id: Uuid, fields: &GenreFields) -> AppResult<Genre>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books, in insertion order
    async fn list(&self) -> AppResult<Vec<Book>>;

    /// All books, ordered by title, for selection lists
    async fn list_by_title(&self) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// Books written by `author`, ordered by title
    async fn find_by_author(&self, author: Uuid) -> AppResult<Vec<Book>>;

    /// Books tagged with `genre`, ordered by title
    async fn find_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>>;

    async fn insert(&self, fields: &BookFields) -> AppResult<Book>;

    async fn replace(&self, id: Uuid, fields: &BookFields) -> AppResult<Book>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstanceRepository: Send + Sync {
    /// All copies, in insertion order
    async fn list(&self) -> AppResult<Vec<BookInstance>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>>;

    /// Copies of `book`, in insertion order
    async fn find_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>>;

    async fn insert(&self, fields: &BookInstanceFields) -> AppResult<BookInstance>;

    async fn replace(&self, id: Uuid, fields: &BookInstanceFields) -> AppResult<BookInstance>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;

    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64>;
}

/// Handles to every collection, shared by all controllers
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorRepository>,
    pub genres: Arc<dyn GenreRepository>,
    pub books: Arc<dyn BookRepository>,
    pub book_instances: Arc<dyn BookInstanceRepository>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(postgres::PgAuthors::new(pool.clone())),
            genres: Arc::new(postgres::PgGenres::new(pool.clone())),
            books: Arc::new(postgres::PgBooks::new(pool.clone())),
            book_instances: Arc::new(postgres::PgBookInstances::new(pool)),
        }
    }

    /// Create an empty in-process repository
    pub fn memory() -> Self {
        Self {
            authors: Arc::new(memory::MemoryAuthors::default()),
            genres: Arc::new(memory::MemoryGenres::default()),
            books: Arc::new(memory::MemoryBooks::default()),
            book_instances: Arc::new(memory::MemoryBookInstances::default()),
        }
    }
}
