//! Book controller

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::AuthorView, genre::GenreView, Author, Book, BookFields, BookForm, BookInstance,
        Genre,
    },
    repository::Repository,
    validation::{FieldErrors, Validated},
    views::{Reply, View},
};

pub const LIST_URL: &str = "/catalog/books";

/// Book list row with its author resolved
#[derive(Debug, Serialize)]
struct BookListEntry<'a> {
    #[serde(flatten)]
    book: crate::models::book::BookView<'a>,
    author_name: String,
}

/// Genre checkbox on the book form
#[derive(Debug, Serialize)]
struct GenreChoice<'a> {
    #[serde(flatten)]
    genre: GenreView<'a>,
    checked: bool,
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn with_instances(&self, id: Uuid) -> AppResult<(Option<Book>, Vec<BookInstance>)> {
        tokio::try_join!(
            self.repository.books.find_by_id(id),
            self.repository.book_instances.find_by_book(id),
        )
    }

    /// Authors and genres offered by the book form
    async fn choices(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(
            self.repository.authors.list(),
            self.repository.genres.list(),
        )
    }

    /// Books by title, each with its author's name
    pub async fn list(&self) -> AppResult<Reply> {
        let (books, authors) = tokio::try_join!(
            self.repository.books.list(),
            self.repository.authors.list(),
        )?;
        let names: HashMap<Uuid, String> = authors.iter().map(|a| (a.id, a.name())).collect();
        let entries: Vec<_> = books
            .iter()
            .map(|book| BookListEntry {
                book: book.view(),
                author_name: names.get(&book.fields.author).cloned().unwrap_or_default(),
            })
            .collect();

        Ok(View::new("book_list", "Book List")
            .with("book_list", entries)?
            .into())
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Reply> {
        let (book, instances) = self.with_instances(id).await?;
        let book = book.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        let (author, genres) = tokio::try_join!(
            self.repository.authors.find_by_id(book.fields.author),
            self.repository.genres.find_by_ids(&book.fields.genre),
        )?;

        let genres: Vec<_> = genres.iter().map(Genre::view).collect();
        let instances: Vec<_> = instances.iter().map(BookInstance::view).collect();
        Ok(View::new("book_detail", book.title())
            .with("book", book.view())?
            .with("author", author.as_ref().map(Author::view))?
            .with("genres", genres)?
            .with("book_instances", instances)?
            .into())
    }

    fn form_view(
        title: &str,
        book: impl Serialize,
        fields: Option<&BookFields>,
        authors: &[Author],
        genres: &[Genre],
        errors: &FieldErrors,
    ) -> AppResult<Reply> {
        let authors: Vec<AuthorView<'_>> = authors.iter().map(Author::view).collect();
        let genres: Vec<_> = genres
            .iter()
            .map(|genre| GenreChoice {
                genre: genre.view(),
                checked: fields.is_some_and(|f| f.has_genre(genre.id)),
            })
            .collect();

        Ok(View::new("book_form", title)
            .with("book", book)?
            .with("authors", authors)?
            .with("genres", genres)?
            .with_errors(errors)?
            .into())
    }

    pub async fn create_form(&self) -> AppResult<Reply> {
        let (authors, genres) = self.choices().await?;
        Self::form_view(
            "Create Book",
            serde_json::Value::Null,
            None,
            &authors,
            &genres,
            &FieldErrors::default(),
        )
    }

    pub async fn create(&self, form: &BookForm) -> AppResult<Reply> {
        let Validated {
            value: candidate,
            errors,
        } = form.validate();

        if !errors.is_empty() {
            tracing::debug!("Book create rejected: {} invalid field(s)", errors.len());
            let (authors, genres) = self.choices().await?;
            return Self::form_view(
                "Create Book",
                &candidate,
                Some(&candidate),
                &authors,
                &genres,
                &errors,
            );
        }

        let book = self.repository.books.insert(&candidate).await?;
        tracing::info!("Book created: id={}", book.id);
        Ok(Reply::redirect(book.url()))
    }

    fn delete_view(book: &Book, instances: &[BookInstance]) -> AppResult<Reply> {
        let instances: Vec<_> = instances.iter().map(BookInstance::view).collect();
        Ok(View::new("book_delete", "Delete Book")
            .with("book", book.view())?
            .with("book_instances", instances)?
            .into())
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Reply> {
        match self.with_instances(id).await? {
            (Some(book), instances) => Self::delete_view(&book, &instances),
            (None, _) => Ok(Reply::redirect(LIST_URL)),
        }
    }

    /// Delete the book unless copies of it remain
    pub async fn delete(&self, id: Uuid) -> AppResult<Reply> {
        let (book, instances) = self.with_instances(id).await?;
        let Some(book) = book else {
            return Ok(Reply::redirect(LIST_URL));
        };

        if !instances.is_empty() {
            tracing::debug!(
                "Book delete refused: id={} still has {} copy(ies)",
                id,
                instances.len()
            );
            return Self::delete_view(&book, &instances);
        }

        self.repository.books.delete(id).await?;
        tracing::info!("Book deleted: id={}", id);
        Ok(Reply::redirect(LIST_URL))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Reply> {
        let (book, authors, genres) = tokio::try_join!(
            self.repository.books.find_by_id(id),
            self.repository.authors.list(),
            self.repository.genres.list(),
        )?;
        let Some(book) = book else {
            return Ok(Reply::redirect(LIST_URL));
        };

        Self::form_view(
            "Update Book",
            book.view(),
            Some(&book.fields),
            &authors,
            &genres,
            &FieldErrors::default(),
        )
    }

    pub async fn update(&self, id: Uuid, form: &BookForm) -> AppResult<Reply> {
        let Validated { value, errors } = form.validate();
        let candidate = value.with_id(id);

        if !errors.is_empty() {
            tracing::debug!(
                "Book update rejected: id={}, {} invalid field(s)",
                id,
                errors.len()
            );
            let (existing, authors, genres) = tokio::try_join!(
                self.repository.books.find_by_id(id),
                self.repository.authors.list(),
                self.repository.genres.list(),
            )?;
            if existing.is_none() {
                return Ok(Reply::redirect(LIST_URL));
            }
            return Self::form_view(
                "Update Book",
                candidate.view(),
                Some(&candidate.fields),
                &authors,
                &genres,
                &errors,
            );
        }

        let book = self.repository.books.replace(id, &candidate.fields).await?;
        tracing::info!("Book updated: id={}", book.id);
        Ok(Reply::redirect(book.url()))
    }
}
