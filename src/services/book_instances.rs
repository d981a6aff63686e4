//! Book instance controller

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookView, book_instance::BookInstanceView, Book, BookInstance, BookInstanceForm,
        BookInstanceStatus,
    },
    repository::Repository,
    validation::{FieldErrors, Validated},
    views::{Reply, View},
};

pub const LIST_URL: &str = "/catalog/bookinstances";

/// A copy with its book resolved
#[derive(Debug, Serialize)]
struct BookInstanceEntry<'a> {
    #[serde(flatten)]
    instance: BookInstanceView<'a>,
    book: Option<BookView<'a>>,
}

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn populated(&self, id: Uuid) -> AppResult<Option<(BookInstance, Option<Book>)>> {
        let Some(instance) = self.repository.book_instances.find_by_id(id).await? else {
            return Ok(None);
        };
        let book = self.repository.books.find_by_id(instance.fields.book).await?;
        Ok(Some((instance, book)))
    }

    /// All copies, each with its book
    pub async fn list(&self) -> AppResult<Reply> {
        let (instances, books) = tokio::try_join!(
            self.repository.book_instances.list(),
            self.repository.books.list(),
        )?;
        let books: HashMap<Uuid, &Book> = books.iter().map(|b| (b.id, b)).collect();
        let entries: Vec<_> = instances
            .iter()
            .map(|instance| BookInstanceEntry {
                instance: instance.view(),
                book: books.get(&instance.fields.book).map(|b| b.view()),
            })
            .collect();

        Ok(View::new("bookinstance_list", "Book Instance List")
            .with("bookinstance_list", entries)?
            .into())
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Reply> {
        let (instance, book) = self
            .populated(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))?;

        Ok(View::new("bookinstance_detail", "Book:")
            .with(
                "bookinstance",
                BookInstanceEntry {
                    instance: instance.view(),
                    book: book.as_ref().map(Book::view),
                },
            )?
            .into())
    }

    fn form_view(
        title: &str,
        instance: Option<BookInstanceView<'_>>,
        books: &[Book],
        errors: &FieldErrors,
    ) -> AppResult<Reply> {
        let selected = instance.as_ref().map(|i| i.fields.book);
        let books: Vec<_> = books.iter().map(Book::view).collect();

        Ok(View::new("bookinstance_form", title)
            .with("book_list", books)?
            .with("selected_book", selected)?
            .with("statuses", BookInstanceStatus::ALL)?
            .with("bookinstance", instance)?
            .with_errors(errors)?
            .into())
    }

    pub async fn create_form(&self) -> AppResult<Reply> {
        let books = self.repository.books.list_by_title().await?;
        Self::form_view("Create BookInstance", None, &books, &FieldErrors::default())
    }

    pub async fn create(&self, form: &BookInstanceForm) -> AppResult<Reply> {
        let Validated {
            value: candidate,
            errors,
        } = form.validate();

        if !errors.is_empty() {
            tracing::debug!(
                "Book instance create rejected: {} invalid field(s)",
                errors.len()
            );
            let books = self.repository.books.list_by_title().await?;
            return Self::form_view(
                "Create BookInstance",
                Some(candidate.view()),
                &books,
                &errors,
            );
        }

        let instance = self.repository.book_instances.insert(&candidate).await?;
        tracing::info!("Book instance created: id={}", instance.id);
        Ok(Reply::redirect(instance.url()))
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Reply> {
        let Some((instance, book)) = self.populated(id).await? else {
            return Ok(Reply::redirect(LIST_URL));
        };

        Ok(View::new("bookinstance_delete", "Delete BookInstance")
            .with(
                "bookinstance",
                BookInstanceEntry {
                    instance: instance.view(),
                    book: book.as_ref().map(Book::view),
                },
            )?
            .into())
    }

    /// Copies have no dependents: delete unconditionally
    pub async fn delete(&self, id: Uuid) -> AppResult<Reply> {
        if self.repository.book_instances.delete(id).await? {
            tracing::info!("Book instance deleted: id={}", id);
        }
        Ok(Reply::redirect(LIST_URL))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Reply> {
        let (instance, books) = tokio::try_join!(
            self.repository.book_instances.find_by_id(id),
            self.repository.books.list_by_title(),
        )?;
        let Some(instance) = instance else {
            return Ok(Reply::redirect(LIST_URL));
        };

        Self::form_view(
            "Update BookInstance",
            Some(instance.view()),
            &books,
            &FieldErrors::default(),
        )
    }

    pub async fn update(&self, id: Uuid, form: &BookInstanceForm) -> AppResult<Reply> {
        let Validated { value, errors } = form.validate();
        let candidate = value.with_id(id);

        if !errors.is_empty() {
            tracing::debug!(
                "Book instance update rejected: id={}, {} invalid field(s)",
                id,
                errors.len()
            );
            let (existing, books) = tokio::try_join!(
                self.repository.book_instances.find_by_id(id),
                self.repository.books.list_by_title(),
            )?;
            if existing.is_none() {
                return Ok(Reply::redirect(LIST_URL));
            }
            return Self::form_view(
                "Update BookInstance",
                Some(candidate.view()),
                &books,
                &errors,
            );
        }

        let instance = self
            .repository
            .book_instances
            .replace(id, &candidate.fields)
            .await?;
        tracing::info!("Book instance updated: id={}", instance.id);
        Ok(Reply::redirect(instance.url()))
    }
}
