//! Author controller

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm, Book},
    repository::Repository,
    validation::Validated,
    views::{Reply, View},
};

pub const LIST_URL: &str = "/catalog/authors";

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Fetch an author and the books written by them, concurrently
    async fn with_books(&self, id: Uuid) -> AppResult<(Option<Author>, Vec<Book>)> {
        tokio::try_join!(
            self.repository.authors.find_by_id(id),
            self.repository.books.find_by_author(id),
        )
    }

    /// All authors by family name
    pub async fn list(&self) -> AppResult<Reply> {
        let authors = self.repository.authors.list().await?;
        let authors: Vec<_> = authors.iter().map(Author::view).collect();
        Ok(View::new("author_list", "Author List")
            .with("author_list", authors)?
            .into())
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Reply> {
        let (author, books) = self.with_books(id).await?;
        let author = author.ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        let books: Vec<_> = books.iter().map(Book::view).collect();

        Ok(View::new("author_detail", "Author Details")
            .with("author", author.view())?
            .with("author_books", books)?
            .into())
    }

    pub fn create_form(&self) -> AppResult<Reply> {
        Ok(View::new("author_form", "Create Author").into())
    }

    pub async fn create(&self, form: &AuthorForm) -> AppResult<Reply> {
        let Validated {
            value: candidate,
            errors,
        } = form.validate();

        if !errors.is_empty() {
            tracing::debug!("Author create rejected: {} invalid field(s)", errors.len());
            return Ok(View::new("author_form", "Create Author")
                .with("author", candidate.view())?
                .with_errors(&errors)?
                .into());
        }

        let author = self.repository.authors.insert(&candidate).await?;
        tracing::info!("Author created: id={}", author.id);
        Ok(Reply::redirect(author.url()))
    }

    fn delete_view(author: &Author, books: &[Book]) -> AppResult<Reply> {
        let books: Vec<_> = books.iter().map(Book::view).collect();
        Ok(View::new("author_delete", "Delete Author")
            .with("author", author.view())?
            .with("author_books", books)?
            .into())
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Reply> {
        match self.with_books(id).await? {
            (Some(author), books) => Self::delete_view(&author, &books),
            (None, _) => Ok(Reply::redirect(LIST_URL)),
        }
    }

    /// Delete the author unless books still reference them
    pub async fn delete(&self, id: Uuid) -> AppResult<Reply> {
        let (author, books) = self.with_books(id).await?;
        let Some(author) = author else {
            return Ok(Reply::redirect(LIST_URL));
        };

        if !books.is_empty() {
            tracing::debug!(
                "Author delete refused: id={} still has {} book(s)",
                id,
                books.len()
            );
            return Self::delete_view(&author, &books);
        }

        self.repository.authors.delete(id).await?;
        tracing::info!("Author deleted: id={}", id);
        Ok(Reply::redirect(LIST_URL))
    }

    fn form_view(author: impl serde::Serialize, books: &[Book]) -> AppResult<View> {
        let books: Vec<_> = books.iter().map(Book::view).collect();
        View::new("author_form", "Update Author")
            .with("author", author)?
            .with("author_books", books)
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Reply> {
        match self.with_books(id).await? {
            (Some(author), books) => Ok(Self::form_view(author.view(), &books)?.into()),
            (None, _) => Ok(Reply::redirect(LIST_URL)),
        }
    }

    pub async fn update(&self, id: Uuid, form: &AuthorForm) -> AppResult<Reply> {
        let Validated { value, errors } = form.validate();
        let candidate = value.with_id(id);

        if !errors.is_empty() {
            tracing::debug!(
                "Author update rejected: id={}, {} invalid field(s)",
                id,
                errors.len()
            );
            let (existing, books) = self.with_books(id).await?;
            if existing.is_none() {
                return Ok(Reply::redirect(LIST_URL));
            }
            return Ok(Self::form_view(candidate.view(), &books)?
                .with_errors(&errors)?
                .into());
        }

        let author = self
            .repository
            .authors
            .replace(id, &candidate.fields)
            .await?;
        tracing::info!("Author updated: id={}", author.id);
        Ok(Reply::redirect(author.url()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        models::{AuthorFields, BookFields},
        repository::MockBookRepository,
    };

    fn service() -> (AuthorsService, Repository) {
        let repository = Repository::memory();
        (AuthorsService::new(repository.clone()), repository)
    }

    fn form(first: &str, family: &str) -> AuthorForm {
        AuthorForm {
            first_name: Some(first.to_string()),
            family_name: Some(family.to_string()),
            ..Default::default()
        }
    }

    fn id_from(location: &str) -> Uuid {
        let id = location.rsplit('/').next().unwrap();
        Uuid::parse_str(id).unwrap()
    }

    async fn add_book(repository: &Repository, author: Uuid) {
        repository
            .books
            .insert(&BookFields {
                title: "Emma".into(),
                author,
                summary: "A novel.".into(),
                isbn: "9780141439587".into(),
                genre: vec![],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_redirects_to_new_author() {
        let (service, repository) = service();
        let reply = service.create(&form("Jane", "Austen")).await.unwrap();

        let location = reply.location().unwrap();
        assert!(location.starts_with("/catalog/author/"));
        let stored = repository
            .authors
            .find_by_id(id_from(location))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name(), "Austen, Jane");
    }

    #[tokio::test]
    async fn test_create_rejects_non_alphanumeric_name() {
        let (service, repository) = service();
        let reply = service.create(&form("Jo@hn", "Smith")).await.unwrap();

        let view = reply.view().unwrap();
        assert_eq!(view.template, "author_form");
        assert_eq!(view.get("author").unwrap()["first_name"], "Jo@hn");
        assert!(!view.get("errors").unwrap().as_array().unwrap().is_empty());
        assert_eq!(repository.authors.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        let (service, _) = service();
        let err = service.detail(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_detail_lists_books() {
        let (service, repository) = service();
        let author = repository
            .authors
            .insert(&AuthorFields {
                first_name: "Jane".into(),
                family_name: "Austen".into(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        add_book(&repository, author.id).await;

        let reply = service.detail(author.id).await.unwrap();
        let view = reply.view().unwrap();
        assert_eq!(view.template, "author_detail");
        assert_eq!(view.get("author").unwrap()["lifespan"], "Age information not found");
        assert_eq!(view.get("author_books").unwrap()[0]["title"], "Emma");
    }

    #[tokio::test]
    async fn test_delete_refused_while_books_exist() {
        let (service, repository) = service();
        let location = service.create(&form("Jane", "Austen")).await.unwrap();
        let id = id_from(location.location().unwrap());
        add_book(&repository, id).await;

        let reply = service.delete(id).await.unwrap();
        let view = reply.view().unwrap();
        assert_eq!(view.template, "author_delete");
        assert_eq!(view.get("author_books").unwrap().as_array().unwrap().len(), 1);
        assert_eq!(repository.authors.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let (service, repository) = service();
        let jane = id_from(service.create(&form("Jane", "Austen")).await.unwrap().location().unwrap());
        let george = id_from(service.create(&form("George", "Eliot")).await.unwrap().location().unwrap());

        let reply = service.delete(jane).await.unwrap();
        assert_eq!(reply.location(), Some(LIST_URL));
        assert_eq!(repository.authors.count().await.unwrap(), 1);
        assert!(repository.authors.find_by_id(jane).await.unwrap().is_none());
        assert!(repository.authors.find_by_id(george).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_author_redirects_from_forms() {
        let (service, _) = service();
        let id = Uuid::new_v4();
        assert_eq!(service.delete_form(id).await.unwrap().location(), Some(LIST_URL));
        assert_eq!(service.update_form(id).await.unwrap().location(), Some(LIST_URL));
        assert_eq!(
            service.update(id, &form("", "")).await.unwrap().location(),
            Some(LIST_URL)
        );
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let (service, repository) = service();
        let id = id_from(service.create(&form("Jane", "Austen")).await.unwrap().location().unwrap());

        let reply = service.update(id, &form("Jane", "Eliot")).await.unwrap();
        assert_eq!(reply.location(), Some(crate::models::author::url(id).as_str()));

        let stored = repository.authors.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.fields.family_name, "Eliot");
    }

    #[tokio::test]
    async fn test_update_rejected_keeps_stored_author() {
        let (service, repository) = service();
        let id = id_from(service.create(&form("Jane", "Austen")).await.unwrap().location().unwrap());
        add_book(&repository, id).await;

        let reply = service.update(id, &form("Jane", "")).await.unwrap();
        let view = reply.view().unwrap();
        assert_eq!(view.template, "author_form");
        assert_eq!(view.get("author").unwrap()["id"], id.to_string());
        assert_eq!(view.get("author_books").unwrap().as_array().unwrap().len(), 1);
        assert!(view.get("errors").is_some());

        let stored = repository.authors.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.fields.family_name, "Austen");
    }

    #[tokio::test]
    async fn test_store_failure_aborts_detail() {
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_author()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolClosed)));
        let repository = Repository {
            books: Arc::new(books),
            ..Repository::memory()
        };
        let service = AuthorsService::new(repository);

        let err = service.detail(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
