//! Genre controller

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Book, Genre, GenreForm},
    repository::Repository,
    validation::Validated,
    views::{Reply, View},
};

pub const LIST_URL: &str = "/catalog/genres";

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn with_books(&self, id: Uuid) -> AppResult<(Option<Genre>, Vec<Book>)> {
        tokio::try_join!(
            self.repository.genres.find_by_id(id),
            self.repository.books.find_by_genre(id),
        )
    }

    pub async fn list(&self) -> AppResult<Reply> {
        let genres = self.repository.genres.list().await?;
        let genres: Vec<_> = genres.iter().map(Genre::view).collect();
        Ok(View::new("genre_list", "Genre List")
            .with("genre_list", genres)?
            .into())
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<Reply> {
        let (genre, books) = self.with_books(id).await?;
        let genre = genre.ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        let books: Vec<_> = books.iter().map(Book::view).collect();

        Ok(View::new("genre_detail", "Genre Detail")
            .with("genre", genre.view())?
            .with("genre_books", books)?
            .into())
    }

    pub fn create_form(&self) -> AppResult<Reply> {
        Ok(View::new("genre_form", "Create Genre").into())
    }

    /// Create a genre, or redirect to an existing one with the same name.
    ///
    /// The name check and the insert are separate store calls, so two
    /// concurrent creates of the same name can still both insert.
    pub async fn create(&self, form: &GenreForm) -> AppResult<Reply> {
        let Validated {
            value: candidate,
            errors,
        } = form.validate();

        if !errors.is_empty() {
            tracing::debug!("Genre create rejected: {} invalid field(s)", errors.len());
            return Ok(View::new("genre_form", "Create Genre")
                .with("genre", &candidate)?
                .with_errors(&errors)?
                .into());
        }

        if let Some(existing) = self.repository.genres.find_by_name(&candidate.name).await? {
            tracing::info!(
                "Genre create: '{}' already exists as id={}",
                candidate.name,
                existing.id
            );
            return Ok(Reply::redirect(existing.url()));
        }

        let genre = self.repository.genres.insert(&candidate).await?;
        tracing::info!("Genre created: id={}", genre.id);
        Ok(Reply::redirect(genre.url()))
    }

    fn delete_view(genre: &Genre, books: &[Book]) -> AppResult<Reply> {
        let books: Vec<_> = books.iter().map(Book::view).collect();
        Ok(View::new("genre_delete", "Delete Genre")
            .with("genre", genre.view())?
            .with("genre_books", books)?
            .into())
    }

    pub async fn delete_form(&self, id: Uuid) -> AppResult<Reply> {
        match self.with_books(id).await? {
            (Some(genre), books) => Self::delete_view(&genre, &books),
            (None, _) => Ok(Reply::redirect(LIST_URL)),
        }
    }

    /// Delete the genre unless books are still tagged with it
    pub async fn delete(&self, id: Uuid) -> AppResult<Reply> {
        let (genre, books) = self.with_books(id).await?;
        let Some(genre) = genre else {
            return Ok(Reply::redirect(LIST_URL));
        };

        if !books.is_empty() {
            tracing::debug!(
                "Genre delete refused: id={} still has {} book(s)",
                id,
                books.len()
            );
            return Self::delete_view(&genre, &books);
        }

        self.repository.genres.delete(id).await?;
        tracing::info!("Genre deleted: id={}", id);
        Ok(Reply::redirect(LIST_URL))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<Reply> {
        match self.repository.genres.find_by_id(id).await? {
            Some(genre) => Ok(View::new("genre_form", "Update Genre")
                .with("genre", genre.view())?
                .into()),
            None => Ok(Reply::redirect(LIST_URL)),
        }
    }

    pub async fn update(&self, id: Uuid, form: &GenreForm) -> AppResult<Reply> {
        let Validated { value, errors } = form.validate();
        let candidate = value.with_id(id);

        if !errors.is_empty() {
            tracing::debug!(
                "Genre update rejected: id={}, {} invalid field(s)",
                id,
                errors.len()
            );
            if self.repository.genres.find_by_id(id).await?.is_none() {
                return Ok(Reply::redirect(LIST_URL));
            }
            return Ok(View::new("genre_form", "Update Genre")
                .with("genre", candidate.view())?
                .with_errors(&errors)?
                .into());
        }

        let genre = self
            .repository
            .genres
            .replace(id, &candidate.fields)
            .await?;
        tracing::info!("Genre updated: id={}", genre.id);
        Ok(Reply::redirect(genre.url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookFields;

    fn service() -> (GenresService, Repository) {
        let repository = Repository::memory();
        (GenresService::new(repository.clone()), repository)
    }

    fn form(name: &str) -> GenreForm {
        GenreForm {
            name: Some(name.to_string()),
        }
    }

    async fn create(service: &GenresService, name: &str) -> Uuid {
        let reply = service.create(&form(name)).await.unwrap();
        let id = reply.location().unwrap().rsplit('/').next().unwrap();
        Uuid::parse_str(id).unwrap()
    }

    #[tokio::test]
    async fn test_short_name_rejected() {
        let (service, repository) = service();
        let reply = service.create(&form("Sc")).await.unwrap();

        let view = reply.view().unwrap();
        assert_eq!(view.template, "genre_form");
        assert_eq!(view.get("genre").unwrap()["name"], "Sc");
        assert_eq!(
            view.get("errors").unwrap()[0]["message"],
            "Genre name must contain at least 3 characters"
        );
        assert_eq!(repository.genres.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_is_idempotent_by_name() {
        let (service, repository) = service();
        let first = create(&service, "Fantasy").await;
        let second = create(&service, "Fantasy").await;
        let third = create(&service, "fantasy").await;

        assert_eq!(first, second);
        assert_eq!(first, third);
        let genres = repository.genres.list().await.unwrap();
        assert_eq!(genres.len(), 1);
        assert_eq!(genres[0].fields.name, "Fantasy");
    }

    #[tokio::test]
    async fn test_escaped_name_stored_in_full() {
        let (service, repository) = service();
        let id = create(&service, &"&".repeat(100)).await;
        let stored = repository.genres.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.fields.name, "&amp;".repeat(100));
    }

    #[tokio::test]
    async fn test_hyphenated_name_accepted() {
        let (service, repository) = service();
        let id = create(&service, "Sci-Fi").await;
        let stored = repository.genres.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.fields.name, "Sci-Fi");
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.detail(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_guarded_by_books() {
        let (service, repository) = service();
        let fantasy = create(&service, "Fantasy").await;
        let poetry = create(&service, "Poetry").await;
        repository
            .books
            .insert(&BookFields {
                title: "The Hobbit".into(),
                author: Uuid::new_v4(),
                summary: "There and back again.".into(),
                isbn: "9780261102217".into(),
                genre: vec![fantasy],
            })
            .await
            .unwrap();

        let reply = service.delete(fantasy).await.unwrap();
        let view = reply.view().unwrap();
        assert_eq!(view.template, "genre_delete");
        assert_eq!(view.get("genre_books").unwrap()[0]["title"], "The Hobbit");
        assert_eq!(repository.genres.count().await.unwrap(), 2);

        let reply = service.delete(poetry).await.unwrap();
        assert_eq!(reply.location(), Some(LIST_URL));
        assert_eq!(repository.genres.count().await.unwrap(), 1);
        assert!(repository.genres.find_by_id(fantasy).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update() {
        let (service, repository) = service();
        let id = create(&service, "Fantasy").await;

        let reply = service.update(id, &form("F")).await.unwrap();
        assert_eq!(reply.view().unwrap().get("genre").unwrap()["id"], id.to_string());

        let reply = service.update(id, &form("High Fantasy")).await.unwrap();
        assert_eq!(reply.location(), Some(crate::models::genre::url(id).as_str()));
        let stored = repository.genres.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.fields.name, "High Fantasy");
    }
}
