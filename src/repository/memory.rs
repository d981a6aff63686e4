//! In-process document store.
//!
//! Collections keep insertion order, which is the natural order of a
//! document collection without an explicit sort.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthorRepository, BookInstanceRepository, BookRepository, GenreRepository};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorFields, Book, BookFields, BookInstance, BookInstanceFields,
        BookInstanceStatus, Genre, GenreFields,
    },
};

/// Documents of one type keyed by identifier
type Collection<T> = Arc<RwLock<IndexMap<Uuid, T>>>;

async fn all<T: Clone>(docs: &Collection<T>) -> Vec<T> {
    docs.read().await.values().cloned().collect()
}

async fn get<T: Clone>(docs: &Collection<T>, id: Uuid) -> Option<T> {
    docs.read().await.get(&id).cloned()
}

async fn matching<T: Clone>(docs: &Collection<T>, pred: impl Fn(&T) -> bool) -> Vec<T> {
    docs.read().await.values().filter(|d| pred(d)).cloned().collect()
}

async fn remove<T>(docs: &Collection<T>, id: Uuid) -> bool {
    // shift_remove keeps the order of the remaining documents
    docs.write().await.shift_remove(&id).is_some()
}

async fn count<T>(docs: &Collection<T>) -> i64 {
    docs.read().await.len() as i64
}

/// Overwrite an existing document in place
async fn replace<T: Clone>(
    docs: &Collection<T>,
    id: Uuid,
    doc: T,
    what: &str,
) -> AppResult<T> {
    let mut docs = docs.write().await;
    match docs.get_mut(&id) {
        Some(slot) => {
            *slot = doc.clone();
            Ok(doc)
        }
        None => Err(AppError::NotFound(format!("{} {} not found", what, id))),
    }
}

async fn insert<T: Clone>(docs: &Collection<T>, build: impl FnOnce(Uuid) -> T) -> T {
    let id = Uuid::new_v4();
    let doc = build(id);
    docs.write().await.insert(id, doc.clone());
    doc
}

fn sort_by_title(books: &mut [Book]) {
    books.sort_by(|a, b| a.fields.title.cmp(&b.fields.title));
}

#[derive(Default)]
pub struct MemoryAuthors {
    docs: Collection<Author>,
}

#[async_trait]
impl AuthorRepository for MemoryAuthors {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let mut authors = all(&self.docs).await;
        authors.sort_by(|a, b| a.fields.family_name.cmp(&b.fields.family_name));
        Ok(authors)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(get(&self.docs, id).await)
    }

    async fn insert(&self, fields: &AuthorFields) -> AppResult<Author> {
        Ok(insert(&self.docs, |id| fields.clone().with_id(id)).await)
    }

    async fn replace(&self, id: Uuid, fields: &AuthorFields) -> AppResult<Author> {
        replace(&self.docs, id, fields.clone().with_id(id), "Author").await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove(&self.docs, id).await)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(&self.docs).await)
    }
}

#[derive(Default)]
pub struct MemoryGenres {
    docs: Collection<Genre>,
}

#[async_trait]
impl GenreRepository for MemoryGenres {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        Ok(all(&self.docs).await)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(get(&self.docs, id).await)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        let mut genres = matching(&self.docs, |g| ids.contains(&g.id)).await;
        genres.sort_by(|a, b| a.fields.name.cmp(&b.fields.name));
        Ok(genres)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let wanted = name.to_lowercase();
        Ok(self
            .docs
            .read()
            .await
            .values()
            .find(|g| g.fields.name.to_lowercase() == wanted)
            .cloned())
    }

    async fn insert(&self, fields: &GenreFields) -> AppResult<Genre> {
        Ok(insert(&self.docs, |id| fields.clone().with_id(id)).await)
    }

    async fn replace(&self, id: Uuid, fields: &GenreFields) -> AppResult<Genre> {
        replace(&self.docs, id, fields.clone().with_id(id), "Genre").await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove(&self.docs, id).await)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(&self.docs).await)
    }
}

#[derive(Default)]
pub struct MemoryBooks {
    docs: Collection<Book>,
}

#[async_trait]
impl BookRepository for MemoryBooks {
    async fn list(&self) -> AppResult<Vec<Book>> {
        Ok(all(&self.docs).await)
    }

    async fn list_by_title(&self) -> AppResult<Vec<Book>> {
        let mut books = all(&self.docs).await;
        sort_by_title(&mut books);
        Ok(books)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(get(&self.docs, id).await)
    }

    async fn find_by_author(&self, author: Uuid) -> AppResult<Vec<Book>> {
        let mut books = matching(&self.docs, |b| b.fields.author == author).await;
        sort_by_title(&mut books);
        Ok(books)
    }

    async fn find_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>> {
        let mut books = matching(&self.docs, |b| b.fields.has_genre(genre)).await;
        sort_by_title(&mut books);
        Ok(books)
    }

    async fn insert(&self, fields: &BookFields) -> AppResult<Book> {
        Ok(insert(&self.docs, |id| fields.clone().with_id(id)).await)
    }

    async fn replace(&self, id: Uuid, fields: &BookFields) -> AppResult<Book> {
        replace(&self.docs, id, fields.clone().with_id(id), "Book").await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove(&self.docs, id).await)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(&self.docs).await)
    }
}

#[derive(Default)]
pub struct MemoryBookInstances {
    docs: Collection<BookInstance>,
}

#[async_trait]
impl BookInstanceRepository for MemoryBookInstances {
    async fn list(&self) -> AppResult<Vec<BookInstance>> {
        Ok(all(&self.docs).await)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(get(&self.docs, id).await)
    }

    async fn find_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        Ok(matching(&self.docs, |i| i.fields.book == book).await)
    }

    async fn insert(&self, fields: &BookInstanceFields) -> AppResult<BookInstance> {
        Ok(insert(&self.docs, |id| fields.clone().with_id(id)).await)
    }

    async fn replace(&self, id: Uuid, fields: &BookInstanceFields) -> AppResult<BookInstance> {
        replace(&self.docs, id, fields.clone().with_id(id), "Book instance").await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(remove(&self.docs, id).await)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(&self.docs).await)
    }

    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        Ok(matching(&self.docs, |i| i.fields.status == status).await.len() as i64)
    }
}
