//! PostgreSQL-backed collections

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{AuthorRepository, BookInstanceRepository, BookRepository, GenreRepository};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorFields, Book, BookFields, BookInstance, BookInstanceFields,
        BookInstanceStatus, Genre, GenreFields,
    },
};

const AUTHOR_COLUMNS: &str = "id, first_name, family_name, date_of_birth, date_of_death";
const GENRE_COLUMNS: &str = "id, name";
const BOOK_COLUMNS: &str = "id, title, author, summary, isbn, genre";
const BOOK_INSTANCE_COLUMNS: &str = "id, book, imprint, status, due_back";

async fn count_rows(pool: &Pool<Postgres>, table: &str) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn delete_row(pool: &Pool<Postgres>, table: &str, id: Uuid) -> AppResult<bool> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[derive(Clone)]
pub struct PgAuthors {
    pool: Pool<Postgres>,
}

impl PgAuthors {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthors {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors ORDER BY family_name, seq",
            AUTHOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE id = $1",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, fields: &AuthorFields) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(&format!(
            r#"
            INSERT INTO authors (id, first_name, family_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&fields.first_name)
        .bind(&fields.family_name)
        .bind(fields.date_of_birth)
        .bind(fields.date_of_death)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn replace(&self, id: Uuid, fields: &AuthorFields) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(&format!(
            r#"
            UPDATE authors
            SET first_name = $2, family_name = $3, date_of_birth = $4, date_of_death = $5
            WHERE id = $1
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .bind(&fields.first_name)
        .bind(&fields.family_name)
        .bind(fields.date_of_birth)
        .bind(fields.date_of_death)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        delete_row(&self.pool, "authors", id).await
    }

    async fn count(&self) -> AppResult<i64> {
        count_rows(&self.pool, "authors").await
    }
}

#[derive(Clone)]
pub struct PgGenres {
    pool: Pool<Postgres>,
}

impl PgGenres {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreRepository for PgGenres {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>(&format!(
            "SELECT {} FROM genres ORDER BY seq",
            GENRE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>(&format!(
            "SELECT {} FROM genres WHERE id = $1",
            GENRE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Genre>(&format!(
            "SELECT {} FROM genres WHERE id = ANY($1) ORDER BY name",
            GENRE_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>(&format!(
            "SELECT {} FROM genres WHERE lower(name) = lower($1) ORDER BY seq LIMIT 1",
            GENRE_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, fields: &GenreFields) -> AppResult<Genre> {
        let row = sqlx::query_as::<_, Genre>(&format!(
            "INSERT INTO genres (id, name) VALUES ($1, $2) RETURNING {}",
            GENRE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&fields.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn replace(&self, id: Uuid, fields: &GenreFields) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>(&format!(
            "UPDATE genres SET name = $2 WHERE id = $1 RETURNING {}",
            GENRE_COLUMNS
        ))
        .bind(id)
        .bind(&fields.name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        delete_row(&self.pool, "genres", id).await
    }

    async fn count(&self) -> AppResult<i64> {
        count_rows(&self.pool, "genres").await
    }
}

#[derive(Clone)]
pub struct PgBooks {
    pool: Pool<Postgres>,
}

impl PgBooks {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn select_where(
        &self,
        filter: &str,
        key: Option<Uuid>,
        order: &str,
    ) -> AppResult<Vec<Book>> {
        let sql = format!(
            "SELECT {} FROM books {} ORDER BY {}",
            BOOK_COLUMNS, filter, order
        );
        let mut query = sqlx::query_as::<_, Book>(&sql);
        if let Some(key) = key {
            query = query.bind(key);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl BookRepository for PgBooks {
    async fn list(&self) -> AppResult<Vec<Book>> {
        self.select_where("", None, "seq").await
    }

    async fn list_by_title(&self) -> AppResult<Vec<Book>> {
        self.select_where("", None, "title, seq").await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_author(&self, author: Uuid) -> AppResult<Vec<Book>> {
        self.select_where("WHERE author = $1", Some(author), "title, seq")
            .await
    }

    async fn find_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>> {
        self.select_where("WHERE $1 = ANY(genre)", Some(genre), "title, seq")
            .await
    }

    async fn insert(&self, fields: &BookFields) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (id, title, author, summary, isbn, genre)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&fields.title)
        .bind(fields.author)
        .bind(&fields.summary)
        .bind(&fields.isbn)
        .bind(&fields.genre)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn replace(&self, id: Uuid, fields: &BookFields) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, summary = $4, isbn = $5, genre = $6
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(fields.author)
        .bind(&fields.summary)
        .bind(&fields.isbn)
        .bind(&fields.genre)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        delete_row(&self.pool, "books", id).await
    }

    async fn count(&self) -> AppResult<i64> {
        count_rows(&self.pool, "books").await
    }
}

#[derive(Clone)]
pub struct PgBookInstances {
    pool: Pool<Postgres>,
}

impl PgBookInstances {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstanceRepository for PgBookInstances {
    async fn list(&self) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances ORDER BY seq",
            BOOK_INSTANCE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances WHERE id = $1",
            BOOK_INSTANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances WHERE book = $1 ORDER BY seq",
            BOOK_INSTANCE_COLUMNS
        ))
        .bind(book)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, fields: &BookInstanceFields) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>(&format!(
            r#"
            INSERT INTO book_instances (id, book, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            BOOK_INSTANCE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(fields.book)
        .bind(&fields.imprint)
        .bind(fields.status.as_str())
        .bind(fields.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn replace(&self, id: Uuid, fields: &BookInstanceFields) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(&format!(
            r#"
            UPDATE book_instances
            SET book = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_INSTANCE_COLUMNS
        ))
        .bind(id)
        .bind(fields.book)
        .bind(&fields.imprint)
        .bind(fields.status.as_str())
        .bind(fields.due_back)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        delete_row(&self.pool, "book_instances", id).await
    }

    async fn count(&self) -> AppResult<i64> {
        count_rows(&self.pool, "book_instances").await
    }

    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
