//! Entity controllers.
//!
//! Every operation reads the store through [`Repository`], validates form
//! bodies, and answers with a [`Reply`](crate::views::Reply): a view to
//! render or a URL to redirect to. Rejected forms and refused deletions are
//! replies, not errors.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;

use crate::repository::Repository;

/// Container for all controllers
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all controllers over the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository),
        }
    }
}
