//! Catalog documents, their form bodies and derived fields

pub mod author;
pub mod book;
pub mod book_instance;
pub mod dates;
pub mod genre;

// Re-export commonly used types
pub use author::{Author, AuthorFields, AuthorForm, Lifespan};
pub use book::{Book, BookFields, BookForm};
pub use book_instance::{BookInstance, BookInstanceFields, BookInstanceForm, BookInstanceStatus};
pub use genre::{Genre, GenreFields, GenreForm};
