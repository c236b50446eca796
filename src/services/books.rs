//! Book operations

use validator::Validate;

use crate::{
    config::SeedBook,
    error::{AppError, AppResult},
    models::book::{Book, BookSelector, NewBook},
};

use super::Catalog;

impl Catalog {
    /// Add a book unless the same (title, author) pair exists, ignoring case
    pub fn add_book(&mut self, title: &str, author: &str) -> AppResult<Book> {
        let req = NewBook::new(title, author);
        req.validate()?;

        if self
            .repository
            .books
            .all()
            .iter()
            .any(|b| b.same_work(&req.title, &req.author))
        {
            tracing::info!("Catalog add: '{}' by {} already present", req.title, req.author);
            return Err(AppError::DuplicateBook {
                title: req.title,
                author: req.author,
            });
        }

        let book = Book::new(req.title, req.author);
        self.repository.books.push(book.clone());
        self.repository.books.save()?;

        tracing::info!("Catalog add: '{}' by {}", book.title, book.author);
        Ok(book)
    }

    /// Books in collection order, optionally restricted to one availability.
    /// Call again to restart.
    pub fn list_books(&self, available: Option<bool>) -> impl Iterator<Item = &Book> + '_ {
        self.repository
            .books
            .all()
            .iter()
            .filter(move |b| available.map_or(true, |wanted| b.available == wanted))
    }

    /// Books whose title or author contains `query`, ignoring case
    pub fn find_book(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.repository
            .books
            .all()
            .iter()
            .filter(|b| b.matches(&needle))
            .collect()
    }

    /// The single book picked by `selector`
    pub fn get_book(&self, selector: impl Into<BookSelector>) -> AppResult<&Book> {
        let idx = self.resolve_book(&selector.into())?;
        Ok(self.repository.books.book(idx))
    }

    /// Remove a book. A book on loan cannot be removed, so no member ever
    /// holds a title that left the catalog.
    pub fn remove_book(&mut self, selector: impl Into<BookSelector>) -> AppResult<Book> {
        let idx = self.resolve_book(&selector.into())?;

        let book = self.repository.books.book(idx);
        if book.is_borrowed() {
            return Err(AppError::BookOnLoan(book.title.clone()));
        }

        let removed = self.repository.books.remove(idx);
        self.repository.books.save()?;

        tracing::info!("Catalog remove: '{}' by {}", removed.title, removed.author);
        Ok(removed)
    }

    pub fn book_count(&self) -> usize {
        self.repository.books.len()
    }

    /// Add starter books, skipping any already present.
    /// Returns how many were added.
    pub fn seed_books(&mut self, seeds: &[SeedBook]) -> AppResult<usize> {
        let mut added = 0;
        for seed in seeds {
            match self.add_book(&seed.title, &seed.author) {
                Ok(_) => added += 1,
                Err(AppError::DuplicateBook { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(added)
    }
}
