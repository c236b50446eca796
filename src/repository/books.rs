//! Books repository: the in-memory books collection and its store

use std::path::PathBuf;

use crate::{
    error::AppResult,
    models::book::Book,
    repository::store::{JsonStore, StoreIssue},
};

#[derive(Debug)]
pub struct BooksRepository {
    store: JsonStore,
    key: String,
    books: Vec<Book>,
}

impl BooksRepository {
    /// Load the books collection; a failed load starts empty.
    /// Records whose loan fields disagree are normalized on their borrower id.
    pub fn load(store: JsonStore, key: &str) -> (Self, Option<StoreIssue>) {
        let mut loaded = store.load::<Book>(key);
        for book in loaded.records.iter_mut() {
            if book.normalize() {
                tracing::warn!(
                    "Book '{}' had inconsistent loan fields, borrower is now {:?}",
                    book.title,
                    book.borrower_id
                );
            }
        }
        let repo = Self {
            store,
            key: key.to_string(),
            books: loaded.records,
        };
        (repo, loaded.issue)
    }

    pub fn path(&self) -> PathBuf {
        self.store.path_for(&self.key)
    }

    pub fn save(&self) -> AppResult<()> {
        self.store.save(&self.key, &self.books)
    }

    pub fn all(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// `idx` must come from [`BooksRepository::positions`]
    pub fn book(&self, idx: usize) -> &Book {
        &self.books[idx]
    }

    pub fn book_mut(&mut self, idx: usize) -> &mut Book {
        &mut self.books[idx]
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Book> {
        self.books.iter_mut()
    }

    /// Indices of the books accepted by `pred`, in collection order
    pub fn positions<F>(&self, pred: F) -> Vec<usize>
    where
        F: Fn(&Book) -> bool,
    {
        self.books
            .iter()
            .enumerate()
            .filter(|(_, b)| pred(b))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn push(&mut self, book: Book) {
        self.books.push(book);
    }

    pub fn remove(&mut self, idx: usize) -> Book {
        self.books.remove(idx)
    }
}
