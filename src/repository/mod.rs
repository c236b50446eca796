//! Repository layer for the persisted collections

pub mod books;
pub mod members;
pub mod store;

pub use store::{JsonStore, Loaded, StoreIssue};

use std::path::PathBuf;

use crate::error::AppResult;

/// Both collections, each backed by its own store file.
/// There is no transaction across the two files.
#[derive(Debug)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub members: members::MembersRepository,
}

impl Repository {
    /// Load both collections, returning any issue met while loading
    pub fn open(store: JsonStore, books_key: &str, members_key: &str) -> (Self, Vec<StoreIssue>) {
        let (books, books_issue) = books::BooksRepository::load(store.clone(), books_key);
        let (mut members, members_issue) = members::MembersRepository::load(store, members_key);
        members.reserve_ids(books.all().iter().filter_map(|b| b.borrower_id));

        let issues = books_issue.into_iter().chain(members_issue).collect();
        (Self { books, members }, issues)
    }

    pub fn books_path(&self) -> PathBuf {
        self.books.path()
    }

    /// Save books then members
    pub fn save_all(&self) -> AppResult<()> {
        self.books.save()?;
        self.members.save()
    }
}
