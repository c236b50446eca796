//! Book model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Book record as persisted in the books store.
///
/// `available == false` iff `borrower_id` is set iff `borrow_date` is set.
/// Only [`Book::lend`] and [`Book::release`] move a book between the two
/// states, so the three fields always change together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    pub author: String,
    pub available: bool,
    pub borrower_id: Option<u32>,
    pub borrow_date: Option<DateTime<Utc>>,
    /// Set once an overdue penalty was charged for the current loan
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub penalty_applied: bool,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            available: true,
            borrower_id: None,
            borrow_date: None,
            penalty_applied: false,
        }
    }

    pub fn is_borrowed(&self) -> bool {
        !self.available
    }

    /// Case-insensitive title equality
    pub fn has_title(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    /// Duplicate detection: same (title, author) ignoring case
    pub fn same_work(&self, title: &str, author: &str) -> bool {
        self.has_title(title) && self.author.to_lowercase() == author.to_lowercase()
    }

    /// Case-insensitive substring match against title or author.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }

    pub fn lend(&mut self, member_id: u32, at: DateTime<Utc>) {
        self.available = false;
        self.borrower_id = Some(member_id);
        self.borrow_date = Some(at);
        self.penalty_applied = false;
    }

    pub fn release(&mut self) {
        self.available = true;
        self.borrower_id = None;
        self.borrow_date = None;
        self.penalty_applied = false;
    }

    /// Date the current loan falls due, if borrowed
    pub fn due_date(&self, loan_duration: Duration) -> Option<DateTime<Utc>> {
        self.borrow_date.map(|d| d + loan_duration)
    }

    /// True when borrowed and `now - borrow_date` exceeds the loan duration
    pub fn is_overdue(&self, now: DateTime<Utc>, loan_duration: Duration) -> bool {
        match self.borrow_date {
            Some(date) if self.is_borrowed() => now - date > loan_duration,
            _ => false,
        }
    }

    /// Checks the availability invariant
    pub fn is_consistent(&self) -> bool {
        self.available == self.borrower_id.is_none()
            && self.borrower_id.is_some() == self.borrow_date.is_some()
    }

    /// Bring a record edited outside the catalog back in line with its
    /// borrower id: no borrower means available, a borrower means on loan.
    /// Returns whether the record changed.
    pub fn normalize(&mut self) -> bool {
        let stray_date = self.borrower_id.is_none() && self.borrow_date.is_some();
        if self.available == self.borrower_id.is_none() && !stray_date {
            return false;
        }
        match self.borrower_id {
            None => self.release(),
            Some(_) => self.available = false,
        }
        true
    }
}

/// Add book request
#[derive(Debug, Clone, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
}

impl NewBook {
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            author: author.trim().to_string(),
        }
    }
}

/// Identifies one book for loan and removal operations.
///
/// A bare title must match exactly one book; when several books share the
/// title the author is required to pick one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSelector {
    pub title: String,
    pub author: Option<String>,
}

impl BookSelector {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: None,
        }
    }

    pub fn with_author(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: Some(author.into()),
        }
    }

    pub fn selects(&self, book: &Book) -> bool {
        match &self.author {
            Some(author) => book.same_work(self.title.trim(), author.trim()),
            None => book.has_title(self.title.trim()),
        }
    }
}

impl From<&str> for BookSelector {
    fn from(title: &str) -> Self {
        BookSelector::title(title)
    }
}

impl From<String> for BookSelector {
    fn from(title: String) -> Self {
        BookSelector::title(title)
    }
}

impl From<&String> for BookSelector {
    fn from(title: &String) -> Self {
        BookSelector::title(title.as_str())
    }
}
