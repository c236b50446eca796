//! Catalog search with resolved loan status

use chrono::Utc;

use crate::models::{
    loan::{Borrower, SearchHit},
    member::MemberShort,
};

use super::Catalog;

impl Catalog {
    /// Same matching as `find_book`, with the borrower resolved for books on loan
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let now = Utc::now();
        self.find_book(query)
            .into_iter()
            .map(|book| {
                let borrower = book.borrower_id.map(|id| {
                    self.repository
                        .members
                        .get_by_id(id)
                        .map(|m| Borrower::from(MemberShort::from(m)))
                        .unwrap_or(Borrower { id, name: None })
                });
                SearchHit {
                    title: book.title.clone(),
                    author: book.author.clone(),
                    available: book.available,
                    borrower,
                    borrow_date: book.borrow_date,
                    is_overdue: book.is_overdue(now, self.rules.duration),
                }
            })
            .collect()
    }
}
