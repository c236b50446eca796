//! Loan lifecycle: borrow, return, overdue penalties

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookSelector},
        loan::{AppliedPenalty, LoanDetails, PenaltyPolicy},
    },
    repository::Repository,
};

use super::Catalog;

impl Catalog {
    /// Lend a book to a member, starting now
    pub fn borrow(
        &mut self,
        selector: impl Into<BookSelector>,
        member_id: u32,
    ) -> AppResult<LoanDetails> {
        self.borrow_at(selector, member_id, Utc::now())
    }

    /// Lend a book to a member with an explicit borrow date.
    ///
    /// Checks run in order: member exists, member has no penalty, member is
    /// under the loan limit, book exists, book is available.
    pub fn borrow_at(
        &mut self,
        selector: impl Into<BookSelector>,
        member_id: u32,
        now: DateTime<Utc>,
    ) -> AppResult<LoanDetails> {
        let member = self.repository.members.get_by_id(member_id)?;
        if member.penalty_count > 0 {
            return Err(AppError::PenaltyActive {
                member_id,
                penalties: member.penalty_count,
            });
        }
        if !self.can_borrow(member) {
            return Err(AppError::LoanLimitReached {
                member_id,
                limit: self.rules.max_loans,
            });
        }

        let idx = self.resolve_book(&selector.into())?;
        let Repository { books, members } = &mut self.repository;

        let book = books.book_mut(idx);
        if book.is_borrowed() {
            return Err(AppError::AlreadyBorrowed(book.title.clone()));
        }

        let member = members.get_by_id_mut(member_id)?;
        book.lend(member_id, now);
        member.record_loan(&book.title);

        let details = LoanDetails {
            title: book.title.clone(),
            author: book.author.clone(),
            borrow_date: now,
            due_date: now + self.rules.duration,
            is_overdue: false,
        };
        self.repository.save_all()?;

        tracing::info!("Loan: member {} borrowed '{}'", member_id, details.title);
        Ok(details)
    }

    /// Take back a book from the member who borrowed it
    pub fn return_book(
        &mut self,
        selector: impl Into<BookSelector>,
        member_id: u32,
    ) -> AppResult<Book> {
        let idx = self.resolve_book(&selector.into())?;
        let Repository { books, members } = &mut self.repository;

        let book = books.book_mut(idx);
        let Some(borrower) = book.borrower_id.filter(|_| book.is_borrowed()) else {
            return Err(AppError::NotBorrowed(book.title.clone()));
        };
        if borrower != member_id {
            return Err(AppError::BorrowedByOther {
                title: book.title.clone(),
                member_id,
            });
        }

        book.release();
        match members.get_by_id_mut(member_id) {
            Ok(member) => {
                if !member.end_loan(&book.title) {
                    tracing::warn!(
                        "Return: member {} did not list '{}' among its loans",
                        member_id,
                        book.title
                    );
                }
            }
            Err(_) => tracing::warn!("Return: borrower {} is not a registered member", member_id),
        }

        let returned = book.clone();
        self.repository.save_all()?;

        tracing::info!("Loan: member {} returned '{}'", member_id, returned.title);
        Ok(returned)
    }

    /// A member's active loans in collection order
    pub fn member_loans(&self, member_id: u32) -> AppResult<Vec<LoanDetails>> {
        self.member_loans_at(member_id, Utc::now())
    }

    pub fn member_loans_at(&self, member_id: u32, now: DateTime<Utc>) -> AppResult<Vec<LoanDetails>> {
        self.repository.members.get_by_id(member_id)?;
        Ok(self
            .repository
            .books
            .all()
            .iter()
            .filter(|b| b.borrower_id == Some(member_id))
            .filter_map(|b| LoanDetails::for_book(b, &self.rules, now))
            .collect())
    }

    /// Charge a penalty for every overdue loan
    pub fn check_penalties(&mut self) -> AppResult<Vec<AppliedPenalty>> {
        self.check_penalties_at(Utc::now())
    }

    /// Charge a penalty to the borrower of every book borrowed more than the
    /// loan duration before `now`.
    ///
    /// Under [`PenaltyPolicy::Escalating`] each call charges again while the
    /// loan stays overdue; under [`PenaltyPolicy::OncePerLoan`] a loan is
    /// charged once until the book is returned.
    pub fn check_penalties_at(&mut self, now: DateTime<Utc>) -> AppResult<Vec<AppliedPenalty>> {
        let rules = self.rules;
        let once_per_loan = rules.penalty_policy == PenaltyPolicy::OncePerLoan;
        let Repository { books, members } = &mut self.repository;

        let mut applied = Vec::new();
        for book in books.iter_mut() {
            if !book.is_overdue(now, rules.duration) || (once_per_loan && book.penalty_applied) {
                continue;
            }
            let Some(borrower_id) = book.borrower_id else {
                continue;
            };
            let member = match members.get_by_id_mut(borrower_id) {
                Ok(member) => member,
                Err(_) => {
                    tracing::warn!("Penalties: '{}' is held by unknown member {}", book.title, borrower_id);
                    continue;
                }
            };

            member.penalty_count += 1;
            if once_per_loan {
                book.penalty_applied = true;
            }
            applied.push(AppliedPenalty {
                member_id: borrower_id,
                title: book.title.clone(),
                penalty_count: member.penalty_count,
            });
        }

        if !applied.is_empty() {
            self.repository.members.save()?;
            if once_per_loan {
                self.repository.books.save()?;
            }
            tracing::info!("Penalties: {} overdue loans charged", applied.len());
        }

        Ok(applied)
    }
}
