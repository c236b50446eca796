//! Loan rules and loan views

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::book::Book;
use super::member::MemberShort;

/// Default maximum number of simultaneous loans per member
pub const LIMIT_LOANS: usize = 3;

/// Default loan period before a borrowed book counts as overdue
pub const LOAN_DURATION_DAYS: i64 = 14;

/// How `check_penalties` treats a loan that stays overdue across checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyPolicy {
    /// Every check charges another penalty while the loan is overdue
    #[default]
    Escalating,
    /// One penalty per overdue loan until the book is returned
    OncePerLoan,
}

/// Borrowing rules applied by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanRules {
    pub max_loans: usize,
    pub duration: Duration,
    pub penalty_policy: PenaltyPolicy,
}

impl Default for LoanRules {
    fn default() -> Self {
        Self {
            max_loans: LIMIT_LOANS,
            duration: Duration::days(LOAN_DURATION_DAYS),
            penalty_policy: PenaltyPolicy::default(),
        }
    }
}

/// Active loan with computed dates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanDetails {
    pub title: String,
    pub author: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub is_overdue: bool,
}

impl LoanDetails {
    /// Builds the view for a borrowed book; `None` when the book is available
    pub fn for_book(book: &Book, rules: &LoanRules, now: DateTime<Utc>) -> Option<Self> {
        let borrow_date = book.borrow_date?;
        Some(Self {
            title: book.title.clone(),
            author: book.author.clone(),
            borrow_date,
            due_date: book.due_date(rules.duration)?,
            is_overdue: book.is_overdue(now, rules.duration),
        })
    }
}

/// Borrower as resolved at search time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Borrower {
    pub id: u32,
    /// `None` when the id no longer resolves to a member
    pub name: Option<String>,
}

impl From<MemberShort> for Borrower {
    fn from(member: MemberShort) -> Self {
        Self {
            id: member.id,
            name: Some(member.name),
        }
    }
}

/// Search result with current loan status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub author: String,
    pub available: bool,
    pub borrower: Option<Borrower>,
    pub borrow_date: Option<DateTime<Utc>>,
    pub is_overdue: bool,
}

/// Penalty charged by one `check_penalties` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedPenalty {
    pub member_id: u32,
    pub title: String,
    /// Member's penalty count after this charge
    pub penalty_count: u32,
}
