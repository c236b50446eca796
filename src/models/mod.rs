//! Data models for the library catalog

pub mod book;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use book::{Book, BookSelector, NewBook};
pub use loan::{AppliedPenalty, Borrower, LoanDetails, LoanRules, PenaltyPolicy, SearchHit, LIMIT_LOANS};
pub use member::{Member, MemberShort, NewMember};
