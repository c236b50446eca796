//! Error types for the library catalog

use thiserror::Error;

/// Broad failure classes reported to the interface layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    PolicyViolation,
    PersistenceFailure,
    InputValidation,
    Config,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Book '{0}' does not exist in the library")]
    BookNotFound(String),

    #[error("No member with id {0}")]
    MemberNotFound(u32),

    #[error("'{title}' by {author} already exists in the library")]
    DuplicateBook { title: String, author: String },

    #[error("'{0}' is already borrowed")]
    AlreadyBorrowed(String),

    #[error("'{0}' was not borrowed")]
    NotBorrowed(String),

    #[error("'{title}' was not borrowed by member {member_id}")]
    BorrowedByOther { title: String, member_id: u32 },

    #[error("Several books are titled '{title}' ({count}); specify the author")]
    AmbiguousTitle { title: String, count: usize },

    #[error("'{0}' is currently on loan and cannot be removed")]
    BookOnLoan(String),

    #[error("Member {member_id} already holds {limit} loans")]
    LoanLimitReached { member_id: u32, limit: usize },

    #[error("Member {member_id} has {penalties} outstanding {}", penalty_noun(.penalties))]
    PenaltyActive { member_id: u32, penalties: u32 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

fn penalty_noun(count: &u32) -> &'static str {
    if *count == 1 {
        "penalty"
    } else {
        "penalties"
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BookNotFound(_) | AppError::MemberNotFound(_) => ErrorKind::NotFound,
            AppError::DuplicateBook { .. }
            | AppError::AlreadyBorrowed(_)
            | AppError::NotBorrowed(_)
            | AppError::BorrowedByOther { .. }
            | AppError::AmbiguousTitle { .. }
            | AppError::BookOnLoan(_) => ErrorKind::Conflict,
            AppError::LoanLimitReached { .. } | AppError::PenaltyActive { .. } => {
                ErrorKind::PolicyViolation
            }
            AppError::Storage(_) | AppError::Serialization(_) => ErrorKind::PersistenceFailure,
            AppError::Validation(_) => ErrorKind::InputValidation,
            AppError::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        AppError::Validation(messages.join(", "))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
