//! Member model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Member record as persisted in the members store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    pub id: u32,
    /// Titles of the books this member currently holds, in borrow order
    pub borrowed_titles: Vec<String>,
    pub penalty_count: u32,
}

impl Member {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id,
            borrowed_titles: Vec::new(),
            penalty_count: 0,
        }
    }

    pub fn loan_count(&self) -> usize {
        self.borrowed_titles.len()
    }

    /// Under the loan limit and free of penalties
    pub fn can_borrow(&self, max_loans: usize) -> bool {
        self.loan_count() < max_loans && self.penalty_count == 0
    }

    pub fn record_loan(&mut self, title: &str) {
        self.borrowed_titles.push(title.to_string());
    }

    /// Drops the first entry for `title`; returns false when absent
    pub fn end_loan(&mut self, title: &str) -> bool {
        let position = self
            .borrowed_titles
            .iter()
            .position(|t| t == title)
            .or_else(|| {
                let lowered = title.to_lowercase();
                self.borrowed_titles
                    .iter()
                    .position(|t| t.to_lowercase() == lowered)
            });

        match position {
            Some(idx) => {
                self.borrowed_titles.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Member reference for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberShort {
    pub id: u32,
    pub name: String,
}

impl From<&Member> for MemberShort {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
        }
    }
}

/// Register member request
#[derive(Debug, Clone, Validate)]
pub struct NewMember {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
}

impl NewMember {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }
}
