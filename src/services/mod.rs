//! Catalog service: sole owner and mutator of the books and members collections.
//!
//! Operations are split by concern across the submodules, each adding an
//! `impl Catalog` block. Every mutating operation saves the collection(s) it
//! touched before returning.

pub mod books;
pub mod loans;
pub mod members;
pub mod search;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{book::BookSelector, loan::LoanRules},
    repository::{JsonStore, Repository, StoreIssue},
};

pub struct Catalog {
    repository: Repository,
    rules: LoanRules,
    issues: Vec<StoreIssue>,
}

impl Catalog {
    /// Open a catalog over `store` using the given collection keys
    pub fn open(store: JsonStore, books_key: &str, members_key: &str, rules: LoanRules) -> Self {
        let (repository, issues) = Repository::open(store, books_key, members_key);
        tracing::info!(
            "Catalog opened: {} books, {} members",
            repository.books.len(),
            repository.members.all().len()
        );
        Self {
            repository,
            rules,
            issues,
        }
    }

    /// Open the catalog described by `config`, seeding starter books when
    /// the books store did not exist yet
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let store = JsonStore::new(&config.storage.data_dir);
        let mut catalog = Self::open(
            store,
            &config.storage.books_key,
            &config.storage.members_key,
            config.loan_rules(),
        );

        let books_path = catalog.repository.books_path();
        let first_run = catalog
            .issues
            .iter()
            .any(|issue| issue.is_missing() && issue.path() == books_path.as_path());
        if config.catalog.seed_on_first_run && first_run {
            let added = catalog.seed_books(&config.catalog.seed_books)?;
            tracing::info!("Seeded {} starter books", added);
        }

        Ok(catalog)
    }

    /// Issues met while loading the stores
    pub fn load_issues(&self) -> &[StoreIssue] {
        &self.issues
    }

    pub fn rules(&self) -> &LoanRules {
        &self.rules
    }

    /// Index of the single book picked by `selector`
    fn resolve_book(&self, selector: &BookSelector) -> AppResult<usize> {
        let matches = self.repository.books.positions(|b| selector.selects(b));
        match matches.as_slice() {
            [] => Err(AppError::BookNotFound(selector.title.trim().to_string())),
            [idx] => Ok(*idx),
            _ => Err(AppError::AmbiguousTitle {
                title: selector.title.trim().to_string(),
                count: matches.len(),
            }),
        }
    }
}
