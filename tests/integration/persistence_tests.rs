use std::fs;

use chrono::{Duration, Utc};
use library_catalog::{
    config::{AppConfig, SeedBook},
    models::{Book, LoanRules, Member},
    repository::{JsonStore, Loaded, StoreIssue},
    Catalog,
};
use serde_json::Value;

use super::{once_per_loan, open_catalog, open_catalog_with, reopen};

#[test]
fn test_fresh_directory_reports_missing_stores() {
    let (_dir, catalog) = open_catalog();

    let issues = catalog.load_issues();
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(StoreIssue::is_missing));
    assert_eq!(catalog.book_count(), 0);
}

#[test]
fn test_reopen_restores_both_collections() {
    let (dir, mut catalog) = open_catalog();
    catalog.add_book("1984", "George Orwell").unwrap();
    catalog.add_book("Le Petit Prince", "Antoine de Saint-Exupéry").unwrap();
    let alice = catalog.register_member("Alice").unwrap();
    catalog.borrow("Le Petit Prince", alice.id).unwrap();

    let books: Vec<Book> = catalog.list_books(None).cloned().collect();
    let members: Vec<Member> = catalog.list_members().cloned().collect();

    let reopened = reopen(&dir, LoanRules::default());

    assert!(reopened.load_issues().is_empty());
    assert_eq!(reopened.list_books(None).cloned().collect::<Vec<_>>(), books);
    assert_eq!(reopened.list_members().cloned().collect::<Vec<_>>(), members);
}

#[test]
fn test_next_id_survives_reopen() {
    let (dir, mut catalog) = open_catalog();
    catalog.register_member("Alice").unwrap();
    catalog.register_member("Bob").unwrap();

    let mut reopened = reopen(&dir, LoanRules::default());
    let carol = reopened.register_member("Carol").unwrap();

    assert_eq!(carol.id, 3);
}

#[test]
fn test_lost_members_store_does_not_reuse_borrower_ids() {
    let (dir, mut catalog) = open_catalog();
    catalog.add_book("1984", "George Orwell").unwrap();
    let alice = catalog.register_member("Alice").unwrap();
    catalog
        .borrow_at("1984", alice.id, Utc::now() - Duration::days(30))
        .unwrap();

    fs::write(dir.path().join("members.json"), "{ corrupt").unwrap();
    let mut reopened = reopen(&dir, LoanRules::default());
    let mallory = reopened.register_member("Mallory").unwrap();

    assert_eq!(mallory.id, 2);
    assert!(reopened.return_book("1984", mallory.id).is_err());
    assert!(reopened.check_penalties().unwrap().is_empty());
    assert_eq!(reopened.get_member(mallory.id).unwrap().penalty_count, 0);
}

#[test]
fn test_inconsistent_book_record_is_normalized_on_load() {
    let (dir, mut catalog) = open_catalog();
    catalog.add_book("1984", "George Orwell").unwrap();

    fs::write(
        dir.path().join("books.json"),
        r#"{"books": [{"title": "1984", "author": "George Orwell", "available": false, "borrowerId": null, "borrowDate": null}]}"#,
    )
    .unwrap();
    let mut reopened = reopen(&dir, LoanRules::default());

    assert!(reopened.get_book("1984").unwrap().available);
    let alice = reopened.register_member("Alice").unwrap();
    reopened.borrow("1984", alice.id).unwrap();
    reopened.return_book("1984", alice.id).unwrap();
    reopened.remove_book("1984").unwrap();
}

#[test]
fn test_store_layout() {
    let (dir, mut catalog) = open_catalog();
    catalog.add_book("Le Petit Prince", "Antoine de Saint-Exupéry").unwrap();
    let alice = catalog.register_member("Zoé").unwrap();
    catalog.borrow("Le Petit Prince", alice.id).unwrap();

    let books_text = fs::read_to_string(dir.path().join("books.json")).unwrap();
    assert!(books_text.contains("Saint-Exupéry"));
    assert!(!books_text.contains("\\u00e9"));

    let books: Value = serde_json::from_str(&books_text).unwrap();
    let record = &books["books"][0];
    assert_eq!(record["title"], "Le Petit Prince");
    assert_eq!(record["available"], false);
    assert_eq!(record["borrowerId"], 1);
    assert!(record["borrowDate"].is_string());

    // Keys are written in sorted order
    let positions: Vec<usize> = ["author", "available", "borrowDate", "borrowerId", "title"]
        .iter()
        .map(|k| books_text.find(&format!("\"{}\"", k)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let members: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("members.json")).unwrap()).unwrap();
    assert_eq!(members["members"][0]["name"], "Zoé");
    assert_eq!(members["members"][0]["borrowedTitles"][0], "Le Petit Prince");
    assert_eq!(members["members"][0]["penaltyCount"], 0);
}

#[test]
fn test_return_clears_nullable_fields_on_disk() {
    let (dir, mut catalog) = open_catalog();
    catalog.add_book("1984", "George Orwell").unwrap();
    let alice = catalog.register_member("Alice").unwrap();
    catalog.borrow("1984", alice.id).unwrap();
    catalog.return_book("1984", alice.id).unwrap();

    let books: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("books.json")).unwrap()).unwrap();
    let record = &books["books"][0];
    assert_eq!(record["available"], true);
    assert!(record["borrowerId"].is_null());
    assert!(record["borrowDate"].is_null());
}

#[test]
fn test_corrupt_store_loads_empty_with_issue() {
    let (dir, mut catalog) = open_catalog();
    catalog.add_book("1984", "George Orwell").unwrap();
    catalog.register_member("Alice").unwrap();

    fs::write(dir.path().join("books.json"), "[{\"title\": ").unwrap();
    let reopened = reopen(&dir, LoanRules::default());

    assert_eq!(reopened.book_count(), 0);
    assert_eq!(reopened.list_members().count(), 1);
    let issues = reopened.load_issues();
    assert_eq!(issues.len(), 1);
    assert!(matches!(issues[0], StoreIssue::Malformed { .. }));
    assert!(issues[0].to_string().contains("malformed"));
}

#[test]
fn test_penalty_marker_persists() {
    let (dir, mut catalog) = open_catalog_with(once_per_loan());
    catalog.add_book("1984", "George Orwell").unwrap();
    let alice = catalog.register_member("Alice").unwrap();
    let start = Utc::now() - Duration::days(30);
    catalog.borrow_at("1984", alice.id, start).unwrap();
    catalog.check_penalties().unwrap();

    let mut reopened = reopen(&dir, once_per_loan());
    assert!(reopened.get_book("1984").unwrap().penalty_applied);
    assert!(reopened.check_penalties().unwrap().is_empty());
    assert_eq!(reopened.get_member(alice.id).unwrap().penalty_count, 1);
}

#[test]
fn test_store_round_trip_is_field_for_field() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path());

    let mut lent = Book::new("Dune", "Frank Herbert");
    lent.lend(4, Utc::now());
    let books = vec![Book::new("1984", "George Orwell"), lent];

    store.save("books", &books).unwrap();
    let loaded: Loaded<Book> = store.load("books");

    assert!(loaded.issue.is_none());
    assert_eq!(loaded.records, books);
}

#[test]
fn test_from_config_seeds_first_run_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();
    config.catalog.seed_books = vec![
        SeedBook {
            title: "1984".to_string(),
            author: "George Orwell".to_string(),
        },
        SeedBook {
            title: "1984".to_string(),
            author: "george orwell".to_string(),
        },
    ];

    let mut catalog = Catalog::from_config(&config).unwrap();
    assert_eq!(catalog.book_count(), 1);
    catalog.remove_book("1984").unwrap();

    // The books store now exists, so nothing is seeded again
    let catalog = Catalog::from_config(&config).unwrap();
    assert_eq!(catalog.book_count(), 0);
}

