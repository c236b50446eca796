use library_catalog::{models::BookSelector, AppError, ErrorKind};

use super::{assert_books_consistent, open_catalog};

#[test]
fn test_add_book_rejects_case_insensitive_duplicate() {
    let (_dir, mut catalog) = open_catalog();

    catalog.add_book("1984", "George Orwell").unwrap();
    let err = catalog.add_book("1984", "GEORGE ORWELL").unwrap_err();

    assert!(matches!(err, AppError::DuplicateBook { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(catalog.book_count(), 1);
}

#[test]
fn test_add_book_allows_same_title_other_author() {
    let (_dir, mut catalog) = open_catalog();

    catalog.add_book("Dune", "Frank Herbert").unwrap();
    catalog.add_book("Dune", "Brian Herbert").unwrap();

    assert_eq!(catalog.book_count(), 2);
}

#[test]
fn test_add_book_rejects_blank_fields() {
    let (_dir, mut catalog) = open_catalog();

    let err = catalog.add_book("   ", "Someone").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputValidation);
    assert_eq!(catalog.book_count(), 0);
}

#[test]
fn test_list_books_filters_and_restarts() {
    let (_dir, mut catalog) = open_catalog();
    catalog.add_book("1984", "George Orwell").unwrap();
    catalog.add_book("Le Petit Prince", "Antoine de Saint-Exupéry").unwrap();
    catalog.add_book("Dune", "Frank Herbert").unwrap();
    let alice = catalog.register_member("Alice").unwrap();
    catalog.borrow("dune", alice.id).unwrap();

    let all: Vec<&str> = catalog.list_books(None).map(|b| b.title.as_str()).collect();
    assert_eq!(all, vec!["1984", "Le Petit Prince", "Dune"]);

    let available: Vec<&str> = catalog.list_books(Some(true)).map(|b| b.title.as_str()).collect();
    assert_eq!(available, vec!["1984", "Le Petit Prince"]);

    let borrowed: Vec<&str> = catalog.list_books(Some(false)).map(|b| b.title.as_str()).collect();
    assert_eq!(borrowed, vec!["Dune"]);

    // A second pass sees the same sequence
    assert_eq!(catalog.list_books(None).count(), 3);
}

#[test]
fn test_find_book_matches_title_or_author() {
    let (_dir, mut catalog) = open_catalog();
    catalog.add_book("1984", "George Orwell").unwrap();
    catalog.add_book("Animal Farm", "George Orwell").unwrap();
    catalog.add_book("Le Petit Prince", "Antoine de Saint-Exupéry").unwrap();

    let titles: Vec<&str> = catalog.find_book("ORWELL").iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["1984", "Animal Farm"]);

    assert_eq!(catalog.find_book("petit").len(), 1);
    assert!(catalog.find_book("tolkien").is_empty());

    // The query is matched as given, surrounding spaces included
    assert_eq!(catalog.find_book(" prince").len(), 1);
    assert!(catalog.find_book("prince ").is_empty());
}

#[test]
fn test_remove_book() {
    let (_dir, mut catalog) = open_catalog();
    catalog.add_book("1984", "George Orwell").unwrap();

    let removed = catalog.remove_book("1984").unwrap();
    assert_eq!(removed.author, "George Orwell");
    assert_eq!(catalog.book_count(), 0);

    let err = catalog.remove_book("1984").unwrap_err();
    assert!(matches!(err, AppError::BookNotFound(ref t) if t == "1984"));
}

#[test]
fn test_remove_book_on_loan_is_rejected() {
    let (_dir, mut catalog) = open_catalog();
    catalog.add_book("1984", "George Orwell").unwrap();
    let alice = catalog.register_member("Alice").unwrap();
    catalog.borrow("1984", alice.id).unwrap();

    let err = catalog.remove_book("1984").unwrap_err();

    assert!(matches!(err, AppError::BookOnLoan(_)));
    assert_eq!(catalog.book_count(), 1);
    assert_eq!(catalog.get_member(alice.id).unwrap().borrowed_titles, vec!["1984"]);
}

#[test]
fn test_ambiguous_title_requires_author() {
    let (_dir, mut catalog) = open_catalog();
    catalog.add_book("Dune", "Frank Herbert").unwrap();
    catalog.add_book("Dune", "Brian Herbert").unwrap();
    let alice = catalog.register_member("Alice").unwrap();

    let err = catalog.borrow("Dune", alice.id).unwrap_err();
    assert!(matches!(err, AppError::AmbiguousTitle { count: 2, .. }));
    assert!(catalog.list_books(Some(false)).next().is_none());

    catalog
        .borrow(BookSelector::with_author("Dune", "brian herbert"), alice.id)
        .unwrap();
    let book = catalog.get_book(BookSelector::with_author("dune", "Brian Herbert")).unwrap();
    assert_eq!(book.borrower_id, Some(alice.id));

    let frank = catalog.get_book(BookSelector::with_author("Dune", "Frank Herbert")).unwrap();
    assert!(frank.available);
}

#[test]
fn test_register_member_assigns_increasing_ids() {
    let (_dir, mut catalog) = open_catalog();

    let alice = catalog.register_member("Alice").unwrap();
    let bob = catalog.register_member("  Bob ").unwrap();

    assert_eq!(alice.id, 1);
    assert_eq!(bob.id, 2);
    assert_eq!(bob.name, "Bob");
    assert_eq!(catalog.list_members().count(), 2);

    let err = catalog.get_member(3).unwrap_err();
    assert!(matches!(err, AppError::MemberNotFound(3)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_search_resolves_borrower() {
    let (_dir, mut catalog) = open_catalog();
    catalog.add_book("1984", "George Orwell").unwrap();
    catalog.add_book("Animal Farm", "George Orwell").unwrap();
    let alice = catalog.register_member("Alice").unwrap();
    catalog.borrow("1984", alice.id).unwrap();

    let hits = catalog.search("orwell");

    assert_eq!(hits.len(), 2);
    assert!(!hits[0].available);
    let borrower = hits[0].borrower.as_ref().unwrap();
    assert_eq!(borrower.id, alice.id);
    assert_eq!(borrower.name.as_deref(), Some("Alice"));
    assert!(hits[0].borrow_date.is_some());
    assert!(!hits[0].is_overdue);

    assert!(hits[1].available);
    assert!(hits[1].borrower.is_none());
    assert_books_consistent(&catalog);
}

#[test]
fn test_scenario_empty_catalog_to_first_loan() {
    let (_dir, mut catalog) = open_catalog();

    catalog.add_book("1984", "Orwell").unwrap();
    let books: Vec<_> = catalog.list_books(None).collect();
    assert_eq!(books.len(), 1);
    assert!(books[0].available);

    let alice = catalog.register_member("Alice").unwrap();
    assert_eq!(alice.id, 1);

    catalog.borrow("1984", 1).unwrap();
    assert!(!catalog.get_book("1984").unwrap().available);
    assert_eq!(catalog.get_member(1).unwrap().borrowed_titles, vec!["1984"]);

    let applied = catalog.check_penalties().unwrap();
    assert!(applied.is_empty());
    assert_eq!(catalog.get_member(1).unwrap().penalty_count, 0);
    assert_books_consistent(&catalog);
}
