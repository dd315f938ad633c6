//! Catalog service and record store tests against SQLite

mod common;

use bookshelf_server::{
    config::CatalogConfig,
    models::{AvailabilityChange, BookInput},
    repository::StoreError,
    services::catalog::CatalogService,
    AppError,
};

use common::{book_input, memory_repository};

async fn catalog() -> CatalogService {
    CatalogService::new(memory_repository().await, CatalogConfig::default())
}

#[tokio::test]
async fn test_create_then_get_returns_input_with_defaults() {
    let catalog = catalog().await;
    let input = BookInput {
        title: "Test Book".to_string(),
        author: "Test Author".to_string(),
        isbn: "1234567890".to_string(),
        published_year: None,
        description: None,
    };

    let created = catalog.create_book(&input).await.unwrap();
    assert_eq!(created.id, 1);
    assert!(created.available);
    assert_eq!(created.published_year, None);
    assert_eq!(created.description, None);

    let loaded = catalog.get_book(created.id).await.unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.title, input.title);
    assert_eq!(loaded.author, input.author);
    assert_eq!(loaded.isbn, input.isbn);
}

#[tokio::test]
async fn test_duplicate_isbn_is_conflict_and_leaves_store_unchanged() {
    let catalog = catalog().await;
    let first = catalog
        .create_book(&book_input("Test Book", "Test Author", "1234567890"))
        .await
        .unwrap();

    let err = catalog
        .create_book(&book_input("Other Book", "Other Author", "1234567890"))
        .await
        .unwrap_err();
    match err {
        AppError::Conflict(msg) => assert_eq!(msg, "ISBN already exists"),
        other => panic!("expected conflict, got {other:?}"),
    }

    let books = catalog.list_books(None, None).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0], first);
}

#[tokio::test]
async fn test_borrow_twice_is_invalid_state() {
    let catalog = catalog().await;
    let book = catalog
        .create_book(&book_input("Test Book", "Test Author", "1234567890"))
        .await
        .unwrap();

    catalog.borrow_book(book.id).await.unwrap();
    let err = catalog.borrow_book(book.id).await.unwrap_err();
    match err {
        AppError::InvalidState(msg) => assert_eq!(msg, "Book is not available"),
        other => panic!("expected invalid state, got {other:?}"),
    }
    assert!(!catalog.get_book(book.id).await.unwrap().available);
}

#[tokio::test]
async fn test_return_never_borrowed_is_invalid_state() {
    let catalog = catalog().await;
    let book = catalog
        .create_book(&book_input("Test Book", "Test Author", "1234567890"))
        .await
        .unwrap();

    let err = catalog.return_book(book.id).await.unwrap_err();
    match err {
        AppError::InvalidState(msg) => assert_eq!(msg, "Book is already returned"),
        other => panic!("expected invalid state, got {other:?}"),
    }
    assert!(catalog.get_book(book.id).await.unwrap().available);
}

#[tokio::test]
async fn test_borrow_and_return_missing_book_is_not_found() {
    let catalog = catalog().await;
    assert!(matches!(catalog.borrow_book(42).await, Err(AppError::NotFound(_))));
    assert!(matches!(catalog.return_book(42).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let catalog = catalog().await;
    let book = catalog
        .create_book(&book_input("Test Book", "Test Author", "1234567890"))
        .await
        .unwrap();
    catalog.borrow_book(book.id).await.unwrap();

    catalog.delete_book(book.id).await.unwrap();
    match catalog.get_book(book.id).await.unwrap_err() {
        AppError::NotFound(msg) => assert_eq!(msg, "Book not found"),
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(matches!(catalog.delete_book(book.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let catalog = catalog().await;
    let first = catalog
        .create_book(&book_input("First", "Author", "111"))
        .await
        .unwrap();
    catalog.delete_book(first.id).await.unwrap();

    let second = catalog
        .create_book(&book_input("Second", "Author", "111"))
        .await
        .unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_update_replaces_all_mutable_fields() {
    let catalog = catalog().await;
    let book = catalog
        .create_book(&book_input("Test Book", "Test Author", "1234567890"))
        .await
        .unwrap();
    catalog.borrow_book(book.id).await.unwrap();

    let update = BookInput {
        title: "Updated Book".to_string(),
        author: "Updated Author".to_string(),
        isbn: "0987654321".to_string(),
        published_year: None,
        description: None,
    };
    let updated = catalog.update_book(book.id, &update).await.unwrap();

    assert_eq!(updated.id, book.id);
    assert_eq!(updated.created_at, book.created_at);
    assert_eq!(updated.title, "Updated Book");
    assert_eq!(updated.isbn, "0987654321");
    // Omitted optional fields are cleared, not kept
    assert_eq!(updated.published_year, None);
    assert_eq!(updated.description, None);
    // Availability is not part of the replace
    assert!(!updated.available);
}

#[tokio::test]
async fn test_update_keeping_own_isbn_succeeds() {
    let catalog = catalog().await;
    let book = catalog
        .create_book(&book_input("Test Book", "Test Author", "1234567890"))
        .await
        .unwrap();

    let updated = catalog
        .update_book(book.id, &book_input("Renamed", "Test Author", "1234567890"))
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
}

#[tokio::test]
async fn test_update_to_taken_isbn_fails() {
    let catalog = catalog().await;
    catalog
        .create_book(&book_input("First", "Author", "111"))
        .await
        .unwrap();
    let second = catalog
        .create_book(&book_input("Second", "Author", "222"))
        .await
        .unwrap();

    let err = catalog
        .update_book(second.id, &book_input("Second", "Author", "111"))
        .await
        .unwrap_err();
    match err {
        AppError::UpdateFailed(msg) => assert_eq!(msg, "Update failed"),
        other => panic!("expected update failure, got {other:?}"),
    }
    assert_eq!(catalog.get_book(second.id).await.unwrap().isbn, "222");
}

#[tokio::test]
async fn test_update_missing_book_is_not_found() {
    let catalog = catalog().await;
    let err = catalog
        .update_book(999, &book_input("Updated", "Author", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_search_matches_title_author_and_isbn_case_insensitively() {
    let catalog = catalog().await;
    catalog
        .create_book(&book_input("Python Programming", "John Doe", "1234567890"))
        .await
        .unwrap();
    catalog
        .create_book(&book_input("Java Programming", "Jane Smith", "0987654321"))
        .await
        .unwrap();

    let by_title = catalog.search_books("Python").await.unwrap();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].title, "Python Programming");

    let lowercase = catalog.search_books("python").await.unwrap();
    assert_eq!(lowercase, by_title);

    let by_author = catalog.search_books("smith").await.unwrap();
    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].author, "Jane Smith");

    let by_isbn = catalog.search_books("1234567890").await.unwrap();
    assert_eq!(by_isbn.len(), 1);
    assert_eq!(by_isbn[0].isbn, "1234567890");

    let both = catalog.search_books("Programming").await.unwrap();
    assert_eq!(both.len(), 2);
    assert!(both[0].id < both[1].id);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let catalog = catalog().await;
    catalog
        .create_book(&book_input("Python Programming", "John Doe", "1234567890"))
        .await
        .unwrap();
    catalog
        .create_book(&book_input("100% Rust", "Jane_Smith", "0987654321"))
        .await
        .unwrap();

    assert!(catalog.search_books("!@#$%^&*()").await.unwrap().is_empty());
    assert!(catalog.search_books("%").await.unwrap().len() == 1);
    assert!(catalog.search_books("_").await.unwrap().len() == 1);
    assert!(catalog.search_books("P_thon").await.unwrap().is_empty());
    assert!(catalog.search_books("\\").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_is_ordered_and_paginated() {
    let catalog = catalog().await;
    for i in 0..5 {
        catalog
            .create_book(&book_input(&format!("Book {i}"), "Author", &format!("isbn-{i}")))
            .await
            .unwrap();
    }

    let all = catalog.list_books(Some(0), Some(100)).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    let page = catalog.list_books(Some(1), Some(2)).await.unwrap();
    let ids: Vec<i64> = page.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![2, 3]);

    // Negative skip is clamped to zero, negative limit to an empty page
    assert_eq!(catalog.list_books(Some(-3), None).await.unwrap().len(), 5);
    assert!(catalog.list_books(None, Some(-1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_limit_is_capped_by_page_size() {
    let catalog = CatalogService::new(memory_repository().await, CatalogConfig { max_page_size: 2 });
    for i in 0..4 {
        catalog
            .create_book(&book_input("Book", "Author", &format!("isbn-{i}")))
            .await
            .unwrap();
    }
    assert_eq!(catalog.list_books(None, Some(50)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_permissive_fields_are_accepted() {
    let catalog = catalog().await;
    let mut input = book_input("Test Book", "Test Author", "1234567890");
    input.published_year = Some(-2023);
    let book = catalog.create_book(&input).await.unwrap();
    assert_eq!(book.published_year, Some(-2023));

    let empty_title = book_input("", "Test Author", "1234567891");
    let book = catalog.create_book(&empty_title).await.unwrap();
    assert_eq!(book.title, "");
}

#[tokio::test]
async fn test_store_set_availability_reports_outcome() {
    let repository = memory_repository().await;
    let book = repository
        .books
        .insert(&book_input("Test Book", "Test Author", "1234567890"))
        .await
        .unwrap();

    assert_eq!(
        repository.books.set_availability(book.id, true).await.unwrap(),
        AvailabilityChange::Unchanged
    );
    assert_eq!(
        repository.books.set_availability(book.id, false).await.unwrap(),
        AvailabilityChange::Changed
    );
    assert!(matches!(
        repository.books.set_availability(999, false).await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn test_store_reports_duplicate_key() {
    let repository = memory_repository().await;
    let input = book_input("Test Book", "Test Author", "1234567890");
    repository.books.insert(&input).await.unwrap();

    assert!(matches!(
        repository.books.insert(&input).await,
        Err(StoreError::DuplicateKey)
    ));
    assert!(matches!(
        repository.books.replace(999, &input).await,
        Err(StoreError::NotFound)
    ));
    repository.ping().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_borrows_admit_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = CatalogService::new(
        common::file_repository(dir.path(), 8).await,
        CatalogConfig::default(),
    );
    let book = catalog
        .create_book(&book_input("Test Book", "Test Author", "1234567890"))
        .await
        .unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let catalog = catalog.clone();
            tokio::spawn(async move { catalog.borrow_book(book.id).await })
        })
        .collect();

    let mut borrowed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => borrowed += 1,
            Err(AppError::InvalidState(msg)) => assert_eq!(msg, "Book is not available"),
            Err(other) => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(borrowed, 1);
    assert!(!catalog.get_book(book.id).await.unwrap().available);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_with_same_isbn_admit_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = CatalogService::new(
        common::file_repository(dir.path(), 8).await,
        CatalogConfig::default(),
    );

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let catalog = catalog.clone();
            tokio::spawn(async move {
                catalog
                    .create_book(&book_input(&format!("Copy {i}"), "Author", "1234567890"))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "ISBN already exists"),
            Err(other) => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(catalog.list_books(None, None).await.unwrap().len(), 1);
}
