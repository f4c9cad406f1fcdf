use library_reservations::config::ReservationConfig;
use library_reservations::error::LibraryError;
use library_reservations::lifecycle::LibrarySystem;
use library_reservations::model::{Book, BookId, BookStatus, Member, MemberId};
use std::time::Duration;

/// Starts a full system with two books and two members.
async fn seeded_system(config: &ReservationConfig) -> LibrarySystem {
    let system = LibrarySystem::new(config);
    let library = &system.library;
    library.add_book(Book::new(42, "Dune", "Frank Herbert")).await;
    library.add_book(Book::new(43, "Emma", "Jane Austen")).await;
    library.add_member(Member::new(7, "Alice")).await;
    library.add_member(Member::new(9, "Bob")).await;
    system
}

async fn status_of(system: &LibrarySystem, book_id: BookId) -> BookStatus {
    system
        .library
        .get_book(book_id)
        .await
        .expect("Book not found")
        .status
}

/// Full end-to-end run: the delayed borrow completes the hold.
#[tokio::test(start_paused = true)]
async fn test_reserved_book_is_borrowed_after_delay() {
    let system = seeded_system(&ReservationConfig::default()).await;
    let library = &system.library;

    library
        .reserve(BookId(42), MemberId(7))
        .await
        .expect("Failed to reserve");
    assert_eq!(status_of(&system, BookId(42)).await, BookStatus::Reserved);
    assert!(library.reservations().has_live_hold(BookId(42)).await);

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(status_of(&system, BookId(42)).await, BookStatus::Borrowed);
    let borrowed = library.list_borrowed_books(MemberId(7)).await.unwrap();
    assert_eq!(borrowed.len(), 1);
    assert_eq!(borrowed[0].id, BookId(42));
    assert!(!library.reservations().has_live_hold(BookId(42)).await);

    // The expiry timer was cancelled; the book stays borrowed.
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(status_of(&system, BookId(42)).await, BookStatus::Borrowed);

    system.shutdown().await.expect("Failed to shutdown system");
}

/// The member disappears mid-hold, so the borrow fails and the hold expires.
#[tokio::test(start_paused = true)]
async fn test_hold_expires_when_borrow_fails() {
    let system = seeded_system(&ReservationConfig::default()).await;
    let library = &system.library;

    library.reserve(BookId(42), MemberId(7)).await.unwrap();
    library.remove_member(MemberId(7)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(status_of(&system, BookId(42)).await, BookStatus::Reserved);
    assert!(library.reservations().has_live_hold(BookId(42)).await);

    // Not released before the hold duration.
    tokio::time::sleep(Duration::from_millis(4_700)).await;
    assert_eq!(status_of(&system, BookId(42)).await, BookStatus::Reserved);
    assert!(library.reservations().has_live_hold(BookId(42)).await);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(status_of(&system, BookId(42)).await, BookStatus::Available);
    assert!(!library.reservations().has_live_hold(BookId(42)).await);

    // Released books can be held again.
    library.reserve(BookId(42), MemberId(9)).await.unwrap();
    assert_eq!(
        library.reservations().holder(BookId(42)).await,
        Some(MemberId(9))
    );

    system.shutdown().await.unwrap();
}

/// A second reservation one second into a live hold is rejected.
#[tokio::test(start_paused = true)]
async fn test_second_reservation_during_hold_conflicts() {
    let config = ReservationConfig {
        borrow_delay_ms: 3_000,
        ..ReservationConfig::default()
    };
    let system = seeded_system(&config).await;
    let library = &system.library;

    library.reserve(BookId(42), MemberId(7)).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(
        library.reserve(BookId(42), MemberId(9)).await,
        Err(LibraryError::Conflict("book_42 is already reserved".into()))
    );

    // The first hold still completes for Alice.
    tokio::time::sleep(Duration::from_millis(2_100)).await;
    assert_eq!(status_of(&system, BookId(42)).await, BookStatus::Borrowed);
    let alice = library.get_member(MemberId(7)).await.unwrap();
    assert!(alice.has_borrowed(BookId(42)));
    let bob = library.get_member(MemberId(9)).await.unwrap();
    assert!(bob.borrowed.is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_borrowed_book_cannot_be_reserved() {
    let system = seeded_system(&ReservationConfig::default()).await;
    let library = &system.library;

    library.borrow_book(BookId(43), MemberId(9)).await.unwrap();
    assert_eq!(
        library.reserve(BookId(43), MemberId(7)).await,
        Err(LibraryError::Conflict("book_43 is not available".into()))
    );

    // After the return it can be held again.
    library.return_book(BookId(43), MemberId(9)).await.unwrap();
    library.reserve(BookId(43), MemberId(7)).await.unwrap();

    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_listing_annotates_holds() {
    let config = ReservationConfig {
        borrow_delay_ms: 3_000,
        ..ReservationConfig::default()
    };
    let system = seeded_system(&config).await;
    let library = &system.library;

    library.reserve(BookId(43), MemberId(7)).await.unwrap();

    let listings = library.list_books().await;
    let on_hold: Vec<(BookId, bool)> = listings
        .iter()
        .map(|listing| (listing.book.id, listing.on_hold))
        .collect();
    assert_eq!(on_hold, vec![(BookId(42), false), (BookId(43), true)]);

    // Held books are still listed as available to browse.
    assert_eq!(library.list_available_books().await.len(), 2);

    system.shutdown().await.unwrap();
}

/// Many members race for the same book through the store's public API.
#[tokio::test(start_paused = true)]
async fn test_concurrent_reservations_single_winner() {
    let system = seeded_system(&ReservationConfig::default()).await;
    for id in 100..110 {
        system
            .library
            .add_member(Member::new(id, format!("member {id}")))
            .await;
    }

    let mut handles = vec![];
    for id in 100..110 {
        let library = system.library.clone();
        handles.push(tokio::spawn(async move {
            library.reserve(BookId(42), MemberId(id)).await
        }));
    }

    let mut winners = vec![];
    for (offset, handle) in handles.into_iter().enumerate() {
        match handle.await.unwrap() {
            Ok(()) => winners.push(MemberId(100 + offset as u32)),
            Err(e) => assert!(e.is_conflict(), "unexpected error: {e}"),
        }
    }
    assert_eq!(winners.len(), 1, "Expected exactly one successful hold");

    tokio::time::sleep(Duration::from_millis(150)).await;
    let borrowed = system.library.list_borrowed_books(winners[0]).await.unwrap();
    assert_eq!(borrowed.len(), 1);
    assert_eq!(borrowed[0].id, BookId(42));

    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_reverts_held_books() {
    let config = ReservationConfig {
        borrow_delay_ms: 3_000,
        ..ReservationConfig::default()
    };
    let system = seeded_system(&config).await;
    let library = system.library.clone();

    library.reserve(BookId(42), MemberId(7)).await.unwrap();
    system.shutdown().await.unwrap();

    assert_eq!(
        library.get_book(BookId(42)).await.unwrap().status,
        BookStatus::Available
    );
    assert_eq!(
        library.reserve(BookId(42), MemberId(7)).await,
        Err(LibraryError::ActorClosed)
    );
}

/// A direct borrow that lands after the reserve fast path but before the
/// actor writes the hold must win; the hold is refused.
#[tokio::test(start_paused = true)]
async fn test_direct_borrow_between_fast_path_and_actor() {
    let system = seeded_system(&ReservationConfig::default()).await;
    let library = &system.library;

    library.borrow_book(BookId(42), MemberId(9)).await.unwrap();
    // Go straight to the actor, as a request that already passed the fast path.
    assert_eq!(
        library.reservations().reserve(BookId(42), MemberId(7)).await,
        Err(LibraryError::Conflict("book_42 is not available".into()))
    );
    assert!(!library.reservations().has_live_hold(BookId(42)).await);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(status_of(&system, BookId(42)).await, BookStatus::Borrowed);
    assert!(library.list_borrowed_books(MemberId(7)).await.unwrap().is_empty());
    assert!(library.get_member(MemberId(9)).await.unwrap().has_borrowed(BookId(42)));

    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_reserve_and_direct_borrow_lend_once() {
    let system = seeded_system(&ReservationConfig::default()).await;

    let reserving = system.library.clone();
    let reserve = tokio::spawn(async move { reserving.reserve(BookId(42), MemberId(7)).await });
    let borrowing = system.library.clone();
    let borrow = tokio::spawn(async move { borrowing.borrow_book(BookId(42), MemberId(9)).await });

    let reserve = reserve.await.unwrap();
    let borrow = borrow.await.unwrap();
    assert!(
        reserve.is_ok() != borrow.is_ok(),
        "exactly one path may take the book: reserve={reserve:?} borrow={borrow:?}"
    );

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(status_of(&system, BookId(42)).await, BookStatus::Borrowed);
    let alice = system.library.get_member(MemberId(7)).await.unwrap();
    let bob = system.library.get_member(MemberId(9)).await.unwrap();
    assert_eq!(
        alice.borrowed.len() + bob.borrowed.len(),
        1,
        "book lent more than once"
    );

    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_borrow_one_millisecond_before_expiry() {
    let config = ReservationConfig {
        hold_duration_ms: 5_000,
        borrow_delay_ms: 4_999,
        ..ReservationConfig::default()
    };
    let system = seeded_system(&config).await;
    let library = &system.library;

    library.reserve(BookId(42), MemberId(7)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(4_990)).await;
    assert_eq!(status_of(&system, BookId(42)).await, BookStatus::Reserved);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(status_of(&system, BookId(42)).await, BookStatus::Borrowed);
    assert!(library.get_member(MemberId(7)).await.unwrap().has_borrowed(BookId(42)));
    assert!(!library.reservations().has_live_hold(BookId(42)).await);

    system.shutdown().await.unwrap();
}
