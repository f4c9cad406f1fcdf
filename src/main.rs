//! # Library Reservations Demo
//!
//! Walks through a hold's lifecycle against a running [`LibrarySystem`]:
//! 1.  Setting up a small catalog and two members.
//! 2.  Reserving a book, then reserving it again from another member.
//! 3.  Waiting for the delayed borrow to complete the first hold.
//! 4.  Letting a hold expire after its member left.

use library_reservations::config::ReservationConfig;
use library_reservations::lifecycle::{setup_tracing, LibrarySystem};
use library_reservations::model::{Book, BookId, Member, MemberId};
use library_reservations::store::Library;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ReservationConfig::load().map_err(|e| e.to_string())?;
    info!(?config, "Starting library system");

    let system = LibrarySystem::new(&config);
    let library = &system.library;

    library.add_book(Book::new(42, "Dune", "Frank Herbert")).await;
    library.add_book(Book::new(43, "Emma", "Jane Austen")).await;
    library.add_member(Member::new(7, "Alice")).await;
    library.add_member(Member::new(9, "Bob")).await;

    let span = tracing::info_span!("reservation");
    async {
        report(library.reserve(BookId(42), MemberId(7)).await, "Alice reserves Dune");
        report(library.reserve(BookId(42), MemberId(9)).await, "Bob reserves Dune");
    }
    .instrument(span)
    .await;

    tokio::time::sleep(config.borrow_delay() * 2).await;
    print_catalog(library).await;

    let span = tracing::info_span!("expiry");
    async {
        report(library.reserve(BookId(43), MemberId(9)).await, "Bob reserves Emma");
        // Bob leaves before the borrow attempt runs, so the hold has to expire.
        if let Err(e) = library.remove_member(MemberId(9)).await {
            error!(error = %e, "Failed to remove member");
        }
        tokio::time::sleep(config.hold_duration() + config.borrow_delay()).await;
    }
    .instrument(span)
    .await;
    print_catalog(library).await;

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

fn report(result: Result<(), library_reservations::error::LibraryError>, what: &str) {
    match result {
        Ok(()) => info!(what, "ok"),
        Err(e) => info!(what, error = %e, "rejected"),
    }
}

async fn print_catalog(library: &Library) {
    for listing in library.list_books().await {
        info!(
            book_id = %listing.book.id,
            title = %listing.book.title,
            status = %listing.book.status,
            on_hold = listing.on_hold,
            "Catalog"
        );
    }
    for member in library.members().await {
        let borrowed = library
            .list_borrowed_books(member.id)
            .await
            .unwrap_or_default();
        let titles: Vec<&str> = borrowed.iter().map(|book| book.title.as_str()).collect();
        info!(member_id = %member.id, name = %member.name, ?titles, "Loans");
    }
}
