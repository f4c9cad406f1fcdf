use crate::config::ReservationConfig;
use crate::reservation;
use crate::store::Library;
use std::sync::Arc;
use tracing::{error, info};

/// The runtime orchestrator for the library and its reservation actor.
///
/// `LibrarySystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the reservation actor
/// - **Dependency Wiring**: The store owns the actor's client, and the actor
///   receives the store as its ledger
///
/// # Example
///
/// ```ignore
/// let system = LibrarySystem::new(&ReservationConfig::default());
///
/// system.library.add_book(Book::new(42, "Dune", "Frank Herbert")).await;
/// system.library.add_member(Member::new(7, "Alice")).await;
/// system.library.reserve(BookId(42), MemberId(7)).await?;
///
/// // Gracefully shut down when done
/// system.shutdown().await?;
/// ```
pub struct LibrarySystem {
    /// The shared store; also the actor's ledger.
    pub library: Arc<Library>,

    /// Task handle of the reservation actor (used for graceful shutdown)
    handle: tokio::task::JoinHandle<()>,
}

impl LibrarySystem {
    /// Creates the store, spawns the reservation actor and wires them together.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: &ReservationConfig) -> Self {
        // 1. Create the actor (no dependencies yet)
        let (actor, client) = reservation::new(config);

        // 2. The store takes the client
        let library = Arc::new(Library::new(client));

        // 3. Start the actor with the store injected as its ledger
        let handle = tokio::spawn(actor.run(Arc::clone(&library)));

        info!(
            mailbox_capacity = config.mailbox_capacity,
            "Library system started"
        );
        Self { library, handle }
    }

    /// Gracefully shuts down the reservation actor.
    ///
    /// The actor holds an `Arc` to the store and the store holds the actor's
    /// client, so dropping clients never closes the mailbox. An explicit
    /// shutdown message is sent instead; the actor releases every pending
    /// hold before it exits.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the actor shut down cleanly
    /// - `Err(String)` if the actor could not be reached or its task panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        if let Err(e) = self.library.reservations().shutdown().await {
            error!(error = %e, "Reservation actor did not acknowledge shutdown");
            return Err(e.to_string());
        }

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(format!("Actor task failed: {:?}", e));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
