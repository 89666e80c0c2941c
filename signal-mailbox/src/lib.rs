//! Signal Mailbox
//!
//! A shared mailbox for trading signals. Producers push signal records
//! identified by a unique id; consumers poll for the current set, sorted by
//! intended open time.
//!
//! # Architecture
//!
//! - **Domain**: the `Signal` record, its identity and validation
//! - **Application**: the `SignalRegistry` and its storage port
//! - **Infrastructure**: JSON file / in-memory stores, clocks, configuration
//! - **Presentation**: REST API handlers
//!
//! # Behaviour
//!
//! - One record per `unique_id`; a new submission replaces the old one
//! - `lot <= 0` closes (removes) the signal with that id
//! - Closed records older than the retention window are swept on read
//! - The whole collection is written to disk after every accepted submission
//!
//! # Example
//!
//! ```ignore
//! use signal_mailbox::{MailboxConfig, SignalMailbox};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mailbox = SignalMailbox::new(MailboxConfig::default()).await;
//!     mailbox.run().await.unwrap();
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types
pub use domain::{Clock, IngestError, REQUIRED_FIELDS, Signal, SignalId, Timestamp};

pub use application::{
    ExpirationPolicy, PersistenceError, SignalRegistry, SignalStore, UpsertOutcome,
};

pub use infrastructure::{
    ConfigError, InMemorySignalStore, JsonFileStore, MailboxConfig, ManualClock, SystemClock,
};

pub use presentation::{AppState, create_router};

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// The mailbox server: a registry plus the REST surface in front of it
pub struct SignalMailbox<C, S>
where
    C: Clock + 'static,
    S: SignalStore + 'static,
{
    pub config: MailboxConfig,
    pub registry: Arc<SignalRegistry<C, S>>,
}

impl<C, S> SignalMailbox<C, S>
where
    C: Clock + 'static,
    S: SignalStore + 'static,
{
    /// Create a mailbox over the given clock and store, seeding the registry
    /// from the store
    pub async fn with_parts(config: MailboxConfig, clock: Arc<C>, store: Arc<S>) -> Self {
        let registry =
            Arc::new(SignalRegistry::open(clock, store, config.expiration_policy()).await);

        SignalMailbox { config, registry }
    }

    /// Create the REST API router
    pub fn router(&self) -> Router {
        create_router(Arc::new(AppState::new(Arc::clone(&self.registry))))
    }

    /// Start the periodic expiration sweep if `sweep_interval_secs` is set.
    ///
    /// Like the sweep on read, this never persists.
    pub fn spawn_sweeper(&self) -> Option<JoinHandle<()>> {
        let period = self.config.sweep_interval()?;
        let registry = Arc::clone(&self.registry);

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let swept = registry.sweep_expired().await;
                if swept > 0 {
                    info!(swept, "Background sweep removed expired signals");
                }
            }
        }))
    }

    /// Run the mailbox server
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.config.bind_addr();
        let router = self.router();

        if let Some(period) = self.config.sweep_interval() {
            info!(?period, "Background expiration sweep enabled");
        }
        let _sweeper = self.spawn_sweeper();

        info!("Signal mailbox listening on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await
    }
}

impl SignalMailbox<SystemClock, JsonFileStore> {
    /// Create a mailbox backed by the configured signals file and the wall clock
    pub async fn new(config: MailboxConfig) -> Self {
        let store = Arc::new(JsonFileStore::new(config.signals_file.clone()));
        Self::with_parts(config, Arc::new(SystemClock::new()), store).await
    }
}
