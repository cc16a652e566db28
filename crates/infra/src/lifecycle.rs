//! Scoped store lifecycle.
//!
//! A [`StoreHost`] owns the configuration and opens the backend lazily. Screens take a
//! [`StoreLease`] for as long as they are visible; the backend closes when the last
//! lease is dropped and reopens on the next [`StoreHost::acquire`].

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};

use stockroom_events::{ChangeEnvelope, EventBus, Subscription};
use stockroom_products::ProductChange;

use crate::config::{StorageBackend, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::store::{ChangeBus, ProductStore};
use crate::table::{InMemoryProductTable, ProductTable, SqliteProductTable};

/// Store over whichever backend the host was configured with.
pub type SharedStore = ProductStore<Box<dyn ProductTable>, ChangeBus>;

#[derive(Default)]
struct HostState {
    store: Option<Arc<SharedStore>>,
    leases: usize,
}

/// Process-wide owner of the product store.
pub struct StoreHost {
    config: StoreConfig,
    bus: ChangeBus,
    // Memory rows outlive close/reopen cycles, like a database file would.
    memory: Arc<InMemoryProductTable>,
    state: Mutex<HostState>,
}

impl StoreHost {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            bus: ChangeBus::default(),
            memory: Arc::new(InMemoryProductTable::new()),
            state: Mutex::new(HostState::default()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Open the store if needed and hold it open until the lease is dropped.
    pub fn acquire(&self) -> StoreResult<StoreLease<'_>> {
        let mut state = self.lock_state()?;
        let store = match &state.store {
            Some(store) => Arc::clone(store),
            None => {
                let store = Arc::new(ProductStore::new(self.open_table()?, Arc::clone(&self.bus)));
                state.store = Some(Arc::clone(&store));
                store
            }
        };
        state.leases += 1;
        tracing::debug!(leases = state.leases, "store lease acquired");

        Ok(StoreLease { host: self, store })
    }

    pub fn is_open(&self) -> bool {
        self.lock_state().map(|s| s.store.is_some()).unwrap_or(false)
    }

    pub fn active_leases(&self) -> usize {
        self.lock_state().map(|s| s.leases).unwrap_or(0)
    }

    /// Change notifications for every store this host opens.
    ///
    /// The subscription outlives close/reopen cycles.
    pub fn subscribe(&self) -> Subscription<ChangeEnvelope<ProductChange>> {
        self.bus.subscribe()
    }

    fn open_table(&self) -> StoreResult<Box<dyn ProductTable>> {
        let table: Box<dyn ProductTable> = match &self.config.backend {
            StorageBackend::Memory => Box::new(Arc::clone(&self.memory)),
            StorageBackend::Sqlite { path } => Box::new(SqliteProductTable::open(path)?),
        };
        tracing::info!(backend = table.backend_name(), "product store opened");
        Ok(table)
    }

    fn lock_state(&self) -> StoreResult<MutexGuard<'_, HostState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::unavailable("store host lock poisoned"))
    }

    fn release(&self) {
        let closing = {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
            state.leases = state.leases.saturating_sub(1);
            tracing::debug!(leases = state.leases, "store lease released");
            if state.leases == 0 { state.store.take() } else { None }
        };

        if let Some(store) = closing {
            store.close();
            tracing::info!(backend = store.table().backend_name(), "product store closed");
        }
    }
}

impl fmt::Debug for StoreHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHost")
            .field("config", &self.config)
            .field("open", &self.is_open())
            .field("leases", &self.active_leases())
            .finish()
    }
}

/// Open handle on the host's store. Dereferences to [`SharedStore`].
pub struct StoreLease<'h> {
    host: &'h StoreHost,
    store: Arc<SharedStore>,
}

impl Deref for StoreLease<'_> {
    type Target = SharedStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl Drop for StoreLease<'_> {
    fn drop(&mut self) {
        self.host.release();
    }
}

impl fmt::Debug for StoreLease<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreLease")
            .field("backend", &self.store.table().backend_name())
            .finish()
    }
}
