//! In-memory registry of watched networks.
//!
//! The map is the single source of truth for what is running. One
//! readers-writer lock guards it; `add` and `delete` hold the write half for
//! their whole duration, including the watcher start/stop and the store
//! upsert, so every mutation is totally ordered and reads never observe a
//! partial change.

use crate::error::{Result, TickerError};
use crate::metrics::WatchMetrics;
use crate::models::{normalize_network, Gas, GasRequest};
use crate::store::{GasStore, Persistence, UpsertOutcome};
use crate::watcher::Watcher;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct GasRegistry<S = Persistence> {
    watching: RwLock<HashMap<String, Gas>>,
    store: S,
    watcher: Arc<dyn Watcher>,
    metrics: WatchMetrics,
}

impl<S: GasStore> GasRegistry<S> {
    pub fn new(store: S, watcher: Arc<dyn Watcher>, metrics: WatchMetrics) -> Self {
        Self {
            watching: RwLock::new(HashMap::new()),
            store,
            watcher,
            metrics,
        }
    }

    /// Start watching a new network.
    ///
    /// Validation and the duplicate check happen before any side effect.
    /// A failed store write is logged and does not undo the registration.
    pub async fn add(&self, req: GasRequest) -> Result<Gas> {
        let mut watching = self.watching.write().await;

        req.validate()?;
        let spec = req.into_spec();

        if watching.contains_key(&spec.network) {
            return Err(TickerError::AlreadyWatching(spec.network));
        }

        let handle = self.watcher.start(&spec);
        let gas = Gas::new(spec, handle);
        watching.insert(gas.network.clone(), gas.clone());
        self.metrics.gas_count().inc();

        match self.store.upsert(&gas.spec()).await {
            Ok(UpsertOutcome::Skipped) => {
                tracing::debug!(network = %gas.network, "No store configured, skipping persistence")
            },
            Ok(outcome) => tracing::debug!(network = %gas.network, ?outcome, "Persisted gas"),
            Err(e) => {
                tracing::warn!(network = %gas.network, error = %e, "Unable to persist gas")
            },
        }

        tracing::info!(network = %gas.network, frequency = gas.frequency, "Added gas");
        Ok(gas)
    }

    /// Stop watching a network. The persisted row is left in place.
    pub async fn delete(&self, network: &str) -> Result<()> {
        let network = normalize_network(network);
        let mut watching = self.watching.write().await;

        let Some(gas) = watching.get(&network) else {
            return Err(TickerError::NotWatching(network));
        };

        gas.handle().stop();
        self.metrics.gas_count().dec();
        watching.remove(&network);

        tracing::info!(network = %network, "Deleted gas");
        Ok(())
    }

    /// Snapshot of everything currently watched, keyed by network
    pub async fn list(&self) -> BTreeMap<String, Gas> {
        let watching = self.watching.read().await;
        watching
            .iter()
            .map(|(network, gas)| (network.clone(), gas.clone()))
            .collect()
    }

    pub async fn get(&self, network: &str) -> Option<Gas> {
        let watching = self.watching.read().await;
        watching.get(&normalize_network(network)).cloned()
    }

    pub async fn len(&self) -> usize {
        self.watching.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.watching.read().await.is_empty()
    }

    pub fn metrics(&self) -> &WatchMetrics {
        &self.metrics
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stop every watcher and empty the registry
    pub async fn shutdown(&self) {
        let mut watching = self.watching.write().await;
        let count = watching.len();

        for gas in watching.values() {
            gas.handle().stop();
        }
        watching.clear();
        self.metrics.gas_count().set(0);

        tracing::info!(count, "Stopped all gas watchers");
    }
}
