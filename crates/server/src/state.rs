//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::providers::{ParcelClient, VehicleMarketClient};
use crate::store::{PgStorage, Storage};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Storage is held behind the trait so the same
/// handlers run against `MemoryStorage` in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    storage: Arc<dyn Storage>,
    vehicle_market: VehicleMarketClient,
    parcel: ParcelClient,
}

impl AppState {
    /// Create the application state with the production storage backend.
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let vehicle_market = VehicleMarketClient::new(&config.vehicle_provider);
        let parcel = ParcelClient::new(&config.parcel_provider);
        let storage: Arc<dyn Storage> = Arc::new(PgStorage::new(pool.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                storage,
                vehicle_market,
                parcel,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.inner.storage.as_ref()
    }

    /// Get a reference to the vehicle market-data client.
    #[must_use]
    pub fn vehicle_market(&self) -> &VehicleMarketClient {
        &self.inner.vehicle_market
    }

    /// Get a reference to the parcel data client.
    #[must_use]
    pub fn parcel(&self) -> &ParcelClient {
        &self.inner.parcel
    }
}
