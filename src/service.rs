//! Restaurant query service
//!
//! `RestaurantCache` answers every query from the full restaurant collection.
//! The collection comes from the local store when it has been populated and
//! from the network source otherwise, in which case the fetched records are
//! written to the store for next time.
//!
//! Concurrent queries against an empty store are not coalesced: each one
//! issues its own network request.

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::RestaurantStore;
use crate::data::filter;
use crate::data::{Restaurant, RestaurantKey, RestaurantSource, SourceError};

/// Errors returned by restaurant queries
#[derive(Debug, Error)]
pub enum CacheError {
    /// The network request failed or its response could not be parsed
    #[error("Request failed.")]
    RequestFailed(#[source] SourceError),

    /// No restaurant matched the requested id
    #[error("Restaurant does not exist")]
    NotFound,
}

/// Restaurant queries backed by a local store with network fallback
pub struct RestaurantCache<S> {
    /// Network source used when the store is empty or absent
    source: S,
    /// Local store; `None` runs network-only
    store: Option<Mutex<RestaurantStore>>,
}

impl<S: RestaurantSource> RestaurantCache<S> {
    /// Creates the service from an opened store, or `None` for network-only
    pub fn new(source: S, store: Option<RestaurantStore>) -> Self {
        if store.is_none() {
            info!("No restaurant store available, running network-only");
        }

        Self {
            source,
            store: store.map(Mutex::new),
        }
    }

    /// Whether fetched restaurants are persisted locally
    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Returns all restaurants
    ///
    /// # Behavior
    /// - Returns the stored collection, ordered by `createdAt`, when it is not empty
    /// - Otherwise fetches from the network source, stores every record and
    ///   returns the fetched collection
    /// - Failing to store is logged and does not fail the query
    pub async fn fetch_all(&self) -> Result<Vec<Restaurant>, CacheError> {
        if let Some(store) = &self.store {
            let cached = store.lock().await.all_by_created_at();
            if !cached.is_empty() {
                debug!(count = cached.len(), "Serving restaurants from store");
                return Ok(cached);
            }
        }

        let restaurants = self.source.fetch_restaurants().await.map_err(|e| {
            warn!(error = %e, "Restaurant request failed");
            CacheError::RequestFailed(e)
        })?;
        info!(count = restaurants.len(), "Fetched restaurants from network");

        if let Some(store) = &self.store {
            if let Err(e) = store.lock().await.put_all(&restaurants) {
                warn!(error = %e, "Failed to store fetched restaurants");
            }
        }

        Ok(restaurants)
    }

    /// Returns the first restaurant whose id matches `key`
    pub async fn fetch_by_id(
        &self,
        key: impl Into<RestaurantKey>,
    ) -> Result<Restaurant, CacheError> {
        let key = key.into();
        let restaurants = self.fetch_all().await?;
        filter::by_id(restaurants, &key).ok_or_else(|| {
            debug!(id = %key, "Restaurant not found");
            CacheError::NotFound
        })
    }

    /// Returns restaurants serving `cuisine`
    pub async fn fetch_by_cuisine(&self, cuisine: &str) -> Result<Vec<Restaurant>, CacheError> {
        Ok(filter::by_cuisine(self.fetch_all().await?, cuisine))
    }

    /// Returns restaurants located in `neighborhood`
    pub async fn fetch_by_neighborhood(
        &self,
        neighborhood: &str,
    ) -> Result<Vec<Restaurant>, CacheError> {
        Ok(filter::by_neighborhood(self.fetch_all().await?, neighborhood))
    }

    /// Returns restaurants matching both filters; `"all"` disables either one
    pub async fn fetch_by_cuisine_and_neighborhood(
        &self,
        cuisine: &str,
        neighborhood: &str,
    ) -> Result<Vec<Restaurant>, CacheError> {
        Ok(filter::by_cuisine_and_neighborhood(
            self.fetch_all().await?,
            cuisine,
            neighborhood,
        ))
    }

    /// Returns every neighborhood once, in first-occurrence order
    pub async fn list_neighborhoods(&self) -> Result<Vec<String>, CacheError> {
        Ok(filter::neighborhoods(&self.fetch_all().await?))
    }

    /// Returns every cuisine type once, in first-occurrence order
    pub async fn list_cuisines(&self) -> Result<Vec<String>, CacheError> {
        Ok(filter::cuisines(&self.fetch_all().await?))
    }

    /// Shuts the service down and closes the store
    pub fn close(self) {
        if let Some(store) = self.store {
            store.into_inner().close();
        }
    }
}
