//! Local persistent store for restaurant data
//!
//! This module provides the `RestaurantStore`, a versioned on-disk collection
//! of restaurants keyed by id. It is an optimization: when no store directory
//! is available the service runs network-only.

mod store;

pub use store::{RestaurantStore, StoreError, STORE_NAME, STORE_VERSION};
