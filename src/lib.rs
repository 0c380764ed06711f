//! restocache library
//!
//! Restaurant listings fetched from a remote JSON endpoint, cached in a local
//! versioned store, and served as filtered views to a consumer.

pub mod cache;
pub mod cli;
pub mod data;
pub mod presentation;
pub mod service;

pub use cache::{RestaurantStore, StoreError};
pub use data::{Restaurant, RestaurantKey};
pub use service::{CacheError, RestaurantCache};
