//! In-memory filters over a restaurant collection
//!
//! All filters keep the collection order. Cuisine and neighborhood matching
//! is exact and case-sensitive; the `ALL` sentinel disables a filter in
//! [`by_cuisine_and_neighborhood`].

use std::collections::HashSet;

use super::{Restaurant, RestaurantKey};

/// Sentinel meaning "do not filter on this field"
pub const ALL: &str = "all";

/// Returns the first restaurant matching `key`
pub fn by_id(restaurants: Vec<Restaurant>, key: &RestaurantKey) -> Option<Restaurant> {
    restaurants.into_iter().find(|r| key.matches(r.id))
}

/// Keeps restaurants with the given cuisine type
pub fn by_cuisine(restaurants: Vec<Restaurant>, cuisine: &str) -> Vec<Restaurant> {
    restaurants
        .into_iter()
        .filter(|r| r.cuisine_type == cuisine)
        .collect()
}

/// Keeps restaurants in the given neighborhood
pub fn by_neighborhood(restaurants: Vec<Restaurant>, neighborhood: &str) -> Vec<Restaurant> {
    restaurants
        .into_iter()
        .filter(|r| r.neighborhood == neighborhood)
        .collect()
}

/// Applies both filters, skipping either one whose argument is [`ALL`]
pub fn by_cuisine_and_neighborhood(
    restaurants: Vec<Restaurant>,
    cuisine: &str,
    neighborhood: &str,
) -> Vec<Restaurant> {
    let mut results = restaurants;
    if cuisine != ALL {
        results = by_cuisine(results, cuisine);
    }
    if neighborhood != ALL {
        results = by_neighborhood(results, neighborhood);
    }
    results
}

/// Distinct neighborhoods in first-occurrence order
pub fn neighborhoods(restaurants: &[Restaurant]) -> Vec<String> {
    unique(restaurants.iter().map(|r| r.neighborhood.as_str()))
}

/// Distinct cuisine types in first-occurrence order
pub fn cuisines(restaurants: &[Restaurant]) -> Vec<String> {
    unique(restaurants.iter().map(|r| r.cuisine_type.as_str()))
}

fn unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
