//! Presentation helpers for restaurant pages and maps
//!
//! Pure functions turning a restaurant into the relative paths a page links
//! to, plus a small adapter that places a restaurant on an external map.

use serde::Serialize;

use crate::data::{LatLng, Restaurant};

/// Image used when a restaurant has no photograph
const DEFAULT_PHOTOGRAPH: &str = "10";

/// Relative URL of the restaurant detail page
pub fn url_for(restaurant: &Restaurant) -> String {
    format!("./restaurant.html?id={}", restaurant.id)
}

/// Relative path of the restaurant image
pub fn image_url_for(restaurant: &Restaurant) -> String {
    let photograph = restaurant
        .photograph
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PHOTOGRAPH);
    format!("/img/{}.jpg", photograph)
}

/// How a marker appears when placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerAnimation {
    /// Marker drops in from the top of the map
    Drop,
}

/// Everything a map needs to place a restaurant marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerOptions {
    /// Marker position
    pub position: LatLng,
    /// Hover title
    pub title: String,
    /// Page opened when the marker is clicked
    pub url: String,
    /// Placement animation
    pub animation: MarkerAnimation,
}

/// An external map widget that can display markers
pub trait MapWidget {
    /// Handle of a placed marker
    type Marker;

    /// Places a marker on this map and returns its handle
    fn place_marker(&self, options: MarkerOptions) -> Self::Marker;
}

/// Places `restaurant` on `map`, linking the marker to its detail page
pub fn map_marker_for<M: MapWidget>(restaurant: &Restaurant, map: &M) -> M::Marker {
    map.place_marker(MarkerOptions {
        position: restaurant.latlng,
        title: restaurant.name.clone(),
        url: url_for(restaurant),
        animation: MarkerAnimation::Drop,
    })
}
