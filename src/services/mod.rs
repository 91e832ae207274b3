//! Collaborators the conversation and navigation core depends on.
//!
//! Each concern sits behind an `async_trait` so the flow runtime can hold
//! them as `Arc<dyn …>` and tests can swap in in-memory fakes. The HTTP
//! implementations talk to the graph/preferences backend and Open-Meteo.

pub mod api;
pub mod graph;
pub mod location;
pub mod preferences;
pub mod types;
pub mod weather;

use async_trait::async_trait;

use crate::error::Result;
use crate::navigation::geo::Coordinates;

pub use api::ApiClient;
pub use graph::HttpGraphService;
pub use location::FixedLocation;
pub use preferences::HttpPreferencesService;
pub use types::{Edge, Node, Preferences, PreferencesPatch, RouteData, Weather};
pub use weather::OpenMeteoWeather;

/// Named waypoints and shortest-path routing.
#[async_trait]
pub trait PlacesService: Send + Sync {
    /// Names of every named waypoint.
    async fn list_place_names(&self) -> Result<Vec<String>>;

    /// The waypoint whose name matches exactly.
    async fn find_place_by_name(&self, name: &str) -> Result<Option<Node>>;

    /// The named waypoint closest to `at`.
    async fn find_nearest_node(&self, at: Coordinates) -> Result<Option<Node>>;

    /// Shortest path between two node ids. An empty path means "no route".
    async fn compute_route(&self, start_id: &str, end_id: &str) -> Result<RouteData>;
}

/// Per-device preference storage.
#[async_trait]
pub trait PreferencesService: Send + Sync {
    async fn get_preferences(&self) -> Result<Preferences>;

    /// Apply a partial update and return the stored result.
    async fn update_preferences(&self, patch: PreferencesPatch) -> Result<Preferences>;
}

/// Current conditions lookup.
#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn get_weather(&self, at: Coordinates) -> Result<Weather>;
}

/// Source of the walker's current position.
#[async_trait]
pub trait Locator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates>;
}
