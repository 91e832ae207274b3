//! Wire types shared by the backend services.

use serde::{Deserialize, Serialize};

use crate::navigation::geo::Coordinates;

/// Backend response envelope: `{ success, count?, error?, data? }`.
///
/// Missing optional fields deserialize as `None`; no `T: Default` bound.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub count: Option<u64>,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, mapping `success = false` or missing data to a service error.
    pub fn into_data(self, endpoint: &str) -> crate::error::Result<T> {
        if !self.success {
            let reason = self.error.unwrap_or_else(|| "request failed".to_owned());
            return Err(crate::error::NaviError::Service(format!("{endpoint}: {reason}")));
        }
        self.data.ok_or_else(|| {
            crate::error::NaviError::Service(format!("{endpoint}: response carried no data"))
        })
    }
}

/// A waypoint in the walking graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "_id")]
    pub id: String,
    /// `[lat, lng]` in degrees.
    pub coordinates: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Node {
    pub fn position(&self) -> Coordinates {
        Coordinates::from_pair(self.coordinates)
    }

    /// Display name, falling back to the id for unnamed corridor nodes.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A walkable connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "_id")]
    pub id: String,
    /// Length in meters.
    pub distance: f64,
    #[serde(rename = "startNodeId")]
    pub start: Node,
    #[serde(rename = "endNodeId")]
    pub end: Node,
}

/// Shortest path between two nodes, ordered start to end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteData {
    #[serde(default)]
    pub path: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub total_distance: f64,
}

/// User preferences stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub spanish: bool,
    pub weather: bool,
    pub vibration: bool,
    pub is_first_time: bool,
}

impl Default for Preferences {
    /// Values used before the backend answered and after a reset.
    fn default() -> Self {
        Self {
            spanish: true,
            weather: true,
            vibration: true,
            is_first_time: true,
        }
    }
}

/// Partial preference update; only the set fields are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spanish: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibration: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_first_time: Option<bool>,
}

impl PreferencesPatch {
    /// Apply the set fields onto `prefs`.
    pub fn apply_to(&self, prefs: &mut Preferences) {
        if let Some(v) = self.spanish {
            prefs.spanish = v;
        }
        if let Some(v) = self.weather {
            prefs.weather = v;
        }
        if let Some(v) = self.vibration {
            prefs.vibration = v;
        }
        if let Some(v) = self.is_first_time {
            prefs.is_first_time = v;
        }
    }
}

/// Current conditions at a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Apparent temperature in °C.
    pub temperature: f64,
    /// Precipitation chance in percent.
    pub rain: f64,
}
