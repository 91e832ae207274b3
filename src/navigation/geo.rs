//! Bearing and distance helpers on raw latitude/longitude pairs.

use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build from the backend's `[lat, lng]` pair.
    pub fn from_pair(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

/// Initial bearing (forward azimuth) from `from` to `to`, in `[0, 360)`.
pub fn bearing(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Signed change of heading from `incoming` to `outgoing`, wrapped to
/// `[-180, 180]`. Positive values turn clockwise (to the right).
pub fn heading_change(incoming: f64, outgoing: f64) -> f64 {
    let delta = (outgoing - incoming).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Planar distance on raw degrees. Only meaningful for small areas such as a
/// campus; used to pick the closest graph node, never to report distances.
pub fn planar_distance(a: Coordinates, b: Coordinates) -> f64 {
    (a.latitude - b.latitude).hypot(a.longitude - b.longitude)
}
