//! Waypoint graph backed by the `/nodes` and `/routes` endpoints.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::navigation::geo::{Coordinates, planar_distance};
use crate::services::types::{Node, RouteData};
use crate::services::{ApiClient, PlacesService};

pub struct HttpGraphService {
    api: ApiClient,
}

impl HttpGraphService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn nodes(&self) -> Result<Vec<Node>> {
        self.api.get("nodes").await
    }
}

#[async_trait]
impl PlacesService for HttpGraphService {
    async fn list_place_names(&self) -> Result<Vec<String>> {
        let names: Vec<String> = self.nodes().await?.into_iter().filter_map(|n| n.name).collect();
        debug!(count = names.len(), "loaded place names");
        Ok(names)
    }

    async fn find_place_by_name(&self, name: &str) -> Result<Option<Node>> {
        Ok(find_named(self.nodes().await?, name))
    }

    async fn find_nearest_node(&self, at: Coordinates) -> Result<Option<Node>> {
        Ok(nearest_named_node(self.nodes().await?, at))
    }

    async fn compute_route(&self, start_id: &str, end_id: &str) -> Result<RouteData> {
        self.api.get(&format!("routes/{start_id}/{end_id}")).await
    }
}

/// Node whose name equals `name`, ignoring surrounding whitespace on both
/// sides (the lexicon stores trimmed names).
pub fn find_named(nodes: impl IntoIterator<Item = Node>, name: &str) -> Option<Node> {
    let wanted = name.trim();
    nodes
        .into_iter()
        .find(|n| n.name.as_deref().map(str::trim) == Some(wanted))
}

/// Closest named node to `at` by planar distance on raw degrees.
///
/// Unnamed corridor nodes are skipped: a walk always starts at a place the
/// user could recognise.
pub fn nearest_named_node(nodes: impl IntoIterator<Item = Node>, at: Coordinates) -> Option<Node> {
    nodes
        .into_iter()
        .filter(|n| n.name.is_some())
        .map(|n| (planar_distance(n.position(), at), n))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, n)| n)
}
