//! Turn a shortest path into narratable instructions.
//!
//! The compiled list always opens with `origin` and `start`, optionally
//! followed by `temperature` and `rain`, and always closes with `end`.
//! Between them every turn sharper than [`STRAIGHT_LIMIT`] degrees becomes
//! a turn instruction anchored at its node, and each stretch without a turn
//! collapses into a single `straight` carrying the summed edge lengths.
//!
//! [`STRAIGHT_LIMIT`]: crate::navigation::direction::STRAIGHT_LIMIT

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::navigation::direction::{Direction, classify_turn};
use crate::navigation::geo::{Coordinates, bearing, heading_change};
use crate::services::{Edge, Node, PlacesService, RouteData, Weather, WeatherService};
use crate::text::{Locale, translate};

/// One narratable directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStep {
    pub direction: Direction,
    /// Text appended to the direction phrase: a place name or a measurement.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Node>,
}

impl NavigationStep {
    pub fn new(direction: Direction, value: impl Into<String>) -> Self {
        Self {
            direction,
            value: value.into(),
            start: None,
            end: None,
        }
    }

    fn starting_at(mut self, node: &Node) -> Self {
        self.start = Some(node.clone());
        self
    }

    fn ending_at(mut self, node: &Node) -> Self {
        self.end = Some(node.clone());
        self
    }

    /// Spoken form, e.g. "go straight 20 meters".
    pub fn narration(&self, locale: Locale) -> String {
        let phrase = translate(self.direction.output(), locale);
        if self.value.is_empty() {
            return phrase;
        }
        format!("{phrase} {}", translate(&self.value, locale))
    }
}

/// Instructions plus the geometry they were compiled from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledRoute {
    pub steps: Vec<NavigationStep>,
    pub path: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl CompiledRoute {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Total walking distance in meters.
    pub fn distance(&self) -> f64 {
        self.edges.iter().map(|e| e.distance).sum()
    }
}

/// Result of a compilation attempt. Failures are values, never errors.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Ready(CompiledRoute),
    /// The walker already stands at the destination.
    SameDestination,
    /// Unknown destination, no start node or no path between them.
    Unreachable,
}

impl RouteOutcome {
    /// The compiled route, or an empty one when there is nothing to walk.
    pub fn into_route(self) -> CompiledRoute {
        match self {
            RouteOutcome::Ready(route) => route,
            RouteOutcome::SameDestination | RouteOutcome::Unreachable => CompiledRoute::default(),
        }
    }
}

/// Resolves endpoints, fetches the path and compiles instructions.
#[derive(Clone)]
pub struct RouteCompiler {
    places: Arc<dyn PlacesService>,
    weather: Arc<dyn WeatherService>,
}

impl RouteCompiler {
    pub fn new(places: Arc<dyn PlacesService>, weather: Arc<dyn WeatherService>) -> Self {
        Self { places, weather }
    }

    pub async fn compile(
        &self,
        origin: Coordinates,
        destination: &str,
        include_weather: bool,
    ) -> RouteOutcome {
        let start = match self.places.find_nearest_node(origin).await {
            Ok(Some(node)) => node,
            Ok(None) => {
                warn!(?origin, "no start node near the walker");
                return RouteOutcome::Unreachable;
            }
            Err(e) => {
                warn!(error = %e, "start node lookup failed");
                return RouteOutcome::Unreachable;
            }
        };
        let end = match self.places.find_place_by_name(destination).await {
            Ok(Some(node)) => node,
            Ok(None) => {
                warn!(destination, "unknown destination");
                return RouteOutcome::Unreachable;
            }
            Err(e) => {
                warn!(destination, error = %e, "destination lookup failed");
                return RouteOutcome::Unreachable;
            }
        };
        if start.id == end.id {
            info!(node = %start.id, "walker is already at the destination");
            return RouteOutcome::SameDestination;
        }

        let weather = if include_weather {
            match self.weather.get_weather(origin).await {
                Ok(w) => Some(w),
                Err(e) => {
                    warn!(error = %e, "weather unavailable, narrating without it");
                    None
                }
            }
        } else {
            None
        };

        let route = match self.places.compute_route(&start.id, &end.id).await {
            Ok(route) => route,
            Err(e) => {
                warn!(start = %start.id, end = %end.id, error = %e, "route request failed");
                return RouteOutcome::Unreachable;
            }
        };

        match compile_instructions(&start, &end, weather, &route) {
            Some(steps) => {
                let compiled = CompiledRoute {
                    steps,
                    path: route.path,
                    edges: route.edges,
                };
                info!(
                    from = start.label(),
                    to = end.label(),
                    instructions = compiled.steps.len(),
                    meters = compiled.distance(),
                    "route compiled"
                );
                RouteOutcome::Ready(compiled)
            }
            None => {
                warn!(start = %start.id, end = %end.id, "no path between nodes");
                RouteOutcome::Unreachable
            }
        }
    }
}

/// Compile the instruction list for `route`. `None` when the route is empty.
pub fn compile_instructions(
    start: &Node,
    end: &Node,
    weather: Option<Weather>,
    route: &RouteData,
) -> Option<Vec<NavigationStep>> {
    let path = &route.path;
    let first_edge = route.edges.first()?;
    if path.len() < 2 {
        return None;
    }

    let mut steps = vec![
        NavigationStep::new(Direction::Origin, start.label()).starting_at(start),
        NavigationStep::new(Direction::Start, end.label()).ending_at(end),
    ];
    if let Some(w) = weather {
        steps.push(NavigationStep::new(Direction::Temperature, format!("{} celsius", w.temperature)));
        steps.push(NavigationStep::new(Direction::Rain, format!("{} percent", w.rain)));
    }

    let mut run = StraightRun::begin(first_edge);

    for i in 1..path.len() - 1 {
        let incoming = bearing(path[i - 1].position(), path[i].position());
        let outgoing = bearing(path[i].position(), path[i + 1].position());
        let delta = heading_change(incoming, outgoing);
        let direction = classify_turn(delta);

        let Some(edge) = route.edges.get(i) else {
            warn!(node = %path[i].id, "path longer than edge list, truncating");
            break;
        };

        if direction == Direction::Straight {
            run.extend(edge);
        } else {
            debug!(node = path[i].label(), %direction, delta, "turn");
            steps.push(run.finish());
            steps.push(NavigationStep::new(direction, "").starting_at(&path[i]));
            run = StraightRun::begin(edge);
        }
    }

    steps.push(run.finish());
    steps.push(NavigationStep::new(Direction::End, end.label()).ending_at(end));
    Some(steps)
}

/// Maximal unturned stretch being accumulated.
struct StraightRun {
    meters: f64,
    start: Node,
    end: Node,
}

impl StraightRun {
    fn begin(edge: &Edge) -> Self {
        Self {
            meters: edge.distance,
            start: edge.start.clone(),
            end: edge.end.clone(),
        }
    }

    fn extend(&mut self, edge: &Edge) {
        self.meters += edge.distance;
        self.end = edge.end.clone();
    }

    /// The narrated value is the sum of the merged edge lengths, rounded to
    /// whole meters once at the end.
    fn finish(self) -> NavigationStep {
        NavigationStep {
            direction: Direction::Straight,
            value: format!("{} meters", self.meters.round()),
            start: Some(self.start),
            end: Some(self.end),
        }
    }
}
