//! `RouteCompiler` over the in-memory campus graph.

use std::sync::Arc;

use async_trait::async_trait;
use truenavi::navigation::{Coordinates, Direction};
use truenavi::services::{Weather, WeatherService};
use truenavi::{Locale, NaviError, Result, RouteCompiler, RouteOutcome};

use crate::helpers::{InMemoryGraph, mild_weather};

struct WeatherOutage;

#[async_trait]
impl WeatherService for WeatherOutage {
    async fn get_weather(&self, _at: Coordinates) -> Result<Weather> {
        Err(NaviError::Service("weather: upstream timeout".into()))
    }
}

fn near_gate() -> Coordinates {
    Coordinates::new(0.00001, 0.0)
}

fn compiler() -> RouteCompiler {
    RouteCompiler::new(Arc::new(InMemoryGraph::campus()), mild_weather())
}

#[tokio::test]
async fn compiles_turn_by_turn_route() {
    let outcome = compiler().compile(near_gate(), "library", false).await;
    let RouteOutcome::Ready(route) = outcome else {
        panic!("expected a route, got {outcome:?}");
    };

    let directions: Vec<Direction> = route.steps.iter().map(|s| s.direction).collect();
    assert_eq!(
        directions,
        [
            Direction::Origin,
            Direction::Start,
            Direction::Straight,
            Direction::Right,
            Direction::Straight,
            Direction::End,
        ]
    );
    assert_eq!(route.path.len(), 4);
    assert_eq!(route.edges.len(), 3);
    assert!((route.distance() - 180.0).abs() < f64::EPSILON);

    // The turn is anchored at the fountain, the first straight spans gate to fountain.
    assert_eq!(route.steps[3].start.as_ref().unwrap().id, "fountain");
    assert_eq!(route.steps[2].start.as_ref().unwrap().id, "gate");
    assert_eq!(route.steps[2].end.as_ref().unwrap().id, "fountain");
}

#[tokio::test]
async fn weather_is_narrated_when_requested() {
    let route = compiler().compile(near_gate(), "library", true).await.into_route();
    let narration: Vec<String> = route.steps.iter().map(|s| s.narration(Locale::EnGb)).collect();
    assert_eq!(narration[2], "current temperature 18.5 celsius");
    assert_eq!(narration[3], "rain chance of 40 percent");
}

#[tokio::test]
async fn weather_outage_is_skipped() {
    let compiler = RouteCompiler::new(Arc::new(InMemoryGraph::campus()), Arc::new(WeatherOutage));
    let route = compiler.compile(near_gate(), "cafeteria", true).await.into_route();
    let directions: Vec<Direction> = route.steps.iter().map(|s| s.direction).collect();
    assert_eq!(
        directions,
        [Direction::Origin, Direction::Start, Direction::Straight, Direction::End]
    );
}

#[tokio::test]
async fn spanish_narration() {
    let route = compiler().compile(near_gate(), "library", false).await.into_route();
    let narration: Vec<String> = route.steps.iter().map(|s| s.narration(Locale::EsCo)).collect();
    assert_eq!(
        narration,
        [
            "empezando desde gate",
            "en camino a library",
            "continúa recto 100 metros",
            "haz un giro a la derecha",
            "continúa recto 80 metros",
            "has llegado a library",
        ]
    );
}

#[tokio::test]
async fn failures_are_outcomes() {
    let compiler = compiler();
    assert_eq!(
        compiler.compile(near_gate(), "gate", false).await,
        RouteOutcome::SameDestination
    );
    assert_eq!(
        compiler.compile(near_gate(), "observatory", false).await,
        RouteOutcome::Unreachable
    );
    assert_eq!(
        compiler.compile(near_gate(), "atlantis", false).await,
        RouteOutcome::Unreachable
    );
    assert!(
        compiler
            .compile(near_gate(), "observatory", true)
            .await
            .into_route()
            .is_empty()
    );
}
