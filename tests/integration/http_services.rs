//! HTTP collaborators against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use truenavi::config::{ApiConfig, WeatherConfig};
use truenavi::navigation::{Coordinates, Direction};
use truenavi::services::{
    ApiClient, HttpGraphService, HttpPreferencesService, OpenMeteoWeather, PlacesService,
    Preferences, PreferencesPatch, PreferencesService, WeatherService,
};
use truenavi::{NaviError, RouteCompiler, RouteOutcome};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> ApiClient {
    let config = ApiConfig {
        base_url: server.uri(),
        device_id: Some("device-123".to_owned()),
        timeout_secs: 2,
    };
    ApiClient::new(&config).unwrap()
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn nodes() -> Value {
    json!([
        { "_id": "n1", "coordinates": [0.0, 0.0], "name": "gate" },
        { "_id": "n2", "coordinates": [0.0, 0.001] },
        { "_id": "n3", "coordinates": [0.0, 0.002], "name": "library" }
    ])
}

fn route() -> Value {
    let gate = json!({ "_id": "n1", "coordinates": [0.0, 0.0], "name": "gate" });
    let hall = json!({ "_id": "n2", "coordinates": [0.0, 0.001] });
    let library = json!({ "_id": "n3", "coordinates": [0.0, 0.002], "name": "library" });
    json!({
        "path": [gate, hall, library],
        "edges": [
            { "_id": "e1", "distance": 55.4, "startNodeId": gate, "endNodeId": hall },
            { "_id": "e2", "distance": 55.4, "startNodeId": hall, "endNodeId": library }
        ],
        "totalDistance": 110.8
    })
}

async fn mount_graph(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/nodes"))
        .and(header("device-id", "device-123"))
        .respond_with(ok(nodes()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/routes/n1/n3"))
        .respond_with(ok(route()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn graph_lists_named_places() {
    let server = MockServer::start().await;
    mount_graph(&server).await;
    let graph = HttpGraphService::new(api(&server));

    assert_eq!(graph.list_place_names().await.unwrap(), ["gate", "library"]);
    let library = graph.find_place_by_name("library").await.unwrap().unwrap();
    assert_eq!(library.id, "n3");
    assert!(graph.find_place_by_name("hall").await.unwrap().is_none());

    let nearest = graph
        .find_nearest_node(Coordinates::new(0.0, 0.0009))
        .await
        .unwrap()
        .unwrap();
    // The unnamed hall is closer but never a starting point.
    assert_eq!(nearest.id, "n1");
}

#[tokio::test]
async fn graph_computes_route() {
    let server = MockServer::start().await;
    mount_graph(&server).await;
    let graph = HttpGraphService::new(api(&server));

    let route = graph.compute_route("n1", "n3").await.unwrap();
    assert_eq!(route.path.len(), 3);
    assert_eq!(route.edges[1].end.id, "n3");
    assert!((route.total_distance - 110.8).abs() < 1e-9);
}

#[tokio::test]
async fn unsuccessful_envelope_is_a_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nodes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "graph not loaded" })),
        )
        .mount(&server)
        .await;
    let graph = HttpGraphService::new(api(&server));

    match graph.list_place_names().await {
        Err(NaviError::Service(message)) => assert!(message.contains("graph not loaded")),
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn preferences_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/preferences"))
        .and(header("device-id", "device-123"))
        .respond_with(ok(json!({
            "spanish": false,
            "weather": true,
            "vibration": true,
            "isFirstTime": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/preferences"))
        .and(body_json(json!({ "vibration": false, "isFirstTime": false })))
        .respond_with(ok(json!({
            "spanish": false,
            "weather": true,
            "vibration": false,
            "isFirstTime": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    let prefs = HttpPreferencesService::new(api(&server));

    let loaded = prefs.get_preferences().await.unwrap();
    assert!(!loaded.spanish);
    assert!(loaded.is_first_time);

    let updated = prefs
        .update_preferences(PreferencesPatch {
            vibration: Some(false),
            is_first_time: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(!updated.vibration);
    assert!(!updated.is_first_time);
}

#[tokio::test]
async fn reset_sends_first_run_defaults() {
    let server = MockServer::start().await;
    let defaults = json!({
        "spanish": true,
        "weather": true,
        "vibration": true,
        "isFirstTime": true
    });
    Mock::given(method("PUT"))
        .and(path("/preferences"))
        .and(body_json(defaults.clone()))
        .respond_with(ok(defaults))
        .expect(1)
        .mount(&server)
        .await;

    let reset = HttpPreferencesService::new(api(&server)).reset().await.unwrap();
    assert_eq!(reset, Preferences::default());
}

#[tokio::test]
async fn weather_is_fetched_once_then_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current", "apparent_temperature,precipitation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": { "apparent_temperature": 18.456, "precipitation": 0.4 }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let weather = OpenMeteoWeather::new(&WeatherConfig {
        base_url: format!("{}/v1/forecast", server.uri()),
        ..Default::default()
    })
    .unwrap();

    let at = Coordinates::new(4.6383, -74.0841);
    let first = weather.get_weather(at).await.unwrap();
    assert!((first.temperature - 18.46).abs() < 1e-9);
    assert!((first.rain - 40.0).abs() < 1e-9);

    let second = weather.get_weather(at).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn weather_http_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let weather = OpenMeteoWeather::new(&WeatherConfig {
        base_url: server.uri(),
        cache_ttl_secs: 0,
        ..Default::default()
    })
    .unwrap();

    assert!(matches!(
        weather.get_weather(Coordinates::new(0.0, 0.0)).await,
        Err(NaviError::Http(_))
    ));
}

#[tokio::test]
async fn stalled_weather_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "current": { "apparent_temperature": 20.0, "precipitation": 0.1 }
                }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let weather = OpenMeteoWeather::new(&WeatherConfig {
        base_url: server.uri(),
        timeout_secs: 1,
        ..Default::default()
    })
    .unwrap();

    let result = tokio::time::timeout(
        Duration::from_secs(4),
        weather.get_weather(Coordinates::new(0.0, 0.0)),
    )
    .await
    .expect("weather request must give up on its own");
    match result {
        Err(NaviError::Http(e)) => assert!(e.is_timeout(), "unexpected error: {e}"),
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn padded_backend_names_still_resolve() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nodes"))
        .respond_with(ok(json!([
            { "_id": "n1", "coordinates": [0.0, 0.0], "name": "gate" },
            { "_id": "n7", "coordinates": [0.0, 0.002], "name": "  observatory " }
        ])))
        .mount(&server)
        .await;
    let graph = HttpGraphService::new(api(&server));

    let names = graph.list_place_names().await.unwrap();
    let lexicon = truenavi::conversation::Lexicon::with_places(names);
    let resolved = truenavi::conversation::InputResolver::default().resolve(
        "the observatory",
        truenavi::conversation::Phase::Start,
        &lexicon,
    );
    let truenavi::conversation::Input::Place(name) = resolved else {
        panic!("expected a place, got {resolved:?}");
    };

    let node = graph.find_place_by_name(&name).await.unwrap().unwrap();
    assert_eq!(node.id, "n7");
}

#[tokio::test]
async fn route_compiler_over_http() {
    let server = MockServer::start().await;
    mount_graph(&server).await;
    let compiler = RouteCompiler::new(
        Arc::new(HttpGraphService::new(api(&server))),
        Arc::new(OpenMeteoWeather::new(&WeatherConfig::default()).unwrap()),
    );

    let outcome = compiler.compile(Coordinates::new(0.0, 0.0), "library", false).await;
    let RouteOutcome::Ready(route) = outcome else {
        panic!("expected a route, got {outcome:?}");
    };
    let directions: Vec<Direction> = route.steps.iter().map(|s| s.direction).collect();
    assert_eq!(
        directions,
        [Direction::Origin, Direction::Start, Direction::Straight, Direction::End]
    );
    assert_eq!(route.steps[2].value, "111 meters");
}
