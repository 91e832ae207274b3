//! Shared helpers for integration tests: in-memory collaborators and a
//! small campus graph.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use truenavi::config::{ActionConfig, PacingConfig};
use truenavi::conversation::Phase;
use truenavi::navigation::Coordinates;
use truenavi::navigation::geo::planar_distance;
use truenavi::permissions::{PermissionGate, PermissionKind};
use truenavi::services::{
    Edge, FixedLocation, Node, PlacesService, Preferences, PreferencesPatch, PreferencesService,
    RouteData, Weather, WeatherService,
};
use truenavi::speech::{Listener, Speaker};
use truenavi::{FlowServices, Locale, NaviConfig, NaviError, Result};

pub(crate) const START_PROMPT: &str = "where are we headed?\nlet me know and i'll find the best route";
pub(crate) const START_NAV_PROMPT: &str = "calculating your route and starting navigation now";
pub(crate) const FALLBACK_PROMPT: &str = "sorry, i didn't catch that,\ncould you try saying it again?";
pub(crate) const CONFIG_PROMPT: &str = "let's set up the app,\nwould you like to switch to spanish?";

pub(crate) fn node(id: &str, lat: f64, lng: f64, name: Option<&str>) -> Node {
    Node {
        id: id.to_owned(),
        coordinates: [lat, lng],
        name: name.map(str::to_owned),
    }
}

fn edge(id: &str, distance: f64, start: &Node, end: &Node) -> Edge {
    Edge {
        id: id.to_owned(),
        distance,
        start: start.clone(),
        end: end.clone(),
    }
}

/// Graph served from memory. Unknown node pairs have no route.
pub(crate) struct InMemoryGraph {
    nodes: Vec<Node>,
    routes: HashMap<(String, String), RouteData>,
}

impl InMemoryGraph {
    /// ```text
    /// cafeteria
    ///    |
    ///   gate --50-- hall --50-- fountain
    ///                              |
    ///                              80
    ///                              |
    ///                           library        observatory (disconnected)
    /// ```
    pub(crate) fn campus() -> Self {
        let gate = node("gate", 0.0, 0.0, Some("gate"));
        let hall = node("hall", 0.0, 0.001, None);
        let fountain = node("fountain", 0.0, 0.002, Some("fountain"));
        let library = node("library", -0.001, 0.002, Some("library"));
        let cafeteria = node("cafeteria", 0.001, 0.0, Some("cafeteria"));
        let observatory = node("observatory", 0.01, 0.01, Some("observatory"));

        let mut routes = HashMap::new();
        routes.insert(
            ("gate".to_owned(), "library".to_owned()),
            RouteData {
                path: vec![gate.clone(), hall.clone(), fountain.clone(), library.clone()],
                edges: vec![
                    edge("e1", 50.0, &gate, &hall),
                    edge("e2", 50.0, &hall, &fountain),
                    edge("e3", 80.0, &fountain, &library),
                ],
                total_distance: 180.0,
            },
        );
        routes.insert(
            ("gate".to_owned(), "cafeteria".to_owned()),
            RouteData {
                path: vec![gate.clone(), cafeteria.clone()],
                edges: vec![edge("e4", 111.0, &gate, &cafeteria)],
                total_distance: 111.0,
            },
        );

        Self {
            nodes: vec![gate, hall, fountain, library, cafeteria, observatory],
            routes,
        }
    }
}

#[async_trait]
impl PlacesService for InMemoryGraph {
    async fn list_place_names(&self) -> Result<Vec<String>> {
        Ok(self.nodes.iter().filter_map(|n| n.name.clone()).collect())
    }

    async fn find_place_by_name(&self, name: &str) -> Result<Option<Node>> {
        Ok(self.nodes.iter().find(|n| n.name.as_deref() == Some(name)).cloned())
    }

    async fn find_nearest_node(&self, at: Coordinates) -> Result<Option<Node>> {
        Ok(self
            .nodes
            .iter()
            .filter(|n| n.name.is_some())
            .min_by(|a, b| {
                planar_distance(a.position(), at).total_cmp(&planar_distance(b.position(), at))
            })
            .cloned())
    }

    async fn compute_route(&self, start_id: &str, end_id: &str) -> Result<RouteData> {
        Ok(self
            .routes
            .get(&(start_id.to_owned(), end_id.to_owned()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Preferences kept in memory; updates can be made to fail.
#[derive(Default)]
pub(crate) struct MemoryPreferences {
    stored: Mutex<Preferences>,
    updates: Mutex<Vec<PreferencesPatch>>,
    failing: AtomicBool,
}

impl MemoryPreferences {
    pub(crate) fn with(prefs: Preferences) -> Self {
        Self {
            stored: Mutex::new(prefs),
            ..Default::default()
        }
    }

    /// A returning English-speaking user without weather narration.
    pub(crate) fn returning() -> Self {
        Self::with(Preferences {
            spanish: false,
            weather: false,
            vibration: true,
            is_first_time: false,
        })
    }

    pub(crate) fn fail_updates(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn current(&self) -> Preferences {
        *self.stored.lock().unwrap()
    }

    pub(crate) fn updates(&self) -> Vec<PreferencesPatch> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl PreferencesService for MemoryPreferences {
    async fn get_preferences(&self) -> Result<Preferences> {
        Ok(self.current())
    }

    async fn update_preferences(&self, patch: PreferencesPatch) -> Result<Preferences> {
        self.updates.lock().unwrap().push(patch);
        if self.failing.load(Ordering::SeqCst) {
            return Err(NaviError::Service("preferences: backend unavailable".into()));
        }
        let mut stored = self.stored.lock().unwrap();
        patch.apply_to(&mut stored);
        Ok(*stored)
    }
}

pub(crate) struct FixedWeather(pub Weather);

#[async_trait]
impl WeatherService for FixedWeather {
    async fn get_weather(&self, _at: Coordinates) -> Result<Weather> {
        Ok(self.0)
    }
}

pub(crate) fn mild_weather() -> Arc<FixedWeather> {
    Arc::new(FixedWeather(Weather {
        temperature: 18.5,
        rain: 40.0,
    }))
}

/// Answers from a fixed script, then stays silent forever.
#[derive(Default)]
pub(crate) struct ScriptedListener {
    script: Mutex<VecDeque<String>>,
    phases: Mutex<Vec<Phase>>,
}

impl ScriptedListener {
    pub(crate) fn new<I: IntoIterator<Item = &'static str>>(answers: I) -> Self {
        Self {
            script: Mutex::new(answers.into_iter().map(str::to_owned).collect()),
            phases: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn phases(&self) -> Vec<Phase> {
        self.phases.lock().unwrap().clone()
    }
}

#[async_trait]
impl Listener for ScriptedListener {
    async fn listen(&self, phase: Phase) -> Result<String> {
        self.phases.lock().unwrap().push(phase);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(answer) => Ok(answer),
            None => std::future::pending().await,
        }
    }
}

/// Records every utterance; playback takes `delay`.
#[derive(Default)]
pub(crate) struct RecordingSpeaker {
    spoken: Mutex<Vec<(String, Locale)>>,
    stops: AtomicUsize,
    delay: Duration,
}

impl RecordingSpeaker {
    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub(crate) fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }

    pub(crate) fn locales(&self) -> Vec<Locale> {
        self.spoken.lock().unwrap().iter().map(|(_, l)| *l).collect()
    }

    pub(crate) fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub(crate) fn count(&self, text: &str) -> usize {
        self.spoken().iter().filter(|s| *s == text).count()
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str, locale: Locale) -> Result<()> {
        self.spoken.lock().unwrap().push((text.to_owned(), locale));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }

    async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Grants that can be flipped while the flow is running.
pub(crate) struct SwitchableGate(pub AtomicBool);

impl PermissionGate for SwitchableGate {
    fn is_granted(&self, _kind: PermissionKind) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Configuration with no pacing delays and near-instant retries.
pub(crate) fn fast_config() -> NaviConfig {
    let mut config = NaviConfig::default();
    config.pacing = PacingConfig::immediate();
    config.pacing.permission_poll_ms = 5;
    config.actions = ActionConfig {
        max_attempts: 2,
        retry_backoff_ms: 1,
    };
    config
}

pub(crate) struct Harness {
    pub speaker: Arc<RecordingSpeaker>,
    pub listener: Arc<ScriptedListener>,
    pub preferences: Arc<MemoryPreferences>,
}

impl Harness {
    pub(crate) fn new(
        preferences: MemoryPreferences,
        answers: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        Self {
            speaker: Arc::new(RecordingSpeaker::default()),
            listener: Arc::new(ScriptedListener::new(answers)),
            preferences: Arc::new(preferences),
        }
    }

    pub(crate) fn with_speaker(mut self, speaker: RecordingSpeaker) -> Self {
        self.speaker = Arc::new(speaker);
        self
    }

    /// Services with the walker standing next to the gate.
    pub(crate) fn services(&self, permissions: Arc<dyn PermissionGate>) -> FlowServices {
        FlowServices {
            places: Arc::new(InMemoryGraph::campus()),
            preferences: self.preferences.clone(),
            weather: mild_weather(),
            locator: Arc::new(FixedLocation(Coordinates::new(0.00001, 0.0))),
            permissions,
            speaker: self.speaker.clone(),
            listener: self.listener.clone(),
        }
    }

    /// Wait until the speaker has produced an utterance satisfying `pred`.
    pub(crate) async fn wait_for(&self, pred: impl Fn(&[String]) -> bool) {
        let wait = async {
            loop {
                if pred(self.speaker.spoken().as_slice()) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        if tokio::time::timeout(Duration::from_secs(5), wait).await.is_err() {
            panic!("timed out; spoken so far: {:#?}", self.speaker.spoken());
        }
    }
}
