//! Effect interpreter for the flow reducer.
//!
//! The runtime owns the [`FlowState`], feeds events through [`reduce`] on a
//! single task and executes the returned commands in spawned tasks. Results
//! come back as events over an mpsc channel, so transitions never overlap.
//!
//! Each navigation session runs under its own [`CancellationToken`]. Closing
//! navigation cancels it, which stops pending instruction speech and any
//! delayed "next instruction" continuation before it reaches the reducer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::NaviConfig;
use crate::conversation::{ConversationDriver, ConversationStep, InputResolver, Lexicon, Phase};
use crate::error::{NaviError, Result};
use crate::flow::reducer::{FlowCommand, FlowContext, FlowEvent, SpeechPurpose, reduce};
use crate::flow::state::FlowState;
use crate::navigation::{RouteCompiler, RouteOutcome};
use crate::permissions::{PermissionGate, missing_summary};
use crate::services::{Locator, PlacesService, PreferencesService, WeatherService};
use crate::speech::{Listener, Speaker};
use crate::text::Locale;

/// Collaborators the runtime drives.
#[derive(Clone)]
pub struct FlowServices {
    pub places: Arc<dyn PlacesService>,
    pub preferences: Arc<dyn PreferencesService>,
    pub weather: Arc<dyn WeatherService>,
    pub locator: Arc<dyn Locator>,
    pub permissions: Arc<dyn PermissionGate>,
    pub speaker: Arc<dyn Speaker>,
    pub listener: Arc<dyn Listener>,
}

/// External control of a running [`FlowRuntime`].
#[derive(Clone)]
pub struct FlowHandle {
    events: mpsc::UnboundedSender<FlowEvent>,
    shutdown: CancellationToken,
}

impl FlowHandle {
    /// End the current navigation session and return to the destination prompt.
    ///
    /// # Errors
    ///
    /// Returns [`NaviError::Flow`] if the runtime has already stopped.
    pub fn close_navigation(&self) -> Result<()> {
        self.events
            .send(FlowEvent::CloseNavigation)
            .map_err(|_| NaviError::Flow("flow runtime has stopped".to_owned()))
    }

    /// Request the runtime loop to stop.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

pub struct FlowRuntime {
    state: FlowState,
    context: FlowContext,
    services: FlowServices,
    resolver: InputResolver,
    driver: ConversationDriver,
    compiler: RouteCompiler,
    events_tx: mpsc::UnboundedSender<FlowEvent>,
    events_rx: mpsc::UnboundedReceiver<FlowEvent>,
    session: CancellationToken,
    shutdown: CancellationToken,
}

impl FlowRuntime {
    pub fn new(config: &NaviConfig, services: FlowServices) -> (Self, FlowHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let handle = FlowHandle {
            events: events_tx.clone(),
            shutdown: shutdown.clone(),
        };
        let compiler = RouteCompiler::new(services.places.clone(), services.weather.clone());
        let runtime = Self {
            state: FlowState::default(),
            context: FlowContext::new(config.pacing.clone()),
            services,
            resolver: InputResolver::from_config(&config.resolver),
            driver: ConversationDriver::new(&config.actions),
            compiler,
            events_tx,
            events_rx,
            session: CancellationToken::new(),
            shutdown,
        };
        (runtime, handle)
    }

    /// Run until shutdown is requested, returning the final state.
    pub async fn run(mut self) -> FlowState {
        info!("flow runtime started");
        self.dispatch(FlowEvent::Started);

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!("flow runtime shutting down");
                    break;
                }
                event = self.events_rx.recv() => {
                    match event {
                        Some(event) => self.dispatch(event),
                        None => break,
                    }
                }
            }
        }

        self.session.cancel();
        self.services.speaker.stop().await;
        self.state
    }

    fn dispatch(&mut self, event: FlowEvent) {
        let before = (self.state.app_phase, self.state.status);
        let commands = reduce(&mut self.state, event, &self.context);
        let after = (self.state.app_phase, self.state.status);
        if before != after {
            debug!(phase = %self.state.app_phase, status = ?self.state.status, step = %self.state.current_step.id, "state changed");
        }
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: FlowCommand) {
        match command {
            FlowCommand::Speak {
                text,
                locale,
                purpose,
            } => self.speak(text, locale, purpose),
            FlowCommand::StopSpeech => {
                let speaker = self.services.speaker.clone();
                tokio::spawn(async move { speaker.stop().await });
            }
            FlowCommand::Listen(phase) => self.listen(phase),
            FlowCommand::ProcessInput { transcript, step } => self.process_input(transcript, step),
            FlowCommand::CompileRoute {
                destination,
                include_weather,
            } => self.compile_route(destination, include_weather),
            FlowCommand::LoadPreferences => {
                let preferences = self.services.preferences.clone();
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let loaded = match preferences.get_preferences().await {
                        Ok(p) => Some(p),
                        Err(e) => {
                            warn!(error = %e, "could not load preferences, using defaults");
                            None
                        }
                    };
                    let _ = tx.send(FlowEvent::PreferencesLoaded(loaded));
                });
            }
            FlowCommand::CheckPermissions => {
                let gate = self.services.permissions.as_ref();
                let granted = gate.all_granted();
                if !granted {
                    debug!(missing = %missing_summary(gate), "permissions missing");
                }
                let _ = self.events_tx.send(FlowEvent::PermissionsChecked(granted));
            }
            FlowCommand::Schedule { delay, event } => self.schedule(delay, event),
            FlowCommand::CancelNavigation => {
                self.session.cancel();
                self.session = CancellationToken::new();
            }
        }
    }

    fn speak(&self, text: String, locale: Locale, purpose: SpeechPurpose) {
        let speaker = self.services.speaker.clone();
        let tx = self.events_tx.clone();
        let session = matches!(purpose, SpeechPurpose::Instruction { .. }).then(|| self.session.clone());

        tokio::spawn(async move {
            let playback = async {
                if let Err(e) = speaker.speak(&text, locale).await {
                    warn!(error = %e, "speech playback failed");
                }
            };
            match session {
                Some(token) => tokio::select! {
                    () = token.cancelled() => {
                        debug!(?purpose, "instruction speech cancelled");
                        return;
                    }
                    () = playback => {}
                },
                None => playback.await,
            }
            let _ = tx.send(FlowEvent::SpeechDone(purpose));
        });
    }

    fn listen(&self, phase: Phase) {
        let listener = self.services.listener.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let transcript = listener.listen(phase).await.unwrap_or_else(|e| {
                warn!(error = %e, "capture failed, treating as silence");
                String::new()
            });
            let _ = tx.send(FlowEvent::Heard(transcript));
        });
    }

    fn process_input(&self, transcript: String, step: ConversationStep) {
        let places = self.services.places.clone();
        let preferences = self.services.preferences.clone();
        let resolver = self.resolver;
        let driver = self.driver.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            // Destinations change server-side, so the snapshot is rebuilt
            // for every start-phase turn.
            let lexicon = match step.phase {
                Phase::Start => Lexicon::refreshed(places.as_ref()).await.unwrap_or_else(|e| {
                    warn!(error = %e, "could not refresh places");
                    Lexicon::new()
                }),
                Phase::Config => Lexicon::new(),
            };
            let input = resolver.resolve(&transcript, step.phase, &lexicon);
            info!(step = %step.id, %transcript, %input, "turn");

            let event = match driver.advance(&step, &input, preferences.as_ref()).await {
                Ok(next) => {
                    let reloaded = match preferences.get_preferences().await {
                        Ok(p) => Some(p),
                        Err(e) => {
                            warn!(error = %e, "could not reload preferences");
                            None
                        }
                    };
                    FlowEvent::TurnResolved {
                        input,
                        next,
                        preferences: reloaded,
                    }
                }
                Err(e) => {
                    warn!(step = %step.id, error = %e, "step action failed");
                    FlowEvent::TurnFailed(e.to_string())
                }
            };
            let _ = tx.send(event);
        });
    }

    fn compile_route(&self, destination: String, include_weather: bool) {
        let locator = self.services.locator.clone();
        let compiler = self.compiler.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let outcome = match locator.current_position().await {
                Ok(origin) => compiler.compile(origin, &destination, include_weather).await,
                Err(e) => {
                    warn!(error = %e, "current position unavailable");
                    RouteOutcome::Unreachable
                }
            };
            let _ = tx.send(FlowEvent::RouteCompiled(outcome));
        });
    }

    fn schedule(&self, delay: Duration, event: FlowEvent) {
        let tx = self.events_tx.clone();
        let session = event.generation().map(|_| self.session.clone());

        tokio::spawn(async move {
            match session {
                Some(token) => tokio::select! {
                    () = token.cancelled() => {
                        debug!(?event, "scheduled navigation event cancelled");
                        return;
                    }
                    () = tokio::time::sleep(delay) => {}
                },
                None => tokio::time::sleep(delay).await,
            }
            let _ = tx.send(event);
        });
    }
}
