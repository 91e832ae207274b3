//! Pure transition logic of the orchestrator.
//!
//! [`reduce`] applies one [`FlowEvent`] to the state and returns the
//! [`FlowCommand`]s to execute. It performs no I/O: the runtime interprets
//! the commands and feeds their results back as further events.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::PacingConfig;
use crate::conversation::{ConversationStep, Input, Phase, StepId};
use crate::flow::state::{AppPhase, ConversationStatus, FlowState};
use crate::navigation::RouteOutcome;
use crate::services::Preferences;
use crate::text::{Locale, translate};

/// What a finished utterance was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechPurpose {
    /// The current conversation step's prompt.
    Prompt,
    /// Instruction `index` of navigation session `generation`.
    Instruction { generation: u64, index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// The runtime started.
    Started,
    /// Preferences answered; `None` when the lookup failed.
    PreferencesLoaded(Option<Preferences>),
    PermissionsChecked(bool),
    /// Time to re-check permissions while not allowed.
    PermissionPoll,
    SpeechDone(SpeechPurpose),
    /// Transcript captured for the current step.
    Heard(String),
    /// A turn was resolved and the driver picked `next`.
    TurnResolved {
        input: Input,
        next: ConversationStep,
        preferences: Option<Preferences>,
    },
    /// The step action could not be persisted; the step is asked again.
    TurnFailed(String),
    /// Feedback pause elapsed; speak the current step.
    ShowStep,
    RouteCompiled(RouteOutcome),
    /// Movement pause elapsed; narrate the next instruction.
    InstructionDue { generation: u64 },
    /// Arrival pause elapsed; return to the conversation.
    NavigationFinished { generation: u64 },
    /// The user closed navigation early.
    CloseNavigation,
}

impl FlowEvent {
    /// Generation this event belongs to, if it is scoped to a navigation session.
    pub fn generation(&self) -> Option<u64> {
        match self {
            FlowEvent::InstructionDue { generation } | FlowEvent::NavigationFinished { generation } => {
                Some(*generation)
            }
            FlowEvent::SpeechDone(SpeechPurpose::Instruction { generation, .. }) => Some(*generation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowCommand {
    Speak {
        text: String,
        locale: Locale,
        purpose: SpeechPurpose,
    },
    StopSpeech,
    Listen(Phase),
    /// Refresh the lexicon, resolve `transcript`, advance from `step` and
    /// reload preferences.
    ProcessInput {
        transcript: String,
        step: ConversationStep,
    },
    CompileRoute {
        destination: String,
        include_weather: bool,
    },
    LoadPreferences,
    CheckPermissions,
    /// Deliver `event` after `delay`.
    Schedule {
        delay: Duration,
        event: FlowEvent,
    },
    /// Drop every pending continuation of the current navigation session.
    CancelNavigation,
}

/// Read-only inputs of the reducer.
#[derive(Debug, Clone, Default)]
pub struct FlowContext {
    pub pacing: PacingConfig,
}

impl FlowContext {
    pub fn new(pacing: PacingConfig) -> Self {
        Self { pacing }
    }

    fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.pacing.feedback_delay_ms)
    }

    fn instruction_delay(&self) -> Duration {
        Duration::from_millis(self.pacing.instruction_delay_ms)
    }

    fn end_delay(&self) -> Duration {
        Duration::from_millis(self.pacing.navigation_end_delay_ms)
    }

    fn permission_poll(&self) -> Duration {
        Duration::from_millis(self.pacing.permission_poll_ms)
    }
}

pub fn reduce(state: &mut FlowState, event: FlowEvent, ctx: &FlowContext) -> Vec<FlowCommand> {
    if let Some(generation) = event.generation()
        && (generation != state.generation || !state.is_navigating())
    {
        debug!(generation, current = state.generation, ?event, "dropping stale navigation event");
        return Vec::new();
    }

    match event {
        FlowEvent::Started => vec![FlowCommand::LoadPreferences],

        FlowEvent::PreferencesLoaded(preferences) => {
            if let Some(p) = preferences {
                state.preferences = p;
            }
            if state.app_phase == AppPhase::NotAllowed {
                vec![FlowCommand::CheckPermissions]
            } else {
                Vec::new()
            }
        }

        FlowEvent::PermissionPoll => {
            if state.app_phase == AppPhase::NotAllowed {
                vec![FlowCommand::CheckPermissions]
            } else {
                Vec::new()
            }
        }

        FlowEvent::PermissionsChecked(granted) => {
            if !granted {
                state.app_phase = AppPhase::NotAllowed;
                state.status = None;
                return vec![FlowCommand::Schedule {
                    delay: ctx.permission_poll(),
                    event: FlowEvent::PermissionPoll,
                }];
            }
            if state.app_phase != AppPhase::NotAllowed {
                return Vec::new();
            }
            let step = if state.preferences.is_first_time {
                ConversationStep::config()
            } else {
                ConversationStep::start()
            };
            info!(first_time = state.preferences.is_first_time, step = %step.id, "permissions granted");
            state.enter_step(step);
            vec![speak_prompt(state)]
        }

        FlowEvent::SpeechDone(SpeechPurpose::Prompt) => {
            if !state.app_phase.is_conversation() || state.status != Some(ConversationStatus::Speak) {
                return Vec::new();
            }
            if state.current_step.leads_to_navigation() {
                state.status = None;
                return vec![FlowCommand::CompileRoute {
                    destination: state.destination.clone(),
                    include_weather: state.preferences.weather,
                }];
            }
            state.status = Some(ConversationStatus::Listen);
            vec![FlowCommand::Listen(state.current_step.phase)]
        }

        FlowEvent::Heard(transcript) => {
            if state.status != Some(ConversationStatus::Listen) {
                return Vec::new();
            }
            state.status = None;
            state.hide_input = false;
            state.user_input = transcript.clone();
            vec![FlowCommand::ProcessInput {
                transcript,
                step: state.current_step,
            }]
        }

        FlowEvent::TurnResolved {
            input,
            next,
            preferences,
        } => {
            if let Input::Place(place) = &input {
                state.destination = place.clone();
            }
            if let Some(p) = preferences {
                state.preferences = p;
            }
            state.current_step = next;
            state.app_phase = next.phase.into();
            vec![FlowCommand::Schedule {
                delay: ctx.feedback_delay(),
                event: FlowEvent::ShowStep,
            }]
        }

        FlowEvent::TurnFailed(reason) => {
            info!(step = %state.current_step.id, %reason, "turn not saved, asking again");
            vec![FlowCommand::Schedule {
                delay: ctx.feedback_delay(),
                event: FlowEvent::ShowStep,
            }]
        }

        FlowEvent::ShowStep => {
            if !state.app_phase.is_conversation() {
                return Vec::new();
            }
            state.enter_step(state.current_step);
            vec![speak_prompt(state)]
        }

        FlowEvent::RouteCompiled(outcome) => {
            if state.app_phase != AppPhase::Start {
                return Vec::new();
            }
            match outcome {
                RouteOutcome::Ready(route) => {
                    state.generation += 1;
                    state.app_phase = AppPhase::Navigate;
                    state.status = None;
                    state.navigation_steps = route.steps;
                    state.path = route.path;
                    state.navigation_index = Some(0);
                    info!(
                        generation = state.generation,
                        destination = %state.destination,
                        instructions = state.navigation_steps.len(),
                        "navigation started"
                    );
                    speak_instruction(state).into_iter().collect()
                }
                RouteOutcome::SameDestination => {
                    state.enter_step(ConversationStep::get(StepId::SameDestination));
                    vec![speak_prompt(state)]
                }
                RouteOutcome::Unreachable => {
                    state.enter_step(ConversationStep::get(StepId::NoRoute));
                    vec![speak_prompt(state)]
                }
            }
        }

        FlowEvent::SpeechDone(SpeechPurpose::Instruction { generation, index }) => {
            if state.navigation_index != Some(index) {
                return Vec::new();
            }
            if index + 1 < state.navigation_steps.len() {
                vec![FlowCommand::Schedule {
                    delay: ctx.instruction_delay(),
                    event: FlowEvent::InstructionDue { generation },
                }]
            } else {
                vec![FlowCommand::Schedule {
                    delay: ctx.end_delay(),
                    event: FlowEvent::NavigationFinished { generation },
                }]
            }
        }

        FlowEvent::InstructionDue { .. } => {
            state.navigation_index = state.navigation_index.map(|i| i + 1);
            speak_instruction(state).into_iter().collect()
        }

        FlowEvent::NavigationFinished { .. } => {
            info!(generation = state.generation, destination = %state.destination, "navigation finished");
            leave_navigation(state);
            vec![speak_prompt(state)]
        }

        FlowEvent::CloseNavigation => {
            if !state.is_navigating() {
                return Vec::new();
            }
            info!(generation = state.generation, index = ?state.navigation_index, "navigation closed");
            state.generation += 1;
            leave_navigation(state);
            vec![
                FlowCommand::StopSpeech,
                FlowCommand::CancelNavigation,
                speak_prompt(state),
            ]
        }
    }
}

fn leave_navigation(state: &mut FlowState) {
    state.reset_navigation();
    state.enter_step(ConversationStep::start());
}

fn speak_prompt(state: &FlowState) -> FlowCommand {
    let locale = state.locale();
    FlowCommand::Speak {
        text: translate(state.current_step.prompt, locale),
        locale,
        purpose: SpeechPurpose::Prompt,
    }
}

fn speak_instruction(state: &FlowState) -> Option<FlowCommand> {
    let index = state.navigation_index?;
    let instruction = state.navigation_steps.get(index)?;
    let locale = state.locale();
    let text = instruction.narration(locale);
    debug!(index, direction = %instruction.direction, %text, "narrating instruction");
    Some(FlowCommand::Speak {
        text,
        locale,
        purpose: SpeechPurpose::Instruction {
            generation: state.generation,
            index,
        },
    })
}
