//! The dialogue script.
//!
//! Steps are addressed by [`StepId`] and looked up through [`ConversationStep::get`],
//! so every id is guaranteed to have a definition. The graph is a tree with
//! one cycle: the configuration branch ends by returning to [`StepId::Start`].
//!
//! ```text
//! config -> config_weather -> config_vibrate -> start
//! start | same_destination | no_route -> start_nav -> (navigate)
//! ```

use std::fmt;

use crate::conversation::Phase;
use crate::conversation::resolver::Input;
use crate::services::PreferencesPatch;

/// Identifier of a step in the dialogue script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    Start,
    SameDestination,
    NoRoute,
    StartNav,
    Config,
    ConfigWeather,
    ConfigVibrate,
    Fallback,
}

impl StepId {
    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Start => "start",
            StepId::SameDestination => "same_destination",
            StepId::NoRoute => "no_route",
            StepId::StartNav => "start_nav",
            StepId::Config => "config",
            StepId::ConfigWeather => "config_weather",
            StepId::ConfigVibrate => "config_vibrate",
            StepId::Fallback => "fallback",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a step leads once its answer has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Step(StepId),
    /// Leave the conversation and compile a route to the chosen destination.
    Navigate,
    /// Terminal: stay on the current step.
    Stay,
}

/// Side effect run with the user's answer before the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    None,
    SetSpanish,
    SetWeather,
    /// Also clears `isFirstTime`, since this is the last setup question.
    SetVibration,
}

impl StepAction {
    /// Preference update for `input`, or `None` when there is nothing to persist.
    pub fn patch(self, input: &Input) -> Option<PreferencesPatch> {
        let Input::Answer(answer) = *input else {
            return None;
        };
        let patch = match self {
            StepAction::None => return None,
            StepAction::SetSpanish => PreferencesPatch {
                spanish: Some(answer),
                ..Default::default()
            },
            StepAction::SetWeather => PreferencesPatch {
                weather: Some(answer),
                ..Default::default()
            },
            StepAction::SetVibration => PreferencesPatch {
                vibration: Some(answer),
                is_first_time: Some(false),
                ..Default::default()
            },
        };
        Some(patch)
    }
}

/// One node of the dialogue script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationStep {
    pub id: StepId,
    /// Symbolic icon name for front ends.
    pub icon: &'static str,
    /// English prompt; translated at speak time.
    pub prompt: &'static str,
    /// Which input categories are valid while this step waits for an answer.
    pub phase: Phase,
    pub action: StepAction,
    pub next: Next,
}

impl ConversationStep {
    const fn new(id: StepId, icon: &'static str, prompt: &'static str, phase: Phase, next: Next) -> Self {
        Self {
            id,
            icon,
            prompt,
            phase,
            action: StepAction::None,
            next,
        }
    }

    const fn with_action(mut self, action: StepAction) -> Self {
        self.action = action;
        self
    }

    pub fn get(id: StepId) -> Self {
        match id {
            StepId::Start => Self::new(
                id,
                "signpost",
                "where are we headed?\nlet me know and i'll find the best route",
                Phase::Start,
                Next::Step(StepId::StartNav),
            ),
            StepId::SameDestination => Self::new(
                id,
                "gps-fixed",
                "already here,\nplease choose a different destination",
                Phase::Start,
                Next::Step(StepId::StartNav),
            ),
            StepId::NoRoute => Self::new(
                id,
                "wrong-location",
                "no valid route,\nplease choose a different destination",
                Phase::Start,
                Next::Step(StepId::StartNav),
            ),
            StepId::StartNav => Self::new(
                id,
                "route",
                "calculating your route and starting navigation now",
                Phase::Start,
                Next::Navigate,
            ),
            StepId::Config => Self::new(
                id,
                "language",
                "let's set up the app,\nwould you like to switch to spanish?",
                Phase::Config,
                Next::Step(StepId::ConfigWeather),
            )
            .with_action(StepAction::SetSpanish),
            StepId::ConfigWeather => Self::new(
                id,
                "cloud",
                "language set,\ndo you want to know the weather before navigating?",
                Phase::Config,
                Next::Step(StepId::ConfigVibrate),
            )
            .with_action(StepAction::SetWeather),
            StepId::ConfigVibrate => Self::new(
                id,
                "vibration",
                "weather updates set,\nwould you like haptic feedback for alerts?",
                Phase::Config,
                Next::Step(StepId::Start),
            )
            .with_action(StepAction::SetVibration),
            StepId::Fallback => Self::new(
                id,
                "question-mark",
                "sorry, i didn't catch that,\ncould you try saying it again?",
                Phase::Start,
                Next::Stay,
            ),
        }
    }

    /// Root of the navigation prompt.
    pub fn start() -> Self {
        Self::get(StepId::Start)
    }

    /// Root of the configuration branch.
    pub fn config() -> Self {
        Self::get(StepId::Config)
    }

    /// Fallback prompt that keeps `current`'s phase, action and successor, so a
    /// later valid answer completes the step the user was actually on.
    pub fn fallback_for(current: &ConversationStep) -> Self {
        Self {
            phase: current.phase,
            action: current.action,
            next: current.next,
            ..Self::get(StepId::Fallback)
        }
    }

    /// The step hands over to navigation once its prompt has been spoken.
    pub fn leads_to_navigation(&self) -> bool {
        self.next == Next::Navigate
    }
}
