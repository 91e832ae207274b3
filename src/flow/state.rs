//! Orchestrator-owned session state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::conversation::{ConversationStep, Phase};
use crate::navigation::NavigationStep;
use crate::services::{Node, Preferences};
use crate::text::Locale;

/// Coarse application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppPhase {
    /// Location or microphone not granted; only the grant prompt is shown.
    NotAllowed,
    Config,
    Start,
    Navigate,
}

impl From<Phase> for AppPhase {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Config => AppPhase::Config,
            Phase::Start => AppPhase::Start,
        }
    }
}

impl AppPhase {
    pub fn is_conversation(self) -> bool {
        matches!(self, AppPhase::Config | AppPhase::Start)
    }
}

impl fmt::Display for AppPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AppPhase::NotAllowed => "not-allowed",
            AppPhase::Config => "config",
            AppPhase::Start => "start",
            AppPhase::Navigate => "navigate",
        })
    }
}

/// Which half of a conversational turn is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Speak,
    Listen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowState {
    pub app_phase: AppPhase,
    /// `None` while a turn is being processed or during navigation.
    pub status: Option<ConversationStatus>,
    pub current_step: ConversationStep,
    /// Last transcript, shown while the turn is processed.
    pub user_input: String,
    pub hide_input: bool,
    pub navigation_steps: Vec<NavigationStep>,
    /// Index of the instruction being narrated; `None` outside navigation.
    pub navigation_index: Option<usize>,
    pub path: Vec<Node>,
    /// Last place the user asked for.
    pub destination: String,
    pub preferences: Preferences,
    /// Navigation session counter. Continuations issued for an older
    /// session are discarded.
    pub generation: u64,
}

impl Default for FlowState {
    fn default() -> Self {
        Self {
            app_phase: AppPhase::NotAllowed,
            status: None,
            current_step: ConversationStep::config(),
            user_input: String::new(),
            hide_input: true,
            navigation_steps: Vec::new(),
            navigation_index: None,
            path: Vec::new(),
            destination: String::new(),
            preferences: Preferences::default(),
            generation: 0,
        }
    }
}

impl FlowState {
    pub fn locale(&self) -> Locale {
        Locale::from_spanish(self.preferences.spanish)
    }

    pub fn is_navigating(&self) -> bool {
        self.app_phase == AppPhase::Navigate
    }

    pub fn current_instruction(&self) -> Option<&NavigationStep> {
        self.navigation_index.and_then(|i| self.navigation_steps.get(i))
    }

    /// Clear every navigation field back to its inactive value.
    pub fn reset_navigation(&mut self) {
        self.navigation_steps.clear();
        self.path.clear();
        self.navigation_index = None;
    }

    /// Enter a conversation phase on `step`, ready to speak its prompt.
    pub fn enter_step(&mut self, step: ConversationStep) {
        self.app_phase = step.phase.into();
        self.current_step = step;
        self.status = Some(ConversationStatus::Speak);
        self.hide_input = true;
    }
}
