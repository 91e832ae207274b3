//! Step transitions driven by resolved input.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::ActionConfig;
use crate::conversation::resolver::Input;
use crate::conversation::steps::{ConversationStep, Next, StepAction};
use crate::error::{NaviError, Result};
use crate::services::{PreferencesPatch, PreferencesService};

/// Applies the transition rules of the dialogue script.
///
/// In priority order:
///
/// 1. Unrecognised input yields a fallback that repeats the current question.
/// 2. The `config` command jumps to the configuration root from anywhere.
/// 3. Otherwise the step's action runs (retried with backoff) and the
///    successor is looked up; `Stay` and `Navigate` keep the current step.
///
/// A failed action never advances the dialogue: the error is returned and
/// the caller repeats the current prompt.
#[derive(Debug, Clone)]
pub struct ConversationDriver {
    max_attempts: u32,
    backoff: Duration,
}

impl Default for ConversationDriver {
    fn default() -> Self {
        Self::new(&ActionConfig::default())
    }
}

impl ConversationDriver {
    pub fn new(config: &ActionConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    /// Compute the step that follows `current` given `input`.
    ///
    /// # Errors
    ///
    /// Returns [`NaviError::Service`] when the step's preference update still
    /// fails after every retry.
    pub async fn advance(
        &self,
        current: &ConversationStep,
        input: &Input,
        preferences: &dyn PreferencesService,
    ) -> Result<ConversationStep> {
        let next = match input {
            Input::Unrecognized => ConversationStep::fallback_for(current),
            Input::Config => ConversationStep::config(),
            _ => {
                if let Some(patch) = current.action.patch(input) {
                    self.run_action(current.action, patch, preferences).await?;
                }
                match current.next {
                    Next::Step(id) => ConversationStep::get(id),
                    Next::Navigate | Next::Stay => *current,
                }
            }
        };

        info!(from = %current.id, %input, to = %next.id, "conversation transition");
        Ok(next)
    }

    async fn run_action(
        &self,
        action: StepAction,
        patch: PreferencesPatch,
        preferences: &dyn PreferencesService,
    ) -> Result<()> {
        let mut delay = self.backoff;
        let mut attempt = 1;
        loop {
            match preferences.update_preferences(patch).await {
                Ok(prefs) => {
                    debug!(?action, ?prefs, attempt, "step action applied");
                    return Ok(());
                }
                Err(e) if attempt < self.max_attempts => {
                    warn!(?action, attempt, error = %e, "step action failed, retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(NaviError::Service(format!(
                        "step action {action:?} failed after {attempt} attempts: {e}"
                    )));
                }
            }
        }
    }
}
