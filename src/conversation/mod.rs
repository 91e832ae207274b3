//! Turn-based dialogue: phrase lexicon, input resolution, the step script
//! and the driver that moves between steps.

pub mod driver;
pub mod lexicon;
pub mod resolver;
pub mod steps;

use serde::{Deserialize, Serialize};

pub use driver::ConversationDriver;
pub use lexicon::{Category, Lexicon};
pub use resolver::{Input, InputResolver};
pub use steps::{ConversationStep, Next, StepAction, StepId};

/// Conversation mode deciding which input categories are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Yes/no setup questions.
    Config,
    /// Destination prompt; also accepts the `config` command.
    Start,
}
