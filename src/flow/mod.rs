//! Top-level orchestration of the conversation and navigation phases.
//!
//! [`reducer`] holds the pure transition logic, [`runtime`] executes its
//! commands against the collaborators.

pub mod reducer;
pub mod runtime;
pub mod state;

pub use reducer::{FlowCommand, FlowContext, FlowEvent, SpeechPurpose, reduce};
pub use runtime::{FlowHandle, FlowRuntime, FlowServices};
pub use state::{AppPhase, ConversationStatus, FlowState};
