//! TrueNavi: voice-guided pedestrian navigation.
//!
//! The assistant holds a turn-based spoken conversation, resolves a
//! destination against a graph of named waypoints and narrates turn-by-turn
//! instructions for the walking route.
//!
//! # Architecture
//!
//! - **Conversation**: lexicon, input resolver, step script and driver
//! - **Navigation**: bearings, turn classification and the route compiler
//! - **Flow**: a pure reducer plus a runtime that executes its commands
//! - **Services**: graph, preferences and weather collaborators over HTTP
//! - **Speech**: playback and capture seams with console implementations

pub mod config;
pub mod conversation;
pub mod error;
pub mod flow;
pub mod navigation;
pub mod permissions;
pub mod services;
pub mod speech;
pub mod text;

pub use config::NaviConfig;
pub use error::{NaviError, Result};
pub use flow::{FlowHandle, FlowRuntime, FlowServices, FlowState};
pub use navigation::{RouteCompiler, RouteOutcome};
pub use text::Locale;
