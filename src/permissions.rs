//! Permission gate for the conversation and navigation flow.
//!
//! Navigation needs two system capabilities, each represented by a
//! [`PermissionKind`] variant. Until both are granted the flow stays in the
//! `not-allowed` phase and re-checks on a timer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PermissionsConfig;

/// A system capability the assistant needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    /// Foreground location, used to find the starting waypoint.
    Location,
    /// Microphone access for voice input.
    Microphone,
}

impl PermissionKind {
    /// Return all permission variants.
    pub fn all() -> &'static [PermissionKind] {
        &[PermissionKind::Location, PermissionKind::Microphone]
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionKind::Location => "location",
            PermissionKind::Microphone => "microphone",
        };
        f.write_str(s)
    }
}

/// Answers whether a capability is currently granted.
pub trait PermissionGate: Send + Sync {
    fn is_granted(&self, kind: PermissionKind) -> bool;

    /// Every capability in [`PermissionKind::all`] is granted.
    fn all_granted(&self) -> bool {
        PermissionKind::all().iter().all(|k| self.is_granted(*k))
    }

    /// Capabilities still missing, for the "grant permissions" prompt.
    fn missing(&self) -> Vec<PermissionKind> {
        PermissionKind::all()
            .iter()
            .copied()
            .filter(|k| !self.is_granted(*k))
            .collect()
    }
}

/// Comma-separated names of the capabilities `gate` still lacks.
pub fn missing_summary(gate: &dyn PermissionGate) -> String {
    gate.missing()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Grants fixed at startup from configuration.
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissionGate {
    location: bool,
    microphone: bool,
}

impl StaticPermissionGate {
    pub fn new(config: &PermissionsConfig) -> Self {
        Self {
            location: config.location,
            microphone: config.microphone,
        }
    }

    pub fn granted() -> Self {
        Self {
            location: true,
            microphone: true,
        }
    }
}

impl PermissionGate for StaticPermissionGate {
    fn is_granted(&self, kind: PermissionKind) -> bool {
        match kind {
            PermissionKind::Location => self.location,
            PermissionKind::Microphone => self.microphone,
        }
    }
}
