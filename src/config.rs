//! Configuration types for the navigation assistant.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::navigation::geo::Coordinates;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NaviConfig {
    /// Graph/preferences backend settings.
    pub api: ApiConfig,
    /// Weather lookup settings.
    pub weather: WeatherConfig,
    /// Transcript matching settings.
    pub resolver: ResolverConfig,
    /// Narration pacing against walking speed.
    pub pacing: PacingConfig,
    /// Retry policy for conversation step actions.
    pub actions: ActionConfig,
    /// Speech playback settings.
    pub speech: SpeechConfig,
    /// Permission gate used by the console binary.
    pub permissions: PermissionsConfig,
    /// Fixed walker position used by the console binary.
    pub location: LocationConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the graph/preferences backend (no trailing slash needed).
    pub base_url: String,
    /// Device identifier sent as the `device-id` header.
    ///
    /// Generated on first run when `None`.
    pub device_id: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_owned(),
            device_id: None,
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Weather lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Open-Meteo compatible forecast endpoint.
    pub base_url: String,
    /// How long a fetched reading is reused, in seconds.
    pub cache_ttl_secs: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1/forecast".to_owned(),
            cache_ttl_secs: 600,
            timeout_secs: 5,
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Transcript resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// A fuzzy match is accepted when the smallest edit distance between the
    /// transcript and a known phrase is strictly below this value.
    ///
    ///   - 3: strict (only small slips like "cafetria")
    ///   - 4: balanced (default)
    ///   - 5: lenient (more false positives on short phrases)
    pub fuzzy_threshold: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { fuzzy_threshold: 4 }
    }
}

/// Narration pacing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after a turn is processed so the transcript stays visible (ms).
    pub feedback_delay_ms: u64,
    /// Pause between navigation instructions to allow physical movement (ms).
    pub instruction_delay_ms: u64,
    /// Pause after the final instruction before returning to conversation (ms).
    pub navigation_end_delay_ms: u64,
    /// Interval between permission re-checks while not allowed (ms).
    pub permission_poll_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            feedback_delay_ms: 3_000,
            instruction_delay_ms: 5_000,
            navigation_end_delay_ms: 3_000,
            permission_poll_ms: 2_000,
        }
    }
}

impl PacingConfig {
    /// Pacing with every delay set to zero, for scripted runs.
    pub fn immediate() -> Self {
        Self {
            feedback_delay_ms: 0,
            instruction_delay_ms: 0,
            navigation_end_delay_ms: 0,
            permission_poll_ms: 0,
        }
    }
}

/// Retry policy applied when a step action (preference update) fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Total attempts, including the first one. Values below 1 behave as 1.
    pub max_attempts: u32,
    /// Backoff before the second attempt; doubles on each further attempt (ms).
    pub retry_backoff_ms: u64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_backoff_ms: 500,
        }
    }
}

/// Speech playback configuration forwarded to the speaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Playback rate multiplier.
    pub rate: f32,
    /// Playback pitch multiplier.
    pub pitch: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: 1.2,
            pitch: 1.0,
        }
    }
}

/// Location and microphone grants as seen by the console binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
    pub location: bool,
    pub microphone: bool,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            location: true,
            microphone: true,
        }
    }
}

/// Position reported when no positioning hardware is available.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: 4.6383,
            longitude: -74.0841,
        }
    }
}

impl LocationConfig {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl NaviConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::NaviError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::NaviError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/truenavi/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("truenavi").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("truenavi")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/truenavi-config/config.toml")
        }
    }

    /// Make sure a device id exists, generating a UUID v4 if needed.
    ///
    /// Returns `true` when a new id was generated (the caller should persist).
    pub fn ensure_device_id(&mut self) -> bool {
        match &self.api.device_id {
            Some(id) if !id.trim().is_empty() => false,
            _ => {
                self.api.device_id = Some(uuid::Uuid::new_v4().to_string());
                true
            }
        }
    }
}
