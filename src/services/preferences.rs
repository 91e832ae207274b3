//! Preferences backed by the `/preferences` endpoint.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::services::types::{Preferences, PreferencesPatch};
use crate::services::{ApiClient, PreferencesService};

pub struct HttpPreferencesService {
    api: ApiClient,
}

impl HttpPreferencesService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Restore every preference to its first-run value.
    pub async fn reset(&self) -> Result<Preferences> {
        let defaults = Preferences::default();
        info!("resetting preferences");
        self.update_preferences(PreferencesPatch {
            spanish: Some(defaults.spanish),
            weather: Some(defaults.weather),
            vibration: Some(defaults.vibration),
            is_first_time: Some(defaults.is_first_time),
        })
        .await
    }
}

#[async_trait]
impl PreferencesService for HttpPreferencesService {
    async fn get_preferences(&self) -> Result<Preferences> {
        self.api.get("preferences").await
    }

    async fn update_preferences(&self, patch: PreferencesPatch) -> Result<Preferences> {
        self.api.put("preferences", &patch).await
    }
}
