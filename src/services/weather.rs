//! Current conditions from an Open-Meteo compatible forecast endpoint.
//!
//! Readings are cached in-process for `cache_ttl_secs`; a walk rarely spans
//! long enough for the weather to change meaningfully.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::WeatherConfig;
use crate::error::Result;
use crate::navigation::geo::Coordinates;
use crate::services::WeatherService;
use crate::services::types::Weather;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    apparent_temperature: f64,
    precipitation: f64,
}

pub struct OpenMeteoWeather {
    client: reqwest::Client,
    base_url: String,
    ttl: Duration,
    cache: Mutex<Option<(Instant, Weather)>>,
}

impl OpenMeteoWeather {
    /// Build a weather client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            ttl: Duration::from_secs(config.cache_ttl_secs),
            cache: Mutex::new(None),
        })
    }

    async fn fetch(&self, at: Coordinates) -> Result<Weather> {
        let response: ForecastResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                ("current", "apparent_temperature,precipitation".to_owned()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(Weather {
            temperature: round2(response.current.apparent_temperature),
            rain: round2(response.current.precipitation * 100.0),
        })
    }
}

#[async_trait]
impl WeatherService for OpenMeteoWeather {
    async fn get_weather(&self, at: Coordinates) -> Result<Weather> {
        let mut cache = self.cache.lock().await;
        if let Some((fetched_at, weather)) = *cache
            && fetched_at.elapsed() < self.ttl
        {
            debug!("weather cache hit");
            return Ok(weather);
        }

        let weather = self.fetch(at).await?;
        debug!(
            temperature = weather.temperature,
            rain = weather.rain,
            "weather fetched"
        );
        *cache = Some((Instant::now(), weather));
        Ok(weather)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
