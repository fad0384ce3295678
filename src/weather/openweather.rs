// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! OpenWeatherMap client for the current-weather endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{ParseError, ProtocolError, WeatherError};

use super::{WeatherSnapshot, WeatherSource};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// HTTP client for the OpenWeatherMap current-weather API.
///
/// Queries `/data/2.5/weather` for a US zip code in imperial units.
///
/// # Examples
///
/// ```no_run
/// use skyled::weather::{OpenWeatherClient, WeatherSource};
///
/// # async fn example() -> skyled::Result<()> {
/// let client = OpenWeatherClient::new("12345", "api-key")?;
/// let snapshot = client.fetch().await.map_err(skyled::Error::WeatherUnavailable)?;
/// println!("{} at {}F", snapshot.condition, snapshot.temperature);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    zip_code: String,
    api_key: String,
    client: Client,
}

impl OpenWeatherClient {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new client for the given US zip code and API key.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        zip_code: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let client = Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            zip_code: zip_code.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Overrides the API base URL.
    ///
    /// Used by integration tests to point at a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the configured zip code.
    #[must_use]
    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }
}

impl WeatherSource for OpenWeatherClient {
    async fn fetch(&self) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        tracing::debug!(url = %url, zip = %self.zip_code, "fetching weather");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("zip", format!("{},us", self.zip_code)),
                ("units", "imperial".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            ))
            .into());
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "received weather response");

        let report: CurrentWeather = serde_json::from_str(&body).map_err(ParseError::Json)?;
        let condition = report
            .weather
            .first()
            .ok_or_else(|| ParseError::MissingField("weather".to_string()))?;

        Ok(WeatherSnapshot {
            condition: condition.main.as_str().into(),
            temperature: report.main.temp,
            temperature_min: report.main.temp_min,
            temperature_max: report.main.temp_max,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weather: Vec<ConditionEntry>,
    main: Measurements,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    main: String,
}

#[derive(Debug, Deserialize)]
struct Measurements {
    temp: f32,
    temp_min: f32,
    temp_max: f32,
}
