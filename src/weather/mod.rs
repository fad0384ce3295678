// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Weather conditions and the source abstraction.
//!
//! A [`WeatherSource`] produces one [`WeatherSnapshot`] per poll cycle. The
//! bundled implementation, [`OpenWeatherClient`], talks to the
//! OpenWeatherMap current-weather API; anything that can hand back a
//! snapshot works, which is what the reconciliation tests rely on.

mod openweather;

pub use openweather::OpenWeatherClient;

use std::fmt;

use crate::error::WeatherError;

/// Weather condition group as reported by OpenWeatherMap.
///
/// OpenWeatherMap reports the 7xx "Atmosphere" group as individual strings
/// (Mist, Fog, Haze, ...); those all collapse into [`Atmosphere`].
/// Conditions outside the known set become [`Unknown`], which maps to an
/// empty preset downstream.
///
/// [`Atmosphere`]: WeatherCondition::Atmosphere
/// [`Unknown`]: WeatherCondition::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    /// Thunderstorm group (2xx).
    Thunderstorm,
    /// Drizzle group (3xx).
    Drizzle,
    /// Rain group (5xx).
    Rain,
    /// Snow group (6xx).
    Snow,
    /// Atmosphere group (7xx): mist, smoke, haze, dust, fog, sand, ash,
    /// squall, tornado.
    Atmosphere,
    /// Clear sky (800).
    Clear,
    /// Clouds group (80x).
    Clouds,
    /// Anything this library has no lighting preset for.
    Unknown,
}

impl From<&str> for WeatherCondition {
    fn from(main: &str) -> Self {
        match main {
            "Thunderstorm" => Self::Thunderstorm,
            "Drizzle" => Self::Drizzle,
            "Rain" => Self::Rain,
            "Snow" => Self::Snow,
            "Atmosphere" | "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash"
            | "Squall" | "Tornado" => Self::Atmosphere,
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Atmosphere => "Atmosphere",
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// One reading of the current weather.
///
/// Owned by a single pipeline invocation and discarded after the cycle.
/// Invariant: `temperature_max >= temperature_min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSnapshot {
    /// Current condition group.
    pub condition: WeatherCondition,
    /// Current temperature.
    pub temperature: f32,
    /// Forecast low for the day.
    pub temperature_min: f32,
    /// Forecast high for the day.
    pub temperature_max: f32,
}

impl WeatherSnapshot {
    /// Normalized position of the current temperature within the day's
    /// [min, max] range, clamped to [0, 1].
    ///
    /// When min and max coincide the range has no width; the percentile is
    /// fixed at 0.5 so color interpolation stays defined instead of
    /// dividing by zero.
    #[must_use]
    pub fn percentile(&self) -> f32 {
        let span = self.temperature_max - self.temperature_min;
        if span <= 0.0 {
            return 0.5;
        }
        ((self.temperature - self.temperature_min) / span).clamp(0.0, 1.0)
    }
}

/// A source of weather snapshots.
#[allow(async_fn_in_trait)]
pub trait WeatherSource {
    /// Fetches the current weather.
    ///
    /// # Errors
    ///
    /// Returns `WeatherError` if the upstream API cannot be reached or its
    /// response cannot be parsed.
    async fn fetch(&self) -> Result<WeatherSnapshot, WeatherError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(temperature: f32, min: f32, max: f32) -> WeatherSnapshot {
        WeatherSnapshot {
            condition: WeatherCondition::Clear,
            temperature,
            temperature_min: min,
            temperature_max: max,
        }
    }

    #[test]
    fn percentile_within_range() {
        assert!((snapshot(60.0, 50.0, 70.0).percentile() - 0.5).abs() < f32::EPSILON);
        assert!((snapshot(55.0, 50.0, 70.0).percentile() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn percentile_clamps_outliers() {
        assert!((snapshot(40.0, 50.0, 70.0).percentile()).abs() < f32::EPSILON);
        assert!((snapshot(90.0, 50.0, 70.0).percentile() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn percentile_defined_for_zero_span() {
        assert!((snapshot(50.0, 50.0, 50.0).percentile() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn condition_from_known_strings() {
        assert_eq!(
            WeatherCondition::from("Thunderstorm"),
            WeatherCondition::Thunderstorm
        );
        assert_eq!(WeatherCondition::from("Clouds"), WeatherCondition::Clouds);
    }

    #[test]
    fn atmosphere_group_aliases() {
        for main in ["Mist", "Fog", "Haze", "Tornado"] {
            assert_eq!(WeatherCondition::from(main), WeatherCondition::Atmosphere);
        }
    }

    #[test]
    fn unrecognized_condition_is_unknown() {
        assert_eq!(WeatherCondition::from("Sharknado"), WeatherCondition::Unknown);
    }
}
