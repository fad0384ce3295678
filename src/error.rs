// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `skyled` library.
//!
//! This module provides the error hierarchy for failures across the
//! library: HTTP communication, JSON parsing, weather lookups, per-device
//! operations, and configuration loading.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The upstream weather fetch failed; the whole poll cycle is skipped.
    #[error("weather source unavailable: {0}")]
    WeatherUnavailable(#[source] WeatherError),

    /// The desired preset addresses more segments than devices exist.
    ///
    /// This is fatal for the cycle: nothing is transmitted. Presets are
    /// never silently truncated to fit the target list.
    #[error("preset supplies {segments} segments but only {targets} devices are configured")]
    TargetCountMismatch {
        /// Number of segments in the desired preset.
        segments: usize,
        /// Number of configured target devices.
        targets: usize,
    },

    /// Error occurred during a device operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred while loading configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to HTTP communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing API responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),
}

/// Errors surfaced by a [`WeatherSource`](crate::weather::WeatherSource).
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The weather API could not be reached.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The weather API answered with an unusable body.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors surfaced by a [`DeviceTransport`](crate::device::DeviceTransport).
///
/// These are recovered locally during reconciliation: a fetch failure falls
/// back to an unpruned payload, a send failure is recorded in that device's
/// outcome. They never abort sibling devices.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The controller could not be reached.
    #[error("device unreachable: {0}")]
    Unreachable(#[from] ProtocolError),

    /// The controller answered with an unusable state report.
    #[error("invalid device response: {0}")]
    InvalidResponse(#[from] ParseError),
}

/// Errors related to configuration loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable is set but unusable.
    #[error("invalid value for {name}: {message}")]
    InvalidVar {
        /// The variable that failed to parse.
        name: &'static str,
        /// Description of the failure.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_count_mismatch_display() {
        let err = Error::TargetCountMismatch {
            segments: 3,
            targets: 2,
        };
        assert_eq!(
            err.to_string(),
            "preset supplies 3 segments but only 2 devices are configured"
        );
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("weather".to_string());
        assert_eq!(err.to_string(), "missing field in response: weather");
    }

    #[test]
    fn error_from_device_error() {
        let device_err = DeviceError::InvalidResponse(ParseError::MissingField("seg".to_string()));
        let err: Error = device_err.into();
        assert!(matches!(err, Error::Device(_)));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::MissingVar("WEATHER_KEY");
        assert_eq!(err.to_string(), "missing environment variable: WEATHER_KEY");
    }
}
