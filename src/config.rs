// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration.
//!
//! The core receives these values already parsed; nothing in the library
//! reads process-wide state on its own. [`BridgeConfig::from_env`] is the
//! binary's convenience for the conventional environment variables.

use std::env;
use std::time::Duration;

use crate::device::DeviceAddress;
use crate::error::ConfigError;

/// Configuration for the weather-to-lights bridge.
///
/// # Environment variables
///
/// | Variable        | Meaning                                  | Required |
/// |-----------------|------------------------------------------|----------|
/// | `WLED_IP`       | Controller hosts, comma-separated        | yes      |
/// | `ZIP`           | US zip code for the weather lookup       | yes      |
/// | `WEATHER_KEY`   | OpenWeatherMap API key                   | yes      |
/// | `POLL_INTERVAL` | Seconds between cycles (default 60)      | no       |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Target controllers, in reconciliation order.
    pub devices: Vec<DeviceAddress>,
    /// US zip code for the weather lookup.
    pub zip_code: String,
    /// OpenWeatherMap API key.
    pub api_key: String,
    /// Time between poll cycles.
    pub poll_interval: Duration,
}

impl BridgeConfig {
    /// Default time between poll cycles.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

    /// Loads the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let devices = parse_hosts(&require(&lookup, "WLED_IP")?)?;
        let zip_code = require(&lookup, "ZIP")?;
        let api_key = require(&lookup, "WEATHER_KEY")?;
        let poll_interval = match lookup("POLL_INTERVAL") {
            None => Self::DEFAULT_POLL_INTERVAL,
            Some(raw) => parse_interval(&raw)?,
        };

        Ok(Self {
            devices,
            zip_code,
            api_key,
            poll_interval,
        })
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn parse_hosts(raw: &str) -> Result<Vec<DeviceAddress>, ConfigError> {
    let devices: Vec<DeviceAddress> = raw
        .split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(DeviceAddress::new)
        .collect();

    if devices.is_empty() {
        return Err(ConfigError::InvalidVar {
            name: "WLED_IP",
            message: "no device addresses given".to_string(),
        });
    }
    Ok(devices)
}

fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    let seconds: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
        name: "POLL_INTERVAL",
        message: format!("expected whole seconds, got {raw:?}"),
    })?;

    if seconds == 0 {
        return Err(ConfigError::InvalidVar {
            name: "POLL_INTERVAL",
            message: "interval must be at least 1 second".to_string(),
        });
    }
    Ok(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn loads_complete_configuration() {
        let config = BridgeConfig::from_lookup(lookup_from(&[
            ("WLED_IP", "192.168.1.40, 192.168.1.41"),
            ("ZIP", "12345"),
            ("WEATHER_KEY", "key"),
            ("POLL_INTERVAL", "30"),
        ]))
        .unwrap();

        assert_eq!(
            config.devices,
            vec![
                DeviceAddress::new("192.168.1.40"),
                DeviceAddress::new("192.168.1.41")
            ]
        );
        assert_eq!(config.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn poll_interval_defaults_to_a_minute() {
        let config = BridgeConfig::from_lookup(lookup_from(&[
            ("WLED_IP", "192.168.1.40"),
            ("ZIP", "12345"),
            ("WEATHER_KEY", "key"),
        ]))
        .unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(60));
    }

    #[test]
    fn missing_variable_is_reported_by_name() {
        let err = BridgeConfig::from_lookup(lookup_from(&[("WLED_IP", "192.168.1.40")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("ZIP"));
    }

    #[test]
    fn empty_host_list_is_invalid() {
        let err = BridgeConfig::from_lookup(lookup_from(&[
            ("WLED_IP", " , "),
            ("ZIP", "12345"),
            ("WEATHER_KEY", "key"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "WLED_IP", .. }));
    }

    #[test]
    fn zero_interval_is_invalid() {
        let err = parse_interval("0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                name: "POLL_INTERVAL",
                ..
            }
        ));
    }
}
