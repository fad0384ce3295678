// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller addressing, state reports, and the transport abstraction.
//!
//! A [`DeviceTransport`] reads and writes controller state. The bundled
//! implementation, [`WledClient`], speaks the WLED JSON API over HTTP.

mod wled;

pub use wled::WledClient;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DeviceError;
use crate::preset::{Preset, Segment};
use crate::types::RgbColor;

/// Network endpoint of one LED controller.
///
/// Holds whatever the transport needs to reach the device, typically a
/// hostname or IP, optionally with a scheme and port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    /// Creates a new device address.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self(host.into())
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceAddress {
    fn from(host: &str) -> Self {
        Self::new(host)
    }
}

/// One segment as reported by a controller: every attribute present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SegmentState {
    /// Current palette id.
    #[serde(rename = "pal")]
    pub palette: u8,

    /// Current effect id.
    #[serde(rename = "fx")]
    pub effect: u8,

    /// Current effect speed.
    #[serde(rename = "sx")]
    pub speed: u8,

    /// Current effect intensity.
    #[serde(rename = "ix")]
    pub intensity: u8,

    /// Current segment colors.
    #[serde(rename = "col", default)]
    pub colors: Vec<RgbColor>,
}

/// A controller's last-known reported state.
///
/// Fetched fresh immediately before diffing and owned only for the duration
/// of one reconciliation call; never cached across cycles. Controllers
/// report additional fields (brightness, transition, ...) which are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceState {
    /// Whether the lights are currently on.
    #[serde(rename = "on")]
    pub power_on: bool,

    /// Reported segments, primary zone first.
    #[serde(rename = "seg", default)]
    pub segments: Vec<SegmentState>,
}

/// Device-specific sparse patch sent over the wire.
///
/// `v` is always transmitted; `seg` is omitted once reconciliation prunes
/// every segment down to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePayload {
    /// Desired power state.
    #[serde(rename = "v")]
    pub power_on: bool,

    /// Pruned segment patches, one per addressed zone.
    #[serde(rename = "seg", skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Segment>,
}

impl UpdatePayload {
    /// Creates a payload carrying one segment patch, dropping it if empty.
    #[must_use]
    pub fn single(power_on: bool, segment: Segment) -> Self {
        let segments = if segment.is_empty() {
            Vec::new()
        } else {
            vec![segment]
        };
        Self { power_on, segments }
    }

    /// Creates the full, unpruned payload for a preset.
    #[must_use]
    pub fn full(preset: &Preset) -> Self {
        Self {
            power_on: preset.power_on,
            segments: preset.segments.clone(),
        }
    }
}

/// Transport for reading and writing controller state.
#[allow(async_fn_in_trait)]
pub trait DeviceTransport {
    /// Fetches the controller's current state.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the device cannot be reached or its report
    /// cannot be parsed.
    async fn get_state(&self, addr: &DeviceAddress) -> Result<DeviceState, DeviceError>;

    /// Sends an update and returns the state the controller reports back.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the device cannot be reached or its
    /// response cannot be parsed.
    async fn send(
        &self,
        addr: &DeviceAddress,
        payload: &UpdatePayload,
    ) -> Result<DeviceState, DeviceError>;
}
