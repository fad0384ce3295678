// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Desired lighting configuration.
//!
//! A [`Preset`] is what the condition mapper wants the lights to show. Its
//! [`Segment`]s are sparse: a field that is `None` was never decided on and
//! is never transmitted, which is distinct from setting it to zero.

use serde::{Deserialize, Serialize};

use crate::types::RgbColor;

/// Sparse attribute set for one lighting segment.
///
/// Field names follow the WLED JSON API: `pal` (palette), `fx` (effect),
/// `sx` (effect speed), `ix` (effect intensity), `col` (up to 3 colors).
/// Only populated fields are serialized.
///
/// # Examples
///
/// ```
/// use skyled::preset::Segment;
///
/// let segment = Segment::new().with_palette(7).with_effect(43);
/// assert_eq!(serde_json::to_string(&segment).unwrap(), r#"{"pal":7,"fx":43}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Segment {
    /// Palette id.
    #[serde(rename = "pal", skip_serializing_if = "Option::is_none")]
    pub palette: Option<u8>,

    /// Effect id.
    #[serde(rename = "fx", skip_serializing_if = "Option::is_none")]
    pub effect: Option<u8>,

    /// Effect speed (0-255).
    #[serde(rename = "sx", skip_serializing_if = "Option::is_none")]
    pub speed: Option<u8>,

    /// Effect intensity (0-255).
    #[serde(rename = "ix", skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,

    /// Segment colors, up to 3 entries.
    #[serde(rename = "col", skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<RgbColor>>,
}

impl Segment {
    /// Creates a segment with no attributes set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the palette id.
    #[must_use]
    pub fn with_palette(mut self, palette: u8) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Sets the effect id.
    #[must_use]
    pub fn with_effect(mut self, effect: u8) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Sets the effect speed.
    #[must_use]
    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Sets the effect intensity.
    #[must_use]
    pub fn with_intensity(mut self, intensity: u8) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Sets the segment colors.
    #[must_use]
    pub fn with_colors(mut self, colors: Vec<RgbColor>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Returns `true` if no attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.palette.is_none()
            && self.effect.is_none()
            && self.speed.is_none()
            && self.intensity.is_none()
            && self.colors.is_none()
    }
}

/// Desired lighting configuration derived from the weather.
///
/// Owned by one pipeline invocation and discarded after the cycle. An empty
/// preset (no segments) is the mapper's "nothing to do" signal; callers
/// must not transmit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    /// Whether the lights should be powered on.
    pub power_on: bool,
    /// Ordered segment attribute sets.
    pub segments: Vec<Segment>,
}

impl Preset {
    /// Creates the empty preset: nothing to send.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            power_on: false,
            segments: Vec::new(),
        }
    }

    /// Creates a powered-on preset carrying a single segment.
    #[must_use]
    pub fn single(segment: Segment) -> Self {
        Self {
            power_on: true,
            segments: vec![segment],
        }
    }

    /// Returns `true` if this preset carries no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
