// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type matching the WLED segment color wire format.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// RGB color with 8-bit channels (0-255).
///
/// Serializes as a bare `[r, g, b]` array, which is the element shape of a
/// WLED segment's `col` list. RGBW controllers report a fourth (white)
/// channel in their state; it is accepted and ignored on deserialization.
///
/// # Examples
///
/// ```
/// use skyled::types::RgbColor;
///
/// let color = RgbColor::new(211, 224, 255);
/// assert_eq!(color.red(), 211);
/// assert_eq!(serde_json::to_string(&color).unwrap(), "[211,224,255]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.red, self.green, self.blue)
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from(channels: [u8; 3]) -> Self {
        Self::new(channels[0], channels[1], channels[2])
    }
}

impl From<RgbColor> for [u8; 3] {
    fn from(color: RgbColor) -> Self {
        [color.red, color.green, color.blue]
    }
}

impl Serialize for RgbColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.red, self.green, self.blue].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let channels = Vec::<u8>::deserialize(deserializer)?;
        match channels.as_slice() {
            [r, g, b] | [r, g, b, _] => Ok(Self::new(*r, *g, *b)),
            other => Err(de::Error::invalid_length(
                other.len(),
                &"3 or 4 color channels",
            )),
        }
    }
}
