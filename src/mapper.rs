// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Weather-to-preset mapping.
//!
//! Pure function, no I/O, no state. Discrete conditions (storms, rain,
//! snow, haze) use fixed effect tuples; Clear and Clouds blend a three-color
//! gradient by where the current temperature sits within the day's range.

use crate::preset::{Preset, Segment};
use crate::types::RgbColor;
use crate::weather::{WeatherCondition, WeatherSnapshot};

/// Palette 0 renders the segment's own `col` entries.
const COLOR_PALETTE: u8 = 0;

/// Maps a weather snapshot to the desired lighting preset.
///
/// Total over all conditions. [`WeatherCondition::Unknown`] yields the
/// empty preset, which callers must treat as "do not send".
///
/// # Examples
///
/// ```
/// use skyled::mapper::preset_for;
/// use skyled::weather::{WeatherCondition, WeatherSnapshot};
///
/// let preset = preset_for(&WeatherSnapshot {
///     condition: WeatherCondition::Rain,
///     temperature: 60.0,
///     temperature_min: 50.0,
///     temperature_max: 70.0,
/// });
/// assert_eq!(preset.segments[0].palette, Some(7));
/// assert_eq!(preset.segments[0].intensity, Some(120));
/// ```
#[must_use]
pub fn preset_for(snapshot: &WeatherSnapshot) -> Preset {
    let segment = match snapshot.condition {
        WeatherCondition::Thunderstorm => effect_segment(7, 43, 255, 255),
        WeatherCondition::Drizzle => effect_segment(7, 43, 255, 55),
        WeatherCondition::Rain => effect_segment(7, 43, 255, 120),
        WeatherCondition::Snow => effect_segment(36, 43, 255, 120),
        WeatherCondition::Atmosphere => effect_segment(4, 2, 100, 110).with_colors(vec![
            RgbColor::new(211, 224, 255),
            RgbColor::new(0, 0, 77),
            RgbColor::new(203, 219, 255),
        ]),
        WeatherCondition::Clear => gradient_segment(CLEAR_RAMPS, snapshot.percentile()),
        WeatherCondition::Clouds => gradient_segment(CLOUDS_RAMPS, snapshot.percentile()),
        WeatherCondition::Unknown => return Preset::empty(),
    };

    Preset::single(segment)
}

fn effect_segment(palette: u8, effect: u8, speed: u8, intensity: u8) -> Segment {
    Segment::new()
        .with_palette(palette)
        .with_effect(effect)
        .with_speed(speed)
        .with_intensity(intensity)
}

/// Per-color channel ramp: `base + span * weight`, where weight is the
/// temperature percentile for the first two channels and its complement
/// for the third.
struct ColorRamp {
    base: [f32; 3],
    span: [f32; 3],
}

const CLEAR_RAMPS: [ColorRamp; 3] = [
    ColorRamp {
        base: [91.0, 161.0, 176.0],
        span: [30.0, 30.0, 30.0],
    },
    ColorRamp {
        base: [220.0, 226.0, 225.0],
        span: [10.0, 10.0, 10.0],
    },
    ColorRamp {
        base: [216.0, 202.0, 174.0],
        span: [30.0, 30.0, 30.0],
    },
];

const CLOUDS_RAMPS: [ColorRamp; 3] = [
    ColorRamp {
        base: [221.0, 231.0, 238.0],
        span: [20.0, 10.0, 10.0],
    },
    ColorRamp {
        base: [57.0, 107.0, 137.0],
        span: [10.0, 10.0, 10.0],
    },
    ColorRamp {
        base: [32.0, 37.0, 71.0],
        span: [30.0, 30.0, 30.0],
    },
];

fn gradient_segment(ramps: [ColorRamp; 3], percentile: f32) -> Segment {
    let colors = ramps
        .iter()
        .map(|ramp| {
            RgbColor::new(
                channel(ramp.base[0], ramp.span[0], percentile),
                channel(ramp.base[1], ramp.span[1], percentile),
                channel(ramp.base[2], ramp.span[2], 1.0 - percentile),
            )
        })
        .collect();

    Segment::new()
        .with_palette(COLOR_PALETTE)
        .with_colors(colors)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(base: f32, span: f32, weight: f32) -> u8 {
    (base + span * weight).round().clamp(0.0, 255.0) as u8
}
