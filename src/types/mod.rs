// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the library.
//!
//! # Types
//!
//! - [`RgbColor`] - RGB color with 8-bit channels, serialized as a
//!   `[r, g, b]` JSON array the way WLED expects segment colors

mod rgb_color;

pub use rgb_color::RgbColor;
