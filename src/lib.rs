// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `skyled` - weather-driven lighting for WLED controllers.
//!
//! This library polls a weather service, derives a lighting preset from the
//! current conditions, and pushes it to one or more WLED controllers -
//! transmitting only the attributes that actually change.
//!
//! # How a cycle works
//!
//! 1. A [`WeatherSource`](weather::WeatherSource) produces a
//!    [`WeatherSnapshot`](weather::WeatherSnapshot).
//! 2. [`preset_for`](mapper::preset_for) maps the snapshot to a
//!    [`Preset`](preset::Preset): storm conditions get fixed effects, clear
//!    and cloudy skies get a color gradient interpolated by where the
//!    temperature sits in the day's range.
//! 3. The [`DeviceStateReconciler`](reconcile::DeviceStateReconciler) reads
//!    each controller's live state and sends only the fields that differ.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use skyled::device::{DeviceAddress, WledClient};
//! use skyled::pipeline::Pipeline;
//! use skyled::reconcile::DeviceStateReconciler;
//! use skyled::weather::OpenWeatherClient;
//!
//! #[tokio::main]
//! async fn main() -> skyled::Result<()> {
//!     let weather = OpenWeatherClient::new("12345", "api-key")?;
//!     let reconciler = DeviceStateReconciler::new(
//!         WledClient::new()?,
//!         vec![DeviceAddress::new("192.168.1.40")],
//!     );
//!
//!     let pipeline = Pipeline::new(weather, reconciler, Duration::from_secs(60));
//!     pipeline.run().await;
//!     Ok(())
//! }
//! ```
//!
//! # One-off updates
//!
//! An explicit target bypasses diffing and pushes the full preset, which is
//! handy when pointing a preset at a bench device:
//!
//! ```no_run
//! use skyled::device::{DeviceAddress, WledClient};
//! use skyled::mapper::preset_for;
//! use skyled::reconcile::DeviceStateReconciler;
//! use skyled::weather::{WeatherCondition, WeatherSnapshot};
//!
//! # async fn example() -> skyled::Result<()> {
//! let reconciler = DeviceStateReconciler::new(WledClient::new()?, Vec::new());
//! let preset = preset_for(&WeatherSnapshot {
//!     condition: WeatherCondition::Thunderstorm,
//!     temperature: 60.0,
//!     temperature_min: 50.0,
//!     temperature_max: 70.0,
//! });
//! reconciler
//!     .reconcile(&preset, Some(&DeviceAddress::new("192.168.1.40")))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod mapper;
pub mod pipeline;
pub mod preset;
pub mod reconcile;
pub mod types;
pub mod weather;

pub use config::BridgeConfig;
pub use device::{DeviceAddress, DeviceState, DeviceTransport, UpdatePayload, WledClient};
pub use error::{ConfigError, DeviceError, Error, ParseError, ProtocolError, Result, WeatherError};
pub use mapper::preset_for;
pub use pipeline::{CycleOutcome, Pipeline};
pub use preset::{Preset, Segment};
pub use reconcile::{DeviceOutcome, DeviceStateReconciler};
pub use types::RgbColor;
pub use weather::{OpenWeatherClient, WeatherCondition, WeatherSnapshot, WeatherSource};
