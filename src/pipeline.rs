// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The weather-to-lights poll loop.
//!
//! One cycle per interval: fetch weather, map to a preset, reconcile. A
//! cycle that outlives the interval is abandoned rather than queued, so
//! in-flight requests from a slow cycle never interleave with the next one.

use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::device::DeviceTransport;
use crate::error::Error;
use crate::mapper::preset_for;
use crate::reconcile::{DeviceOutcome, DeviceStateReconciler};
use crate::weather::WeatherSource;

/// What a single poll cycle did.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The mapper had no preset for the current condition; nothing sent.
    Skipped,
    /// Updates were reconciled, one outcome per target device.
    Applied(Vec<DeviceOutcome>),
}

/// Weather-driven lighting pipeline.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use skyled::device::{DeviceAddress, WledClient};
/// use skyled::pipeline::Pipeline;
/// use skyled::reconcile::DeviceStateReconciler;
/// use skyled::weather::OpenWeatherClient;
///
/// # async fn example() -> skyled::Result<()> {
/// let weather = OpenWeatherClient::new("12345", "api-key")?;
/// let reconciler = DeviceStateReconciler::new(
///     WledClient::new()?,
///     vec![DeviceAddress::new("192.168.1.40")],
/// );
/// let pipeline = Pipeline::new(weather, reconciler, Duration::from_secs(60));
/// pipeline.run().await;
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<W, T> {
    weather: W,
    reconciler: DeviceStateReconciler<T>,
    interval: Duration,
}

impl<W: WeatherSource, T: DeviceTransport> Pipeline<W, T> {
    /// Creates a pipeline polling at the given interval.
    #[must_use]
    pub fn new(weather: W, reconciler: DeviceStateReconciler<T>, interval: Duration) -> Self {
        Self {
            weather,
            reconciler,
            interval,
        }
    }

    /// Runs one poll cycle: fetch weather, map, reconcile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WeatherUnavailable`] if the upstream fetch fails
    /// (the cycle is skipped before any preset is computed), or
    /// [`Error::TargetCountMismatch`] from reconciliation.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, Error> {
        let snapshot = self
            .weather
            .fetch()
            .await
            .map_err(Error::WeatherUnavailable)?;

        tracing::debug!(
            condition = %snapshot.condition,
            temperature = snapshot.temperature,
            "weather snapshot"
        );

        let preset = preset_for(&snapshot);
        if preset.is_empty() {
            tracing::debug!(condition = %snapshot.condition, "no preset for condition");
            return Ok(CycleOutcome::Skipped);
        }

        let outcomes = self.reconciler.reconcile(&preset, None).await?;
        Ok(CycleOutcome::Applied(outcomes))
    }

    /// Runs cycles forever at the configured interval.
    ///
    /// Failed cycles are logged and the loop continues; a cycle still
    /// running when the next tick is due is abandoned.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match tokio::time::timeout(self.interval, self.run_cycle()).await {
                Err(_) => {
                    tracing::warn!("cycle exceeded poll interval, abandoned");
                }
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "cycle failed");
                }
                Ok(Ok(CycleOutcome::Skipped)) => {}
                Ok(Ok(CycleOutcome::Applied(outcomes))) => {
                    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
                    tracing::info!(
                        devices = outcomes.len(),
                        failed,
                        "cycle applied"
                    );
                }
            }
        }
    }
}
