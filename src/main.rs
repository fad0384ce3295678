// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge daemon: wires configuration, clients, and the poll loop.

use tracing_subscriber::EnvFilter;

use skyled::device::WledClient;
use skyled::pipeline::Pipeline;
use skyled::reconcile::DeviceStateReconciler;
use skyled::weather::OpenWeatherClient;
use skyled::BridgeConfig;

#[tokio::main]
async fn main() -> skyled::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skyled=info")),
        )
        .init();

    let config = BridgeConfig::from_env()?;

    tracing::info!(
        devices = config.devices.len(),
        zip = %config.zip_code,
        interval_secs = config.poll_interval.as_secs(),
        "starting weather-to-lights bridge"
    );

    let weather = OpenWeatherClient::new(&config.zip_code, &config.api_key)?;
    let reconciler = DeviceStateReconciler::new(WledClient::new()?, config.devices);
    let pipeline = Pipeline::new(weather, reconciler, config.poll_interval);

    pipeline.run().await;
    Ok(())
}
