// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WLED JSON API transport.

use std::time::Duration;

use reqwest::Client;

use crate::error::{DeviceError, ParseError, ProtocolError};

use super::{DeviceAddress, DeviceState, DeviceTransport, UpdatePayload};

/// HTTP client for the WLED `/json/state` endpoint.
///
/// One client serves any number of controllers; the underlying connection
/// pool is safe for concurrent use across device calls.
///
/// # Examples
///
/// ```no_run
/// use skyled::device::{DeviceAddress, DeviceTransport, WledClient};
///
/// # async fn example() -> skyled::Result<()> {
/// let client = WledClient::new()?;
/// let state = client.get_state(&DeviceAddress::new("192.168.1.40")).await
///     .map_err(skyled::Error::Device)?;
/// println!("lights on: {}", state.power_on);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WledClient {
    client: Client,
}

impl WledClient {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, ProtocolError> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Creates a new client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProtocolError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self { client })
    }

    fn state_url(addr: &DeviceAddress) -> String {
        let host = addr.as_str();
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}/json/state")
        } else {
            format!("http://{host}/json/state")
        }
    }

    async fn parse_state(response: reqwest::Response) -> Result<DeviceState, DeviceError> {
        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            ))
            .into());
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "received device state");

        let state = serde_json::from_str(&body).map_err(ParseError::Json)?;
        Ok(state)
    }
}

impl DeviceTransport for WledClient {
    async fn get_state(&self, addr: &DeviceAddress) -> Result<DeviceState, DeviceError> {
        let url = Self::state_url(addr);

        tracing::debug!(url = %url, "fetching device state");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        Self::parse_state(response).await
    }

    async fn send(
        &self,
        addr: &DeviceAddress,
        payload: &UpdatePayload,
    ) -> Result<DeviceState, DeviceError> {
        let url = Self::state_url(addr);

        tracing::debug!(url = %url, payload = %serde_json::to_string(payload).unwrap_or_default(), "sending update");

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        Self::parse_state(response).await
    }
}
