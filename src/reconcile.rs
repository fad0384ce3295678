// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State reconciliation: deciding exactly which fields to send where.
//!
//! For every target controller the reconciler reads the current state,
//! drops desired fields the controller already shows, and transmits the
//! remainder. Reads happen immediately before the diff so the comparison is
//! never against stale state. One device failing never blocks the others.

use crate::device::{DeviceAddress, DeviceState, DeviceTransport, SegmentState, UpdatePayload};
use crate::error::{DeviceError, Error};
use crate::preset::{Preset, Segment};

/// Result of reconciling one device.
#[derive(Debug)]
pub struct DeviceOutcome {
    /// The device this outcome belongs to.
    pub address: DeviceAddress,
    /// The payload that was transmitted.
    pub payload: UpdatePayload,
    /// The controller's response, or the per-device failure.
    pub response: Result<DeviceState, DeviceError>,
}

impl DeviceOutcome {
    /// Returns `true` if the device accepted the update.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.response.is_ok()
    }
}

/// Reconciles a desired preset against the live state of N controllers.
///
/// Holds the ordered target list; order is significant, it pairs 1:1 with
/// the preset's segments when the preset addresses devices individually.
/// A single-segment preset is broadcast to every target.
pub struct DeviceStateReconciler<T> {
    transport: T,
    targets: Vec<DeviceAddress>,
}

impl<T: DeviceTransport> DeviceStateReconciler<T> {
    /// Creates a reconciler over the given transport and target devices.
    #[must_use]
    pub fn new(transport: T, targets: Vec<DeviceAddress>) -> Self {
        Self { transport, targets }
    }

    /// Returns the configured targets in order.
    #[must_use]
    pub fn targets(&self) -> &[DeviceAddress] {
        &self.targets
    }

    /// Computes and transmits per-device updates for `desired`.
    ///
    /// Rules:
    ///
    /// - An empty preset is a no-op cycle: nothing is fetched or sent.
    /// - With `explicit_target` set, only that device is updated and the
    ///   full preset goes out unpruned; the configured target list and the
    ///   diffing step are bypassed. Override path for manual testing.
    /// - Otherwise each target's state is fetched, the desired segment is
    ///   pruned against the controller's primary reported segment, and the
    ///   remainder is sent. A failed fetch downgrades that one device to
    ///   the unpruned segment; a failed send is recorded in its outcome.
    ///
    /// Outcomes are returned in target order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TargetCountMismatch`] before anything is
    /// transmitted when the preset supplies more segments than there are
    /// targets.
    pub async fn reconcile(
        &self,
        desired: &Preset,
        explicit_target: Option<&DeviceAddress>,
    ) -> Result<Vec<DeviceOutcome>, Error> {
        if desired.is_empty() {
            tracing::debug!("empty preset, skipping reconciliation");
            return Ok(Vec::new());
        }

        if let Some(addr) = explicit_target {
            let payload = UpdatePayload::full(desired);
            let response = self.transport.send(addr, &payload).await;
            return Ok(vec![DeviceOutcome {
                address: addr.clone(),
                payload,
                response,
            }]);
        }

        if desired.segments.len() > self.targets.len() {
            return Err(Error::TargetCountMismatch {
                segments: desired.segments.len(),
                targets: self.targets.len(),
            });
        }

        let mut outcomes = Vec::with_capacity(self.targets.len());
        for (index, addr) in self.targets.iter().enumerate() {
            outcomes.push(self.reconcile_device(desired, index, addr).await);
        }

        Ok(outcomes)
    }

    /// Read-then-diff-then-write for a single device.
    async fn reconcile_device(
        &self,
        desired: &Preset,
        index: usize,
        addr: &DeviceAddress,
    ) -> DeviceOutcome {
        let payload = match segment_for(desired, index) {
            None => UpdatePayload::single(desired.power_on, Segment::new()),
            Some(segment) => match self.transport.get_state(addr).await {
                Ok(current) => UpdatePayload::single(
                    desired.power_on,
                    prune(segment, current.segments.first()),
                ),
                Err(err) => {
                    // Cannot diff against unknown state: send everything.
                    tracing::warn!(device = %addr, error = %err, "state fetch failed, sending unpruned update");
                    UpdatePayload::single(desired.power_on, segment.clone())
                }
            },
        };

        let response = self.transport.send(addr, &payload).await;
        if let Err(err) = &response {
            tracing::warn!(device = %addr, error = %err, "update failed");
        }

        DeviceOutcome {
            address: addr.clone(),
            payload,
            response,
        }
    }
}

/// The segment aimed at device `index`: a single-segment preset is
/// broadcast, a multi-segment preset pairs index-wise. Targets beyond the
/// segment list get a power-only update.
fn segment_for(desired: &Preset, index: usize) -> Option<&Segment> {
    if desired.segments.len() == 1 {
        desired.segments.first()
    } else {
        desired.segments.get(index)
    }
}

/// Drops every desired field the controller already reports.
///
/// Absent desired fields stay absent. With no reported segment to compare
/// against, the desired segment goes out as-is.
fn prune(desired: &Segment, current: Option<&SegmentState>) -> Segment {
    let Some(current) = current else {
        return desired.clone();
    };

    Segment {
        palette: desired.palette.filter(|p| *p != current.palette),
        effect: desired.effect.filter(|f| *f != current.effect),
        speed: desired.speed.filter(|s| *s != current.speed),
        intensity: desired.intensity.filter(|i| *i != current.intensity),
        colors: desired
            .colors
            .clone()
            .filter(|cols| current.colors.get(..cols.len()) != Some(cols.as_slice())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use crate::types::RgbColor;

    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory transport: canned states per address, recorded sends.
    #[derive(Default)]
    struct MockTransport {
        states: HashMap<DeviceAddress, DeviceState>,
        unreachable: Vec<DeviceAddress>,
        send_fails: Vec<DeviceAddress>,
        sent: Mutex<Vec<(DeviceAddress, UpdatePayload)>>,
    }

    impl MockTransport {
        fn with_state(mut self, addr: &DeviceAddress, state: DeviceState) -> Self {
            self.states.insert(addr.clone(), state);
            self
        }

        fn with_unreachable(mut self, addr: &DeviceAddress) -> Self {
            self.unreachable.push(addr.clone());
            self
        }

        fn with_send_failure(mut self, addr: &DeviceAddress) -> Self {
            self.send_fails.push(addr.clone());
            self
        }

        fn sent(&self) -> Vec<(DeviceAddress, UpdatePayload)> {
            self.sent.lock().unwrap().clone()
        }
    }

    fn unreachable() -> DeviceError {
        DeviceError::Unreachable(ProtocolError::ConnectionFailed("HTTP 503".to_string()))
    }

    impl DeviceTransport for MockTransport {
        async fn get_state(&self, addr: &DeviceAddress) -> Result<DeviceState, DeviceError> {
            if self.unreachable.contains(addr) {
                return Err(unreachable());
            }
            self.states.get(addr).cloned().ok_or_else(unreachable)
        }

        async fn send(
            &self,
            addr: &DeviceAddress,
            payload: &UpdatePayload,
        ) -> Result<DeviceState, DeviceError> {
            if self.send_fails.contains(addr) {
                return Err(unreachable());
            }
            self.sent.lock().unwrap().push((addr.clone(), payload.clone()));
            Ok(DeviceState {
                power_on: payload.power_on,
                segments: Vec::new(),
            })
        }
    }

    fn reported(palette: u8, effect: u8, speed: u8, intensity: u8) -> DeviceState {
        DeviceState {
            power_on: true,
            segments: vec![SegmentState {
                palette,
                effect,
                speed,
                intensity,
                colors: vec![RgbColor::new(0, 0, 0); 3],
            }],
        }
    }

    fn rain_preset() -> Preset {
        Preset::single(
            Segment::new()
                .with_palette(7)
                .with_effect(43)
                .with_speed(255)
                .with_intensity(120),
        )
    }

    #[tokio::test]
    async fn equal_fields_are_pruned_unequal_kept() {
        let addr = DeviceAddress::new("one");
        // Speed already matches; palette differs.
        let transport = MockTransport::default().with_state(&addr, reported(0, 43, 255, 5));
        let reconciler = DeviceStateReconciler::new(transport, vec![addr]);

        let outcomes = reconciler.reconcile(&rain_preset(), None).await.unwrap();
        let segment = &outcomes[0].payload.segments[0];
        assert_eq!(segment.palette, Some(7));
        assert_eq!(segment.effect, None);
        assert_eq!(segment.speed, None);
        assert_eq!(segment.intensity, Some(120));
    }

    #[tokio::test]
    async fn rain_scenario_two_devices() {
        let device0 = DeviceAddress::new("zero");
        let device1 = DeviceAddress::new("one");
        let transport = MockTransport::default()
            .with_state(&device0, reported(7, 43, 255, 120))
            .with_state(&device1, reported(0, 0, 0, 0));
        let reconciler =
            DeviceStateReconciler::new(transport, vec![device0.clone(), device1.clone()]);

        let outcomes = reconciler.reconcile(&rain_preset(), None).await.unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].address, device0);

        // Device 0 already matches: power-only payload.
        assert!(outcomes[0].payload.segments.is_empty());
        assert_eq!(
            serde_json::to_string(&outcomes[0].payload).unwrap(),
            r#"{"v":true}"#
        );

        // Device 1 gets every field.
        assert_eq!(
            serde_json::to_string(&outcomes[1].payload).unwrap(),
            r#"{"v":true,"seg":[{"pal":7,"fx":43,"sx":255,"ix":120}]}"#
        );
    }

    #[tokio::test]
    async fn segment_overflow_transmits_nothing() {
        let addr = DeviceAddress::new("only");
        let transport = MockTransport::default().with_state(&addr, reported(0, 0, 0, 0));
        let reconciler = DeviceStateReconciler::new(transport, vec![addr]);

        let desired = Preset {
            power_on: true,
            segments: vec![Segment::new().with_palette(1), Segment::new().with_palette(2)],
        };

        let err = reconciler.reconcile(&desired, None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::TargetCountMismatch {
                segments: 2,
                targets: 1
            }
        ));
        assert!(reconciler.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn explicit_target_bypasses_diffing() {
        let addr = DeviceAddress::new("bench");
        // Device already shows exactly the desired state.
        let transport = MockTransport::default().with_state(&addr, reported(7, 43, 255, 120));
        let reconciler = DeviceStateReconciler::new(transport, Vec::new());

        let outcomes = reconciler
            .reconcile(&rain_preset(), Some(&addr))
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        let segment = &outcomes[0].payload.segments[0];
        assert_eq!(segment.palette, Some(7));
        assert_eq!(segment.intensity, Some(120));
    }

    #[tokio::test]
    async fn fetch_failure_falls_back_to_unpruned() {
        let reachable = DeviceAddress::new("fine");
        let dark = DeviceAddress::new("dark");
        let transport = MockTransport::default()
            .with_state(&reachable, reported(7, 43, 255, 120))
            .with_unreachable(&dark);
        let reconciler =
            DeviceStateReconciler::new(transport, vec![reachable.clone(), dark.clone()]);

        let outcomes = reconciler.reconcile(&rain_preset(), None).await.unwrap();

        // Sibling is unaffected and fully pruned.
        assert!(outcomes[0].payload.segments.is_empty());
        // Unreachable device gets the whole desired segment.
        assert_eq!(outcomes[1].payload.segments[0].palette, Some(7));
        assert_eq!(outcomes[1].payload.segments[0].speed, Some(255));
        assert!(outcomes[1].is_ok());
    }

    #[tokio::test]
    async fn send_failure_recorded_without_blocking_siblings() {
        let flaky = DeviceAddress::new("flaky");
        let healthy = DeviceAddress::new("healthy");
        let transport = MockTransport::default()
            .with_state(&flaky, reported(0, 0, 0, 0))
            .with_state(&healthy, reported(0, 0, 0, 0))
            .with_send_failure(&flaky);
        let reconciler =
            DeviceStateReconciler::new(transport, vec![flaky.clone(), healthy.clone()]);

        let outcomes = reconciler.reconcile(&rain_preset(), None).await.unwrap();
        assert!(!outcomes[0].is_ok());
        assert!(outcomes[1].is_ok());
        assert_eq!(reconciler.transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn empty_preset_is_a_noop_cycle() {
        let addr = DeviceAddress::new("idle");
        let transport = MockTransport::default().with_state(&addr, reported(0, 0, 0, 0));
        let reconciler = DeviceStateReconciler::new(transport, vec![addr]);

        let outcomes = reconciler.reconcile(&Preset::empty(), None).await.unwrap();
        assert!(outcomes.is_empty());
        assert!(reconciler.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn color_prune_ignores_trailing_reported_colors() {
        let addr = DeviceAddress::new("rgbw");
        let state = DeviceState {
            power_on: true,
            segments: vec![SegmentState {
                palette: 0,
                effect: 0,
                speed: 0,
                intensity: 0,
                colors: vec![
                    RgbColor::new(1, 2, 3),
                    RgbColor::new(4, 5, 6),
                    RgbColor::new(7, 8, 9),
                ],
            }],
        };
        let transport = MockTransport::default().with_state(&addr, state);
        let reconciler = DeviceStateReconciler::new(transport, vec![addr]);

        let matching = Preset::single(
            Segment::new().with_colors(vec![RgbColor::new(1, 2, 3), RgbColor::new(4, 5, 6)]),
        );
        let outcomes = reconciler.reconcile(&matching, None).await.unwrap();
        assert!(outcomes[0].payload.segments.is_empty());

        let differing =
            Preset::single(Segment::new().with_colors(vec![RgbColor::new(9, 9, 9)]));
        let outcomes = reconciler.reconcile(&differing, None).await.unwrap();
        assert!(outcomes[0].payload.segments[0].colors.is_some());
    }
}
