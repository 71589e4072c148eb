//! Message handlers and state for one feed session.
//!
//! `FeedCore` is the single owner of all mutable telemetry state. Handlers
//! are short and non-blocking: each takes one payload plus an explicit
//! `now`, mutates state, and returns at most one outbound event. The
//! session manager serializes handler calls and the periodic tick on one
//! task, so no handler ever observes a half-updated record.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::calibration::SharedCalibration;
use crate::fusion::fuse;
use crate::geo::{self, normalize_degrees};
use crate::model::{SensorTelemetry, SituationSnapshot, StatusFlags, StatusReport, TrafficRecord};
use crate::smoothing::AttitudeFilter;
use crate::traffic::TrafficRegistry;
use crate::wire::{decode_sensor_frame, decode_situation, decode_status, decode_traffic};

use super::events::FeedEvent;

/// Maximum age of the last host situation message for the host's own
/// attitude channels to count as a healthy attitude source.
const HOST_ATTITUDE_LIVENESS: Duration = Duration::from_secs(10);

/// All mutable telemetry state for one session.
pub struct FeedCore {
    calibration: SharedCalibration,

    /// Last host-decoded situation, pre-fusion.
    host_situation: SituationSnapshot,
    /// Last published (fused) situation.
    published: SituationSnapshot,
    /// Cached own position; input to all relative geometry.
    own_position: Option<(f64, f64)>,
    last_situation: Option<Instant>,

    sensor: SensorTelemetry,
    filter: AttitudeFilter,

    registry: TrafficRegistry,

    last_report: StatusReport,
    last_status: Option<Instant>,
}

impl FeedCore {
    pub fn new(calibration: SharedCalibration) -> Self {
        Self {
            calibration,
            host_situation: SituationSnapshot::default(),
            published: SituationSnapshot::default(),
            own_position: None,
            last_situation: None,
            sensor: SensorTelemetry::default(),
            filter: AttitudeFilter::new(),
            registry: TrafficRegistry::new(),
            last_report: StatusReport::default(),
            last_status: None,
        }
    }

    /// Reset the watchdog clock at connection time so a fresh session is
    /// not torn down before the first status message can arrive.
    pub fn note_connected(&mut self, now: Instant) {
        self.last_status = Some(now);
    }

    /// Handle one situation message; always publishes a fresh snapshot.
    pub fn handle_situation(&mut self, payload: &str, now: Instant) -> FeedEvent {
        let host = decode_situation(payload, &self.calibration.get());

        // (0, 0) means "no fix"; record no position rather than caching it.
        self.own_position = host.position();
        self.host_situation = host;
        self.last_situation = Some(now);

        self.published = fuse(&self.host_situation, &self.sensor, self.sensor.is_live(now));
        FeedEvent::Situation(self.published.clone())
    }

    /// Handle one sensor datagram.
    ///
    /// A datagram with the wrong arity is a no-op: no state mutated, no
    /// event published. A valid one refreshes the sensor record and
    /// republishes the fused situation with the sensor authoritative.
    pub fn handle_sensor(&mut self, line: &str, now: Instant) -> Option<FeedEvent> {
        let frame = decode_sensor_frame(line, &self.calibration.get())?;

        self.calibration.take_level_request(frame.pitch, frame.roll);
        let calibration = self.calibration.get();

        let smoothed = self
            .filter
            .push(frame.airspeed, frame.pitch, frame.roll, frame.heading);

        let sensor = &mut self.sensor;
        sensor.firmware = frame.firmware;
        sensor.raw_airspeed = frame.airspeed;
        sensor.altitude = frame.altitude;
        sensor.temperature_c = frame.temperature_c;
        sensor.mag = frame.mag;
        sensor.raw_heading = frame.heading;
        sensor.raw_pitch = frame.pitch;
        sensor.raw_roll = frame.roll;
        sensor.accel = frame.accel;

        // Published channels use the window mean once it exists; until the
        // window fills the raw sample stands in so early frames still
        // produce usable attitude.
        sensor.airspeed = smoothed.airspeed.unwrap_or(frame.airspeed);
        sensor.pitch = smoothed.pitch.unwrap_or(frame.pitch) - calibration.zero_pitch;
        sensor.roll = smoothed.roll.unwrap_or(frame.roll) - calibration.zero_roll;
        sensor.heading = normalize_degrees(smoothed.heading.unwrap_or(frame.heading));
        sensor.last_update = Some(now);

        self.published = fuse(&self.host_situation, &self.sensor, true);
        Some(FeedEvent::Situation(self.published.clone()))
    }

    /// Handle one traffic message.
    ///
    /// Runs a proactive eviction pass, rejects targets without an ICAO
    /// address, and recomputes relative geometry from own position when
    /// available (the wire-provided bearing/distance stay as fallback).
    pub fn handle_traffic(&mut self, payload: &str, now: Instant) -> Option<FeedEvent> {
        self.registry.evict_stale(now);

        let mut record = decode_traffic(payload, now);
        if record.icao == 0 {
            trace!("traffic message without ICAO address ignored");
            return None;
        }

        if let Some((own_lat, own_lon)) = self.own_position {
            if record.position_valid {
                let (bearing, distance_nm) =
                    geo::bearing_distance(own_lat, own_lon, record.latitude, record.longitude);
                record.bearing = bearing;
                record.distance_nm = distance_nm;
                record.relative_valid = true;
            }
        }

        self.registry.upsert(record.clone());
        Some(FeedEvent::Traffic(record.icao, record))
    }

    /// Handle one status message; recomputes and republishes the flags.
    pub fn handle_status(&mut self, payload: &str, now: Instant) -> FeedEvent {
        self.last_report = decode_status(payload);
        self.last_status = Some(now);
        FeedEvent::Status(self.derive_flags(now))
    }

    /// Periodic tick: age out stale traffic.
    pub fn tick(&mut self, now: Instant) {
        self.registry.evict_stale(now);
    }

    /// Time since the last status message (or connection), for the
    /// watchdog.
    pub fn status_silence(&self, now: Instant) -> Duration {
        self.last_status
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or(Duration::MAX)
    }

    /// Last published situation.
    pub fn situation(&self) -> &SituationSnapshot {
        &self.published
    }

    /// Copy of the current traffic registry, ordered by ICAO.
    pub fn traffic_snapshot(&self) -> Vec<TrafficRecord> {
        self.registry.snapshot()
    }

    pub fn traffic_len(&self) -> usize {
        self.registry.len()
    }

    pub fn own_position(&self) -> Option<(f64, f64)> {
        self.own_position
    }

    fn derive_flags(&self, now: Instant) -> StatusFlags {
        let host_attitude_fresh = self
            .last_situation
            .map(|at| now.saturating_duration_since(at) <= HOST_ATTITUDE_LIVENESS)
            .unwrap_or(false);

        StatusFlags {
            host_reachable: true,
            attitude_ok: self.sensor.is_live(now) || host_attitude_fresh,
            // Position unknown overrides connectivity.
            gps_ok: self.last_report.gps_connected && self.own_position.is_some(),
            traffic_ok: self.last_report.uat_messages + self.last_report.es_messages > 0,
        }
    }
}
