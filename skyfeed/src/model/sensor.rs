//! Rolling attitude/airspeed sensor telemetry.

use std::time::{Duration, Instant};

/// Maximum silence before the sensor is considered stale and fusion falls
/// back entirely to host-unit data.
pub const SENSOR_LIVENESS: Duration = Duration::from_secs(10);

/// Rolling record of the auxiliary attitude/airspeed sensor.
///
/// Raw channels hold the latest decoded datagram values; published
/// channels hold the smoothed, zero-referenced values fusion actually
/// trusts. The record is mutated in place on every datagram, so it carries
/// its own liveness stamp rather than being rebuilt per message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorTelemetry {
    /// Firmware version string reported by the sensor.
    pub firmware: String,

    /// Latest calibrated airspeed sample, pre-smoothing.
    pub raw_airspeed: f64,
    /// Smoothed airspeed in the configured display units.
    pub airspeed: f64,

    /// Pressure altitude in feet.
    pub altitude: f64,
    /// Outside air temperature in degrees Celsius.
    pub temperature_c: f64,

    /// Raw magnetometer vector.
    pub mag: [f64; 3],
    /// Latest magnetometer-derived heading sample, un-normalized.
    pub raw_heading: f64,
    /// Smoothed heading in degrees [0, 360).
    pub heading: f64,

    /// Latest pitch sample in degrees, before the zero reference.
    pub raw_pitch: f64,
    /// Smoothed pitch relative to the captured level attitude.
    pub pitch: f64,

    /// Latest roll sample in degrees, before the zero reference.
    pub raw_roll: f64,
    /// Smoothed roll relative to the captured level attitude.
    pub roll: f64,

    /// Accelerometer vector in G: longitudinal, lateral, vertical.
    pub accel: [f64; 3],

    /// When the last datagram was decoded. `None` until the first one.
    pub last_update: Option<Instant>,
}

impl SensorTelemetry {
    /// Whether a datagram arrived within the liveness window.
    pub fn is_live(&self, now: Instant) -> bool {
        match self.last_update {
            Some(at) => now.saturating_duration_since(at) <= SENSOR_LIVENESS,
            None => false,
        }
    }

    /// Slip/skid indication: the lateral accelerometer channel in G.
    pub fn slip_skid(&self) -> f64 {
        self.accel[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_updated_is_not_live() {
        let sensor = SensorTelemetry::default();
        assert!(!sensor.is_live(Instant::now()));
    }

    #[test]
    fn test_liveness_window_boundary() {
        let base = Instant::now();
        let sensor = SensorTelemetry {
            last_update: Some(base),
            ..Default::default()
        };

        assert!(sensor.is_live(base + Duration::from_secs(10)));
        assert!(!sensor.is_live(base + Duration::from_secs(11)));
    }

    #[test]
    fn test_slip_skid_is_lateral_accel() {
        let sensor = SensorTelemetry {
            accel: [0.02, -0.15, 0.98],
            ..Default::default()
        };
        assert_eq!(sensor.slip_skid(), -0.15);
    }
}
