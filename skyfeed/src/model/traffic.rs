//! Observed traffic target records.

use std::time::Instant;

use chrono::{DateTime, Utc};

/// Default squawk code for a target that has not reported one.
pub const DEFAULT_SQUAWK: u32 = 1200;

/// A single observed aircraft, keyed by its ICAO transponder address.
///
/// Created or overwritten whole on each inbound traffic message
/// (last-write-wins, no merge) and evicted once its locally-stamped
/// `observed` age exceeds the registry's staleness threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficRecord {
    /// ICAO 24-bit transponder address. Zero is never stored.
    pub icao: u32,
    /// Whether the reported position is valid.
    pub position_valid: bool,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude in feet.
    pub altitude: f64,
    /// Ground track in degrees [0, 360).
    pub track: f64,
    /// Ground speed in knots, as reported on the wire.
    pub speed: f64,
    /// Vertical speed in feet per minute.
    pub vertical_speed: f64,
    /// Tail/registration string, possibly empty.
    pub tail: String,
    /// Transponder squawk code.
    pub squawk: u32,
    /// Whether the target reports being on the ground.
    pub on_ground: bool,

    /// Timestamp carried on the wire. Some sources report this field
    /// unreliably, so it plays no part in eviction.
    pub timestamp: Option<DateTime<Utc>>,

    /// Bearing from own position in degrees [0, 360).
    ///
    /// Recomputed locally at ingestion when own position is known; until
    /// then it holds the wire-provided value as a fallback only.
    pub bearing: f64,
    /// Distance from own position in nautical miles. Same fallback rule
    /// as `bearing`.
    pub distance_nm: f64,
    /// True when `bearing`/`distance_nm` were computed locally from a
    /// known own position.
    pub relative_valid: bool,

    /// When this target was last actually observed on the feed. Local
    /// clock, used purely for eviction.
    pub observed: Instant,
}

impl TrafficRecord {
    /// A neutral record observed now. Decoders start from this and apply
    /// whatever tags the message carries.
    pub fn empty(now: Instant) -> Self {
        Self {
            icao: 0,
            position_valid: false,
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            track: 0.0,
            speed: 0.0,
            vertical_speed: 0.0,
            tail: String::new(),
            squawk: DEFAULT_SQUAWK,
            on_ground: false,
            timestamp: None,
            bearing: 0.0,
            distance_nm: 0.0,
            relative_valid: false,
            observed: now,
        }
    }

    /// Age of this record against the local observation clock.
    pub fn age(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.observed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_record_defaults() {
        let record = TrafficRecord::empty(Instant::now());
        assert_eq!(record.icao, 0);
        assert_eq!(record.squawk, DEFAULT_SQUAWK);
        assert!(record.timestamp.is_none());
        assert!(!record.relative_valid);
        assert_eq!(record.distance_nm, 0.0);
    }

    #[test]
    fn test_age_uses_observed_stamp() {
        let base = Instant::now();
        let record = TrafficRecord::empty(base);
        assert_eq!(record.age(base + Duration::from_secs(31)), Duration::from_secs(31));
    }

    #[test]
    fn test_age_saturates_for_future_observations() {
        let now = Instant::now();
        let record = TrafficRecord::empty(now + Duration::from_secs(5));
        assert_eq!(record.age(now), Duration::ZERO);
    }
}
