//! Traffic stream decoder.

use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::model::TrafficRecord;

use super::tagged::{apply_tagged, set_bool, set_f64, set_u32, Setter};

/// Conversion factor: meters to nautical miles.
const METERS_TO_NM: f64 = 0.000_539_957;

/// Recognized traffic tags.
///
/// `Bearing` and `Distance` are the host unit's own relative geometry;
/// they are kept only as a fallback and recomputed locally from own
/// position at ingestion whenever possible.
const TRAFFIC_TABLE: &[(&str, Setter<TrafficRecord>)] = &[
    ("Icao_addr", |t, v| set_u32(&mut t.icao, v)),
    ("Position_valid", |t, v| set_bool(&mut t.position_valid, v)),
    ("Lat", |t, v| set_f64(&mut t.latitude, v)),
    ("Lng", |t, v| set_f64(&mut t.longitude, v)),
    ("Alt", |t, v| set_f64(&mut t.altitude, v)),
    ("Track", |t, v| set_f64(&mut t.track, v)),
    ("Speed", |t, v| set_f64(&mut t.speed, v)),
    ("Vvel", |t, v| set_f64(&mut t.vertical_speed, v)),
    ("Tail", |t, v| t.tail = v.to_string()),
    ("Squawk", |t, v| set_u32(&mut t.squawk, v)),
    ("OnGround", |t, v| set_bool(&mut t.on_ground, v)),
    ("Timestamp", |t, v| {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(v) {
            t.timestamp = Some(parsed.with_timezone(&Utc));
        }
    }),
    ("Bearing", |t, v| set_f64(&mut t.bearing, v)),
    // Wire distance arrives in meters.
    ("Distance", |t, v| {
        let mut meters = f64::NAN;
        set_f64(&mut meters, v);
        if meters.is_finite() {
            t.distance_nm = meters * METERS_TO_NM;
        }
    }),
];

/// Decode one traffic message.
///
/// The returned record is stamped `observed = now` for eviction; the
/// wire-provided `Timestamp` is retained separately because some sources
/// report it unreliably. The record may carry ICAO 0, which callers must
/// reject before insertion.
pub fn decode_traffic(payload: &str, now: Instant) -> TrafficRecord {
    let mut record = TrafficRecord::empty(now);
    apply_tagged(payload, &mut record, TRAFFIC_TABLE);
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_SQUAWK;

    #[test]
    fn test_decode_full_record() {
        let record = decode_traffic(
            r#"{"Icao_addr":10893353,"Position_valid":true,"Lat":53.71,"Lng":10.02,"Alt":4500,"Track":215,"Speed":132,"Vvel":-640,"Tail":"DEABC","Squawk":4521,"OnGround":false,"Timestamp":"2026-08-30T10:15:00Z","Bearing":88.5,"Distance":9260.0}"#,
            Instant::now(),
        );

        assert_eq!(record.icao, 10893353);
        assert!(record.position_valid);
        assert!((record.latitude - 53.71).abs() < 1e-9);
        assert!((record.altitude - 4500.0).abs() < 1e-9);
        assert_eq!(record.tail, "DEABC");
        assert_eq!(record.squawk, 4521);
        assert!(!record.on_ground);
        assert!(record.timestamp.is_some());
        assert!((record.bearing - 88.5).abs() < 1e-9);
    }

    #[test]
    fn test_distance_converted_meters_to_nm() {
        let record =
            decode_traffic(r#"{"Icao_addr":1,"Distance":1852.0}"#, Instant::now());
        assert!(
            (record.distance_nm - 1.000_000_364).abs() < 1e-6,
            "1852 m should be ~1 NM, got {}",
            record.distance_nm
        );
    }

    #[test]
    fn test_defaults_for_absent_tags() {
        let record = decode_traffic(r#"{"Icao_addr":42}"#, Instant::now());
        assert_eq!(record.squawk, DEFAULT_SQUAWK);
        assert!(record.timestamp.is_none());
        assert!(!record.position_valid);
        assert!(!record.relative_valid);
        assert_eq!(record.distance_nm, 0.0);
    }

    #[test]
    fn test_missing_icao_decodes_to_zero() {
        // Callers reject these before insertion.
        let record = decode_traffic(r#"{"Lat":53.0,"Lng":10.0}"#, Instant::now());
        assert_eq!(record.icao, 0);
    }

    #[test]
    fn test_bad_timestamp_left_as_none() {
        let record = decode_traffic(
            r#"{"Icao_addr":7,"Timestamp":"not-a-timestamp"}"#,
            Instant::now(),
        );
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn test_malformed_fragment_does_not_poison_message() {
        let record = decode_traffic(
            r#"{"Icao_addr":9,oops,"Tail":"N1234"}"#,
            Instant::now(),
        );
        assert_eq!(record.icao, 9);
        assert_eq!(record.tail, "N1234");
    }
}
