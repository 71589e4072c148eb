//! Sensor fusion: merging host-unit situation data with the attitude
//! sensor.
//!
//! The precedence rule lives in one explicit merge function so it can be
//! tested as a table: when the sensor is live its calibrated channels
//! override the host's attitude/airspeed channels; GPS-derived fields
//! always come from the host unit, which is the only source with a GPS.

use crate::geo::normalize_degrees;
use crate::model::{SensorTelemetry, SituationSnapshot};

/// Merge one host snapshot with the current sensor telemetry.
///
/// With `sensor_live` set, the snapshot's airspeed, magnetic heading,
/// barometric altitude, temperature, slip/skid, pitch and roll are
/// replaced by the sensor's published (smoothed, zero-referenced) values
/// and the result is flagged sensor-authoritative. Position, ground
/// speed/track and vertical speed pass through from the host either way.
/// Headings are wrapped to [0, 360) after the merge.
pub fn fuse(
    host: &SituationSnapshot,
    sensor: &SensorTelemetry,
    sensor_live: bool,
) -> SituationSnapshot {
    let mut fused = host.clone();

    if sensor_live {
        fused.airspeed = sensor.airspeed;
        fused.mag_heading = sensor.heading;
        fused.baro_altitude = sensor.altitude;
        fused.temperature_c = sensor.temperature_c;
        fused.slip_skid = sensor.slip_skid();
        fused.pitch = sensor.pitch;
        fused.roll = sensor.roll;
    }
    fused.sensor_authoritative = sensor_live;

    fused.mag_heading = normalize_degrees(fused.mag_heading);
    fused.gyro_heading = normalize_degrees(fused.gyro_heading);

    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> SituationSnapshot {
        SituationSnapshot {
            latitude: 53.5,
            longitude: 10.0,
            mag_heading: 10.0,
            gyro_heading: 12.0,
            baro_altitude: 2400.0,
            vertical_speed: -300.0,
            ground_speed: 95.0,
            true_course: 14.0,
            airspeed: 100.0,
            pitch: 1.0,
            roll: -1.0,
            slip_skid: 0.1,
            temperature_c: 9.0,
            ..Default::default()
        }
    }

    fn sensor() -> SensorTelemetry {
        SensorTelemetry {
            airspeed: 104.0,
            heading: 350.0,
            altitude: 2480.0,
            temperature_c: 11.0,
            pitch: 2.5,
            roll: -3.0,
            accel: [0.0, -0.2, 1.0],
            ..Default::default()
        }
    }

    #[test]
    fn test_live_sensor_overrides_attitude_channels() {
        let fused = fuse(&host(), &sensor(), true);

        assert_eq!(fused.airspeed, 104.0);
        assert_eq!(fused.mag_heading, 350.0);
        assert_eq!(fused.baro_altitude, 2480.0);
        assert_eq!(fused.temperature_c, 11.0);
        assert_eq!(fused.slip_skid, -0.2);
        assert_eq!(fused.pitch, 2.5);
        assert_eq!(fused.roll, -3.0);
        assert!(fused.sensor_authoritative);
    }

    #[test]
    fn test_gps_fields_always_come_from_host() {
        let fused = fuse(&host(), &sensor(), true);

        assert_eq!(fused.latitude, 53.5);
        assert_eq!(fused.longitude, 10.0);
        assert_eq!(fused.ground_speed, 95.0);
        assert_eq!(fused.true_course, 14.0);
        assert_eq!(fused.vertical_speed, -300.0);
    }

    #[test]
    fn test_stale_sensor_passes_host_through() {
        let fused = fuse(&host(), &sensor(), false);

        assert_eq!(fused.airspeed, 100.0);
        assert_eq!(fused.mag_heading, 10.0);
        assert_eq!(fused.baro_altitude, 2400.0);
        assert_eq!(fused.pitch, 1.0);
        assert!(!fused.sensor_authoritative);
    }

    #[test]
    fn test_headings_wrapped_after_fusion() {
        let mut noisy_sensor = sensor();
        noisy_sensor.heading = -10.0;
        let fused = fuse(&host(), &noisy_sensor, true);
        assert_eq!(fused.mag_heading, 350.0);

        let mut wrapped_host = host();
        wrapped_host.gyro_heading = 372.0;
        let fused = fuse(&wrapped_host, &sensor(), false);
        assert_eq!(fused.gyro_heading, 12.0);
    }
}
