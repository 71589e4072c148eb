//! Attitude sensor datagram codec.
//!
//! Inbound: a fixed 13-field comma-separated numeric line. The sensor
//! sits on an unreliable local network, so anything with the wrong arity
//! or an unparseable numeric field is discarded whole; no partial record
//! is ever published. Outbound: a small ASCII datagram echoing the
//! current barometric pressure setting back to the sensor.

use tracing::trace;

use crate::calibration::Calibration;

/// Expected field count of a sensor datagram.
const SENSOR_FIELD_COUNT: usize = 13;

/// Full-scale airspeed of the sensor's 0..8192 raw channel, in knots.
const AIRSPEED_FULL_SCALE_KT: f64 = 173.7952;

/// Raw airspeed channel range.
const AIRSPEED_RAW_RANGE: f64 = 8192.0;

/// Scale divisor for the raw pitch channel.
const PITCH_SCALE: f64 = 4.0;

/// One decoded sensor datagram.
///
/// Values are calibrated (airspeed factor, unit conversion) but not yet
/// smoothed or zero-referenced; that happens downstream against session
/// state.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorFrame {
    /// Firmware version string.
    pub firmware: String,
    /// Calibrated airspeed in the configured display units.
    pub airspeed: f64,
    /// Pressure altitude in feet.
    pub altitude: f64,
    /// Outside air temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Raw magnetometer vector.
    pub mag: [f64; 3],
    /// Magnetometer-derived heading in degrees, un-normalized.
    pub heading: f64,
    /// Pitch in degrees, before the zero reference.
    pub pitch: f64,
    /// Roll in degrees, before the zero reference.
    pub roll: f64,
    /// Accelerometer vector in G: longitudinal, lateral, vertical.
    pub accel: [f64; 3],
}

/// Decode one sensor datagram line.
///
/// Returns `None` for anything other than exactly 13 fields with valid
/// numerics, guarding against truncated or corrupt datagrams.
pub fn decode_sensor_frame(line: &str, calibration: &Calibration) -> Option<SensorFrame> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != SENSOR_FIELD_COUNT {
        trace!(
            fields = fields.len(),
            "sensor datagram with wrong arity, discarding"
        );
        return None;
    }

    let numeric = |index: usize| fields[index].trim().parse::<f64>().ok();

    let raw_airspeed = numeric(1)?;
    let altitude = numeric(2)?;
    let temperature_c = numeric(3)?;
    let mag = [numeric(4)?, numeric(5)?, numeric(6)?];
    // Field 7 is the orientation-yaw placeholder; parsed for validity,
    // never used.
    let _yaw = numeric(7)?;
    let raw_pitch = numeric(8)?;
    let roll = numeric(9)?;
    let accel = [numeric(10)?, numeric(11)?, numeric(12)?];

    let airspeed = raw_airspeed / AIRSPEED_RAW_RANGE
        * AIRSPEED_FULL_SCALE_KT
        * calibration.airspeed_factor
        * calibration.units.factor();

    Some(SensorFrame {
        firmware: fields[0].trim().to_string(),
        airspeed,
        altitude,
        temperature_c,
        mag,
        heading: mag[1].atan2(mag[0]).to_degrees(),
        pitch: raw_pitch / PITCH_SCALE,
        roll,
        accel,
    })
}

/// Encode the outbound barometric-pressure calibration datagram.
///
/// Fixed-point ASCII with 2 decimals; re-sent periodically and on every
/// datagram receipt, fire-and-forget.
pub fn encode_pressure_message(baro_in_hg: f64) -> String {
    format!("BARO,{:.2}", baro_in_hg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::SpeedUnits;

    fn line(raw_airspeed: f64) -> String {
        format!(
            "1.4,{},3250.0,12.5,120.0,0.0,-35.0,0.0,10.0,-2.5,0.01,-0.05,0.98",
            raw_airspeed
        )
    }

    #[test]
    fn test_decode_valid_frame() {
        let frame = decode_sensor_frame(&line(4096.0), &Calibration::default()).unwrap();

        assert_eq!(frame.firmware, "1.4");
        // 4096/8192 * 173.7952 = half scale
        assert!((frame.airspeed - 86.8976).abs() < 1e-4);
        assert!((frame.altitude - 3250.0).abs() < 1e-9);
        assert!((frame.temperature_c - 12.5).abs() < 1e-9);
        assert_eq!(frame.mag, [120.0, 0.0, -35.0]);
        // Pitch channel is scaled by 4 on the wire.
        assert!((frame.pitch - 2.5).abs() < 1e-9);
        assert!((frame.roll - (-2.5)).abs() < 1e-9);
        assert_eq!(frame.accel, [0.01, -0.05, 0.98]);
    }

    #[test]
    fn test_heading_derived_from_magnetometer() {
        let frame = decode_sensor_frame(
            "1.0,0,0,0,0.0,100.0,0,0,0,0,0,0,0",
            &Calibration::default(),
        )
        .unwrap();
        // atan2(100, 0) = 90°
        assert!((frame.heading - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_airspeed_calibration_factor_applied() {
        let calibration = Calibration {
            airspeed_factor: 1.1,
            ..Default::default()
        };
        let frame = decode_sensor_frame(&line(8192.0), &calibration).unwrap();
        assert!((frame.airspeed - 173.7952 * 1.1).abs() < 1e-4);
    }

    #[test]
    fn test_airspeed_unit_conversion_applied() {
        let calibration = Calibration {
            units: SpeedUnits::Kph,
            ..Default::default()
        };
        let frame = decode_sensor_frame(&line(8192.0), &calibration).unwrap();
        assert!((frame.airspeed - 173.7952 * 1.852).abs() < 1e-4);
    }

    #[test]
    fn test_wrong_arity_discarded() {
        assert!(decode_sensor_frame("1.0,2,3", &Calibration::default()).is_none());
        assert!(decode_sensor_frame(
            "1,2,3,4,5,6,7,8,9,10,11,12,13,14",
            &Calibration::default()
        )
        .is_none());
        assert!(decode_sensor_frame("", &Calibration::default()).is_none());
    }

    #[test]
    fn test_corrupt_numeric_field_discards_whole_frame() {
        let corrupt = "1.4,4096.0,3250.0,garbage,120.0,0.0,-35.0,0.0,10.0,-2.5,0.01,-0.05,0.98";
        assert!(decode_sensor_frame(corrupt, &Calibration::default()).is_none());
    }

    #[test]
    fn test_pressure_message_fixed_point_two_decimals() {
        assert_eq!(encode_pressure_message(29.92), "BARO,29.92");
        assert_eq!(encode_pressure_message(30.0), "BARO,30.00");
        assert_eq!(encode_pressure_message(29.915), "BARO,29.92");
    }
}
