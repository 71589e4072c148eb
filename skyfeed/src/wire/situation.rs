//! Situation stream decoder.

use crate::calibration::Calibration;
use crate::model::SituationSnapshot;

use super::tagged::{apply_tagged, set_f64, set_u32, Setter};

/// Recognized situation tags, mapped to their snapshot fields.
const SITUATION_TABLE: &[(&str, Setter<SituationSnapshot>)] = &[
    ("GPSLatitude", |s, v| set_f64(&mut s.latitude, v)),
    ("GPSLongitude", |s, v| set_f64(&mut s.longitude, v)),
    ("GPSFixQuality", |s, v| set_u32(&mut s.fix_quality, v)),
    ("GPSSatellites", |s, v| set_u32(&mut s.satellites, v)),
    ("GPSSatellitesTracked", |s, v| {
        set_u32(&mut s.satellites_tracked, v)
    }),
    ("GPSSatellitesSeen", |s, v| set_u32(&mut s.satellites_seen, v)),
    ("GPSHorizontalAccuracy", |s, v| {
        set_f64(&mut s.horizontal_accuracy, v)
    }),
    ("BaroPressureAltitude", |s, v| set_f64(&mut s.baro_altitude, v)),
    ("BaroVerticalSpeed", |s, v| set_f64(&mut s.vertical_speed, v)),
    ("AHRSPitch", |s, v| set_f64(&mut s.pitch, v)),
    ("AHRSRoll", |s, v| set_f64(&mut s.roll, v)),
    ("AHRSGyroHeading", |s, v| set_f64(&mut s.gyro_heading, v)),
    ("AHRSMagHeading", |s, v| set_f64(&mut s.mag_heading, v)),
    ("AHRSSlipSkid", |s, v| set_f64(&mut s.slip_skid, v)),
    ("AHRSTurnRate", |s, v| set_f64(&mut s.turn_rate, v)),
    ("AHRSGLoad", |s, v| set_f64(&mut s.g_load, v)),
    ("AHRSGLoadMin", |s, v| set_f64(&mut s.g_load_min, v)),
    ("AHRSGLoadMax", |s, v| set_f64(&mut s.g_load_max, v)),
    ("AHRSAirspeed", |s, v| set_f64(&mut s.airspeed, v)),
    ("GPSGroundSpeed", |s, v| set_f64(&mut s.ground_speed, v)),
    ("GPSTrueCourse", |s, v| set_f64(&mut s.true_course, v)),
    ("BaroTemperature", |s, v| set_f64(&mut s.temperature_c, v)),
];

/// Decode one situation message into a fresh snapshot.
///
/// Wire speeds are knots; the configured display unit conversion is
/// applied here so a units change takes effect on the next message.
pub fn decode_situation(payload: &str, calibration: &Calibration) -> SituationSnapshot {
    let mut snapshot = SituationSnapshot::default();
    apply_tagged(payload, &mut snapshot, SITUATION_TABLE);

    let factor = calibration.units.factor();
    snapshot.ground_speed *= factor;
    snapshot.airspeed *= factor;

    snapshot
}
