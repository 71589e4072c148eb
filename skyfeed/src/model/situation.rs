//! Own-ship situational snapshot.

/// Complete own-ship situation published to consumers.
///
/// Rebuilt from scratch on every inbound situation message and overwritten
/// wholesale when the attitude sensor is authoritative; never partially
/// mutated in place, so a consumer holding a clone always sees a
/// fully-formed, consistent record.
///
/// Every field defaults to a neutral zero; a field keeps its default when
/// the message that produced the snapshot did not carry the matching tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SituationSnapshot {
    /// GPS latitude in degrees.
    pub latitude: f64,
    /// GPS longitude in degrees.
    pub longitude: f64,
    /// GPS fix quality (0 = none).
    pub fix_quality: u32,
    /// Satellites used in the solution.
    pub satellites: u32,
    /// Satellites tracked by the receiver.
    pub satellites_tracked: u32,
    /// Satellites seen by the receiver.
    pub satellites_seen: u32,
    /// Horizontal accuracy in meters.
    pub horizontal_accuracy: f64,

    /// Barometric pressure altitude in feet.
    pub baro_altitude: f64,
    /// Barometric vertical speed in feet per minute.
    pub vertical_speed: f64,

    /// Pitch in degrees, positive nose-up.
    pub pitch: f64,
    /// Roll in degrees, positive right wing down.
    pub roll: f64,
    /// Gyro heading in degrees [0, 360).
    pub gyro_heading: f64,
    /// Magnetic heading in degrees [0, 360).
    pub mag_heading: f64,
    /// Slip/skid indication (lateral acceleration, G).
    pub slip_skid: f64,
    /// Turn rate in degrees per second.
    pub turn_rate: f64,
    /// Current G load.
    pub g_load: f64,
    /// Minimum G load observed by the host unit.
    pub g_load_min: f64,
    /// Maximum G load observed by the host unit.
    pub g_load_max: f64,

    /// Ground speed in the configured display units.
    pub ground_speed: f64,
    /// True course over the ground in degrees [0, 360).
    pub true_course: f64,
    /// Airspeed in the configured display units.
    pub airspeed: f64,
    /// Outside air temperature in degrees Celsius.
    pub temperature_c: f64,

    /// True when the attitude sensor's values are authoritative for the
    /// attitude/airspeed channels of this snapshot.
    pub sensor_authoritative: bool,
}

impl SituationSnapshot {
    /// Own position when both coordinates are usable.
    ///
    /// A (0, 0) pair is how the host unit reports "no fix", so it is
    /// treated as no position rather than a point off the African coast.
    pub fn position(&self) -> Option<(f64, f64)> {
        if self.latitude != 0.0 && self.longitude != 0.0 {
            Some((self.latitude, self.longitude))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        let snapshot = SituationSnapshot::default();
        assert_eq!(snapshot.latitude, 0.0);
        assert_eq!(snapshot.baro_altitude, 0.0);
        assert_eq!(snapshot.fix_quality, 0);
        assert!(!snapshot.sensor_authoritative);
    }

    #[test]
    fn test_position_requires_both_coordinates() {
        let mut snapshot = SituationSnapshot {
            latitude: 53.5,
            longitude: 10.0,
            ..Default::default()
        };
        assert_eq!(snapshot.position(), Some((53.5, 10.0)));

        snapshot.longitude = 0.0;
        assert_eq!(snapshot.position(), None);

        snapshot.longitude = 10.0;
        snapshot.latitude = 0.0;
        assert_eq!(snapshot.position(), None);
    }
}
