//! Unit and calibration policy applied at decode time.
//!
//! Speed unit conversion, the airspeed calibration factor, the pitch/roll
//! zero reference captured by the "level here" action, and the barometric
//! pressure setting echoed back to the attitude sensor all live here. The
//! decoders take a [`Calibration`] reference so a settings change takes
//! effect on the very next decoded message.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default barometric pressure setting in inches of mercury.
pub const DEFAULT_BARO_IN_HG: f64 = 29.92;

/// Display units for speed channels.
///
/// All speeds arrive on the wire in knots; the factor is applied when a
/// message is decoded, never retroactively to published values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnits {
    #[default]
    Knots,
    Mph,
    Kph,
}

impl SpeedUnits {
    /// Conversion factor from knots to this unit.
    pub fn factor(&self) -> f64 {
        match self {
            SpeedUnits::Knots => 1.0,
            SpeedUnits::Mph => 1.150_779,
            SpeedUnits::Kph => 1.852,
        }
    }
}

impl std::fmt::Display for SpeedUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedUnits::Knots => write!(f, "kt"),
            SpeedUnits::Mph => write!(f, "mph"),
            SpeedUnits::Kph => write!(f, "km/h"),
        }
    }
}

/// Decode-time calibration settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    /// Display units for speed channels.
    pub units: SpeedUnits,

    /// Multiplier applied to the sensor's converted airspeed.
    pub airspeed_factor: f64,

    /// Raw pitch captured as the level reference, in degrees.
    pub zero_pitch: f64,

    /// Raw roll captured as the level reference, in degrees.
    pub zero_roll: f64,

    /// Barometric pressure setting sent back to the sensor, in inHg.
    pub baro_setting_in_hg: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            units: SpeedUnits::Knots,
            airspeed_factor: 1.0,
            zero_pitch: 0.0,
            zero_roll: 0.0,
            baro_setting_in_hg: DEFAULT_BARO_IN_HG,
        }
    }
}

impl Calibration {
    /// Capture the current raw attitude as the new zero reference.
    ///
    /// Subsequent sensor frames report pitch/roll relative to this attitude.
    pub fn snapshot_level(&mut self, raw_pitch: f64, raw_roll: f64) {
        self.zero_pitch = raw_pitch;
        self.zero_roll = raw_roll;
    }
}

/// Cloneable handle to the calibration settings shared between the feed
/// session and its callers.
///
/// Setters are the calibration actions exposed to the outside; the session
/// reads the settings at decode time, so every change takes effect on the
/// next decoded message. The level-attitude action is deferred the same
/// way: it raises a flag the session consumes on the next sensor frame,
/// capturing that frame's raw pitch/roll as the zero reference.
#[derive(Debug, Clone, Default)]
pub struct SharedCalibration {
    inner: Arc<RwLock<Calibration>>,
    level_requested: Arc<AtomicBool>,
}

impl SharedCalibration {
    pub fn new(calibration: Calibration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(calibration)),
            level_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Copy of the current settings.
    pub fn get(&self) -> Calibration {
        self.inner.read().clone()
    }

    /// Change the display units for speed channels.
    pub fn set_units(&self, units: SpeedUnits) {
        self.inner.write().units = units;
        info!(%units, "speed units changed");
    }

    /// Change the airspeed calibration factor.
    pub fn set_airspeed_calibration(&self, factor: f64) {
        self.inner.write().airspeed_factor = factor;
        info!(factor, "airspeed calibration changed");
    }

    /// Change the barometric pressure setting echoed to the sensor.
    pub fn set_baro_setting(&self, in_hg: f64) {
        self.inner.write().baro_setting_in_hg = in_hg;
        info!(in_hg, "barometric setting changed");
    }

    /// Request that the next sensor frame's raw attitude become the new
    /// level reference.
    pub fn snapshot_level_attitude(&self) {
        self.level_requested.store(true, Ordering::SeqCst);
    }

    /// Consume a pending level request, capturing the given raw attitude.
    ///
    /// Called by the session when a sensor frame is decoded. Returns true
    /// when a request was pending.
    pub fn take_level_request(&self, raw_pitch: f64, raw_roll: f64) -> bool {
        if self.level_requested.swap(false, Ordering::SeqCst) {
            self.inner.write().snapshot_level(raw_pitch, raw_roll);
            info!(raw_pitch, raw_roll, "level attitude captured");
            true
        } else {
            false
        }
    }
}
