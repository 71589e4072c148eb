//! SkyFeed - real-time flight telemetry ingestion.
//!
//! Connects to a portable ADS-B/AHRS host unit over its persistent text
//! streams (situation, traffic, status) and to an auxiliary airspeed and
//! attitude sensor over UDP datagrams, fuses both sources into one
//! own-ship picture, tracks nearby traffic with age-based eviction, and
//! publishes the result as events plus a copy-out view.
//!
//! The entry point for frontends is [`app::FeedApp`]; the lower-level
//! building blocks (wire decoders, the fusion rules, the traffic
//! registry, the session machinery) are public for direct use and for
//! testing.

pub mod app;
pub mod calibration;
pub mod fusion;
pub mod geo;
pub mod logging;
pub mod model;
pub mod session;
pub mod smoothing;
pub mod traffic;
pub mod wire;

pub use app::{AppError, ConfigError, FeedApp, FeedConfig};
pub use calibration::{Calibration, SharedCalibration, SpeedUnits};
pub use model::{SituationSnapshot, StatusFlags, StatusReport, TrafficRecord};
pub use session::{ConnectionState, FeedEvent, SessionConfig, SessionManager, SharedView};
