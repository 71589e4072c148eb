//! Unified situational data model.
//!
//! These are the types the rest of the system produces and consumers
//! receive. Everything here is a plain value: the stream session owns the
//! only mutable copies, and downstream consumers always get clones, never
//! references into live state.

mod sensor;
mod situation;
mod status;
mod traffic;

pub use sensor::{SensorTelemetry, SENSOR_LIVENESS};
pub use situation::SituationSnapshot;
pub use status::{StatusFlags, StatusReport};
pub use traffic::{TrafficRecord, DEFAULT_SQUAWK};
