//! Wire decoders for the host-unit streams and the sensor datagram.
//!
//! Three text formats share a tagged `"Field":value` shape (situation,
//! traffic, status); the attitude sensor broadcasts a fixed-arity
//! comma-separated numeric line. Decoders are stateless per message:
//! every field starts at a documented neutral default, recognized tags
//! overwrite it, unknown tags are ignored on purpose so a newer host unit
//! never breaks decoding, and individually malformed fragments are skipped
//! while the rest of the message decodes normally.

mod sensor;
mod situation;
mod status;
mod tagged;
mod traffic;

pub use sensor::{decode_sensor_frame, encode_pressure_message, SensorFrame};
pub use situation::decode_situation;
pub use status::decode_status;
pub use traffic::decode_traffic;
