//! Status stream decoder.

use crate::model::StatusReport;

use super::tagged::{apply_tagged, set_bool, set_u32, Setter};

/// Recognized status tags: traffic-tracking counters and GPS
/// connectivity/lock counts.
const STATUS_TABLE: &[(&str, Setter<StatusReport>)] = &[
    ("UAT_messages_last_minute", |r, v| {
        set_u32(&mut r.uat_messages, v)
    }),
    ("ES_messages_last_minute", |r, v| set_u32(&mut r.es_messages, v)),
    ("GPS_connected", |r, v| set_bool(&mut r.gps_connected, v)),
    ("GPS_satellites_locked", |r, v| {
        set_u32(&mut r.gps_satellites_locked, v)
    }),
];

/// Decode one status message into its counter report.
pub fn decode_status(payload: &str) -> StatusReport {
    let mut report = StatusReport::default();
    apply_tagged(payload, &mut report, STATUS_TABLE);
    report
}
