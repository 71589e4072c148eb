//! Outbound notifications to downstream consumers.

use crate::model::{SituationSnapshot, StatusFlags, TrafficRecord};

/// One-way notification published by the feed session.
///
/// At most one event is fired per inbound message or per tick. Consumers
/// receive owned values; nothing here references live session state.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A fresh own-ship situational snapshot.
    Situation(SituationSnapshot),
    /// A traffic record was created or replaced for this ICAO address.
    Traffic(u32, TrafficRecord),
    /// The status flags were recomputed.
    Status(StatusFlags),
}
