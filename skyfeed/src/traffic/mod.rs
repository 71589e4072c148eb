//! Keyed registry of observed traffic targets with age-based eviction.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::model::TrafficRecord;

/// Age beyond which a target is evicted.
pub const TRAFFIC_MAX_AGE: Duration = Duration::from_secs(30);

/// Mutable collection of traffic targets keyed by ICAO address.
///
/// The registry never grows unbounded: eviction runs proactively before
/// every upsert and again on the periodic tick, and one eviction pass
/// removes every record whose locally-stamped age exceeds the threshold.
#[derive(Debug, Default)]
pub struct TrafficRegistry {
    targets: HashMap<u32, TrafficRecord>,
}

impl TrafficRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for its ICAO address.
    ///
    /// Last-write-wins, no merge with any prior record. Returns false
    /// without inserting when the record carries ICAO 0, which the wire
    /// uses for targets without a usable address.
    pub fn upsert(&mut self, record: TrafficRecord) -> bool {
        if record.icao == 0 {
            debug!("dropping traffic record without an ICAO address");
            return false;
        }
        trace!(icao = record.icao, tail = %record.tail, "traffic upsert");
        self.targets.insert(record.icao, record);
        true
    }

    /// Remove every record whose observed age exceeds [`TRAFFIC_MAX_AGE`].
    ///
    /// `retain` gives the same observable result as the original
    /// find-one-and-rescan loop: after one call, no stale entry remains.
    pub fn evict_stale(&mut self, now: Instant) {
        let before = self.targets.len();
        self.targets
            .retain(|_, record| record.age(now) <= TRAFFIC_MAX_AGE);
        let evicted = before - self.targets.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.targets.len(), "evicted stale traffic");
        }
    }

    /// Copy of all records, ordered by ICAO address.
    pub fn snapshot(&self) -> Vec<TrafficRecord> {
        let mut records: Vec<TrafficRecord> = self.targets.values().cloned().collect();
        records.sort_by_key(|record| record.icao);
        records
    }

    pub fn get(&self, icao: u32) -> Option<&TrafficRecord> {
        self.targets.get(&icao)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
