//! Host-unit status counters and the derived status flags.

/// Counters decoded from a host-unit status message.
///
/// These are the raw ingredients; [`StatusFlags`] is what consumers see
/// after combining them with cached position and attitude validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusReport {
    /// UAT traffic messages received in the last minute.
    pub uat_messages: u32,
    /// 1090ES traffic messages received in the last minute.
    pub es_messages: u32,
    /// Whether the host unit reports a connected GPS.
    pub gps_connected: bool,
    /// Satellites with a solution lock.
    pub gps_satellites_locked: u32,
}

/// Four independent health indications published to consumers.
///
/// Recomputed and republished on every status message, and forced
/// all-false whenever the session disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlags {
    /// The host unit is reachable (status messages are arriving).
    pub host_reachable: bool,
    /// An attitude source (sensor or host AHRS) is fresh.
    pub attitude_ok: bool,
    /// GPS is connected and a usable own position is cached.
    pub gps_ok: bool,
    /// The traffic feed saw messages in the last minute.
    pub traffic_ok: bool,
}

impl StatusFlags {
    /// The flags published when nothing is known to be healthy.
    pub fn all_false() -> Self {
        Self::default()
    }
}
