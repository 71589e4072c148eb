//! Application bootstrap and lifecycle.
//!
//! `FeedApp` wires the configuration, calibration handle, event channel
//! and stream session together in one place, so every frontend gets the
//! same startup sequencing:
//!
//! 1. Translate [`FeedConfig`] into session and calibration settings.
//! 2. Start the session manager (it owns reconnection from here on).
//! 3. Hand the consumer the event receiver and the copy-out view.
//!
//! ```ignore
//! let config = FeedConfig::load(&FeedConfig::default_path())?;
//! let mut app = FeedApp::start(config);
//! while let Some(event) = app.events().recv().await { /* ... */ }
//! app.shutdown().await;
//! ```

mod config;
mod error;

pub use config::FeedConfig;
pub use error::{AppError, ConfigError};

use tokio::sync::mpsc;

use crate::calibration::SharedCalibration;
use crate::session::{FeedEvent, SessionManager, SharedView};

/// Capacity of the feed event channel.
///
/// Sized for bursty traffic streams; the session drops events rather
/// than blocking when a consumer falls this far behind.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Running application: session manager plus consumer-facing handles.
pub struct FeedApp {
    manager: SessionManager,
    events: mpsc::Receiver<FeedEvent>,
}

impl FeedApp {
    /// Start the feed from a loaded configuration.
    ///
    /// Connection establishment happens on the session task; this returns
    /// immediately with the session in its connecting state.
    pub fn start(config: FeedConfig) -> Self {
        let calibration = SharedCalibration::new(config.calibration());
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut manager = SessionManager::new(config.session_config(), calibration, tx);
        manager.connect();
        Self {
            manager,
            events: rx,
        }
    }

    /// Receiver of the feed events.
    pub fn events(&mut self) -> &mut mpsc::Receiver<FeedEvent> {
        &mut self.events
    }

    /// Copy-out view of the latest published state.
    pub fn view(&self) -> SharedView {
        self.manager.view()
    }

    /// Calibration handle for settings changes and the level action.
    pub fn calibration(&self) -> SharedCalibration {
        self.manager.calibration()
    }

    /// Graceful shutdown: cancels the session and waits for it to stop.
    pub async fn shutdown(mut self) {
        self.manager.disconnect().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::SpeedUnits;
    use crate::session::ConnectionState;

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let app = FeedApp::start(FeedConfig::default());
        let view = app.view();

        app.shutdown().await;
        assert_eq!(view.connection_state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_calibration_settings_flow_from_config() {
        let config = FeedConfig {
            units: SpeedUnits::Kph,
            airspeed_factor: 1.1,
            ..Default::default()
        };
        let app = FeedApp::start(config);
        let cal = app.calibration().get();
        assert_eq!(cal.units, SpeedUnits::Kph);
        assert_eq!(cal.airspeed_factor, 1.1);
        app.shutdown().await;
    }
}
