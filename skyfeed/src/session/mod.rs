//! Stream session manager.
//!
//! Owns the lifecycle of the three persistent host-unit streams plus the
//! sensor datagram listener: `Disconnected → Connecting → Connected`,
//! supervised by a status watchdog. There is no exponential backoff; the
//! host unit sits on a fixed local-network address, reconnect attempts
//! are cheap, and the design goal is to run indefinitely against an
//! unreliable network, degrading instead of stopping.
//!
//! All message handling and the periodic tick run serialized on one
//! session task that owns the [`FeedCore`]; consumers see events on an
//! mpsc channel and copy-out views behind a [`SharedView`].

mod core;
mod events;

pub use self::core::FeedCore;
pub use events::FeedEvent;

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use parking_lot::RwLock;
use tokio::net::{TcpStream, UdpSocket};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::calibration::SharedCalibration;
use crate::model::StatusFlags;
use crate::wire::encode_pressure_message;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Maximum sensor datagram size.
const MAX_DATAGRAM_SIZE: usize = 1024;

/// Errors raised while opening the connection bundle.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A host-unit stream could not be opened.
    #[error("failed to connect stream {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    /// The sensor datagram socket could not be bound.
    #[error("failed to bind sensor socket on port {port}: {source}")]
    SocketBind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

/// Session manager configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Host-unit address.
    pub host: String,
    /// Host-unit stream port.
    pub port: u16,
    /// UDP port the sensor broadcasts on.
    pub sensor_port: u16,

    /// Interval of the eviction tick.
    pub tick_interval: Duration,
    /// Interval of the watchdog check.
    pub watchdog_interval: Duration,
    /// Maximum status silence before a forced reconnect.
    pub status_timeout: Duration,
    /// Interval of the outbound pressure datagram.
    pub pressure_resend: Duration,
    /// Delay between failed connection attempts.
    pub reconnect_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "192.168.10.1".to_string(),
            port: 80,
            sensor_port: 43211,
            tick_interval: Duration::from_secs(1),
            watchdog_interval: Duration::from_secs(5),
            status_timeout: Duration::from_secs(10),
            pressure_resend: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(1),
        }
    }
}

impl SessionConfig {
    fn situation_url(&self) -> String {
        format!("ws://{}:{}/situation", self.host, self.port)
    }

    fn traffic_url(&self) -> String {
        format!("ws://{}:{}/traffic", self.host, self.port)
    }

    fn status_url(&self) -> String {
        format!("ws://{}:{}/status", self.host, self.port)
    }
}

/// Connection lifecycle of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
        }
    }
}

#[derive(Default)]
struct ViewInner {
    situation: crate::model::SituationSnapshot,
    traffic: Vec<crate::model::TrafficRecord>,
    status: StatusFlags,
    state: ConnectionState,
}

/// Copy-out view of the latest published state.
///
/// Complements the event channel for pull-style consumers; every accessor
/// returns a clone, never a reference into session state.
#[derive(Clone, Default)]
pub struct SharedView {
    inner: Arc<RwLock<ViewInner>>,
}

impl SharedView {
    pub fn situation(&self) -> crate::model::SituationSnapshot {
        self.inner.read().situation.clone()
    }

    pub fn traffic(&self) -> Vec<crate::model::TrafficRecord> {
        self.inner.read().traffic.clone()
    }

    pub fn status(&self) -> StatusFlags {
        self.inner.read().status
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.inner.read().state
    }

    fn set_situation(&self, situation: crate::model::SituationSnapshot) {
        self.inner.write().situation = situation;
    }

    fn set_traffic(&self, traffic: Vec<crate::model::TrafficRecord>) {
        self.inner.write().traffic = traffic;
    }

    fn set_status(&self, status: StatusFlags) {
        self.inner.write().status = status;
    }

    fn set_state(&self, state: ConnectionState) {
        self.inner.write().state = state;
    }
}

/// Owner of the session task.
pub struct SessionManager {
    config: SessionConfig,
    events: mpsc::Sender<FeedEvent>,
    calibration: SharedCalibration,
    view: SharedView,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SessionManager {
    pub fn new(
        config: SessionConfig,
        calibration: SharedCalibration,
        events: mpsc::Sender<FeedEvent>,
    ) -> Self {
        Self {
            config,
            events,
            calibration,
            view: SharedView::default(),
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    /// Copy-out view handle for pull-style consumers.
    pub fn view(&self) -> SharedView {
        self.view.clone()
    }

    /// Calibration handle for the calibration actions.
    pub fn calibration(&self) -> SharedCalibration {
        self.calibration.clone()
    }

    /// Open the connection bundle and start serving.
    ///
    /// Idempotent: calling while the session task is already running is a
    /// safe no-op.
    pub fn connect(&mut self) {
        if let Some(task) = &self.task {
            if !task.is_finished() {
                debug!("connect() while session already running; ignored");
                return;
            }
        }

        self.cancel = CancellationToken::new();
        let worker = SessionWorker {
            config: self.config.clone(),
            events: self.events.clone(),
            calibration: self.calibration.clone(),
            view: self.view.clone(),
            cancel: self.cancel.clone(),
        };
        self.task = Some(tokio::spawn(worker.run()));
    }

    /// Tear the session down.
    ///
    /// Cancels the session task, which unregisters all stream handling
    /// before the connections drop and publishes all-false status flags.
    pub async fn disconnect(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// Why the serve loop returned.
enum ServeExit {
    Cancelled,
    ConnectionLost,
    WatchdogExpired,
}

/// Per-connection message counters, logged when the streams close.
#[derive(Default)]
struct StreamCounters {
    situation: u64,
    traffic: u64,
    status: u64,
    sensor: u64,
}

struct Connections {
    situation: WsStream,
    traffic: WsStream,
    status: WsStream,
    sensor: UdpSocket,
}

struct SessionWorker {
    config: SessionConfig,
    events: mpsc::Sender<FeedEvent>,
    calibration: SharedCalibration,
    view: SharedView,
    cancel: CancellationToken,
}

impl SessionWorker {
    async fn run(self) {
        let mut core = FeedCore::new(self.calibration.clone());

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            self.view.set_state(ConnectionState::Connecting);
            info!(host = %self.config.host, "connecting to host unit");

            let opened = tokio::select! {
                _ = self.cancel.cancelled() => break,
                opened = self.open() => opened,
            };
            let connections = match opened {
                Ok(connections) => connections,
                Err(error) => {
                    warn!(%error, "connection failed");
                    self.publish_down();
                    tokio::select! {
                        _ = self.cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.config.reconnect_delay) => continue,
                    }
                }
            };

            self.view.set_state(ConnectionState::Connected);
            info!("host unit connected");
            core.note_connected(Instant::now());

            let exit = self.serve(&mut core, connections).await;
            self.publish_down();

            match exit {
                ServeExit::Cancelled => break,
                ServeExit::ConnectionLost => info!("stream closed; reconnecting"),
                ServeExit::WatchdogExpired => {
                    warn!("no status message within watchdog window; reconnecting")
                }
            }
        }

        self.view.set_state(ConnectionState::Disconnected);
        info!("session stopped");
    }

    async fn open(&self) -> Result<Connections, SessionError> {
        let connect = |url: String| async move {
            let (stream, _) = connect_async(url.as_str())
                .await
                .map_err(|source| SessionError::Connect { url, source })?;
            Ok::<WsStream, SessionError>(stream)
        };

        let situation = connect(self.config.situation_url()).await?;
        let traffic = connect(self.config.traffic_url()).await?;
        let status = connect(self.config.status_url()).await?;

        let sensor = UdpSocket::bind(("0.0.0.0", self.config.sensor_port))
            .await
            .map_err(|source| SessionError::SocketBind {
                port: self.config.sensor_port,
                source,
            })?;

        Ok(Connections {
            situation,
            traffic,
            status,
            sensor,
        })
    }

    /// Serve one connected session until cancellation, stream loss or
    /// watchdog expiry.
    async fn serve(&self, core: &mut FeedCore, connections: Connections) -> ServeExit {
        let Connections {
            mut situation,
            mut traffic,
            mut status,
            sensor,
        } = connections;

        let mut tick = tokio::time::interval(self.config.tick_interval);
        let mut watchdog = tokio::time::interval(self.config.watchdog_interval);
        let mut pressure = tokio::time::interval(self.config.pressure_resend);

        let mut buffer = [0u8; MAX_DATAGRAM_SIZE];
        let mut sensor_peer: Option<std::net::SocketAddr> = None;
        let mut counters = StreamCounters::default();

        let exit = loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!("session cancelled");
                    break ServeExit::Cancelled;
                }

                message = situation.next() => {
                    match text_of(message) {
                        Ok(Some(payload)) => {
                            counters.situation += 1;
                            let event = core.handle_situation(&payload, Instant::now());
                            self.view.set_situation(core.situation().clone());
                            self.emit(event);
                        }
                        Ok(None) => {}
                        Err(()) => break ServeExit::ConnectionLost,
                    }
                }

                message = traffic.next() => {
                    match text_of(message) {
                        Ok(Some(payload)) => {
                            counters.traffic += 1;
                            if let Some(event) = core.handle_traffic(&payload, Instant::now()) {
                                self.view.set_traffic(core.traffic_snapshot());
                                self.emit(event);
                            }
                        }
                        Ok(None) => {}
                        Err(()) => break ServeExit::ConnectionLost,
                    }
                }

                message = status.next() => {
                    match text_of(message) {
                        Ok(Some(payload)) => {
                            counters.status += 1;
                            let event = core.handle_status(&payload, Instant::now());
                            if let FeedEvent::Status(flags) = &event {
                                self.view.set_status(*flags);
                            }
                            self.emit(event);
                        }
                        Ok(None) => {}
                        Err(()) => break ServeExit::ConnectionLost,
                    }
                }

                received = sensor.recv_from(&mut buffer) => {
                    match received {
                        Ok((len, peer)) => {
                            if sensor_peer != Some(peer) {
                                info!(%peer, "attitude sensor detected");
                            }
                            sensor_peer = Some(peer);
                            if let Ok(line) = std::str::from_utf8(&buffer[..len]) {
                                if let Some(event) = core.handle_sensor(line, Instant::now()) {
                                    counters.sensor += 1;
                                    self.view.set_situation(core.situation().clone());
                                    self.emit(event);
                                }
                            } else {
                                trace!("non-UTF8 sensor datagram ignored");
                            }
                            self.send_pressure(&sensor, sensor_peer).await;
                        }
                        Err(error) => {
                            warn!(%error, "sensor socket receive error");
                        }
                    }
                }

                _ = tick.tick() => {
                    core.tick(Instant::now());
                    self.view.set_traffic(core.traffic_snapshot());
                }

                _ = watchdog.tick() => {
                    let silence = core.status_silence(Instant::now());
                    if silence > self.config.status_timeout {
                        break ServeExit::WatchdogExpired;
                    }
                }

                _ = pressure.tick() => {
                    self.send_pressure(&sensor, sensor_peer).await;
                }
            }
        };

        info!(
            situation = counters.situation,
            traffic = counters.traffic,
            status = counters.status,
            sensor = counters.sensor,
            "session stream summary"
        );
        exit
    }

    /// Fire-and-forget the barometric setting back to the sensor.
    async fn send_pressure(&self, sensor: &UdpSocket, peer: Option<std::net::SocketAddr>) {
        let Some(peer) = peer else { return };
        let message = encode_pressure_message(self.calibration.get().baro_setting_in_hg);
        if let Err(error) = sensor.send_to(message.as_bytes(), peer).await {
            trace!(%error, "pressure datagram send failed");
        }
    }

    /// Publish all-false flags when the connection bundle goes down.
    fn publish_down(&self) {
        self.view.set_status(StatusFlags::all_false());
        self.emit(FeedEvent::Status(StatusFlags::all_false()));
    }

    /// Non-blocking event emission; a slow consumer drops events rather
    /// than stalling message handling.
    fn emit(&self, event: FeedEvent) {
        if let Err(error) = self.events.try_send(event) {
            warn!(%error, "event channel full, dropping event");
        }
    }
}

/// Extract the text payload of one stream item.
///
/// `Ok(None)` for non-text frames, `Err(())` when the stream is gone.
fn text_of(
    message: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>,
) -> Result<Option<String>, ()> {
    match message {
        Some(Ok(Message::Text(text))) => Ok(Some(text)),
        Some(Ok(Message::Close(_))) | None => Err(()),
        Some(Ok(_)) => Ok(None),
        Some(Err(error)) => {
            warn!(%error, "stream error");
            Err(())
        }
    }
}
