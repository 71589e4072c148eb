//! SkyFeed CLI - run the telemetry feed and print what it publishes.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use skyfeed::logging::{default_log_path, init_logging};
use skyfeed::{FeedApp, FeedConfig, FeedEvent};

#[derive(Parser, Debug)]
#[command(name = "skyfeed", about = "Real-time flight telemetry feed", version)]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the host-unit address from the configuration
    #[arg(long)]
    host: Option<String>,

    /// Override the host-unit stream port from the configuration
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _guard = match init_logging(&default_log_path()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    let config_path = args.config.unwrap_or_else(FeedConfig::default_path);
    let mut config = match FeedConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(%e, path = %config_path.display(), "failed to load configuration");
            std::process::exit(1);
        }
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    info!(host = %config.host, port = config.port, "starting feed");
    let mut app = FeedApp::start(config);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                break;
            }
            event = app.events().recv() => {
                match event {
                    Some(event) => report(event),
                    None => break,
                }
            }
        }
    }

    app.shutdown().await;
}

/// One log line per published event.
fn report(event: FeedEvent) {
    match event {
        FeedEvent::Situation(situation) => {
            info!(
                latitude = situation.latitude,
                longitude = situation.longitude,
                altitude = situation.baro_altitude,
                airspeed = situation.airspeed,
                heading = situation.mag_heading,
                sensor = situation.sensor_authoritative,
                "situation"
            );
        }
        FeedEvent::Traffic(icao, record) => {
            info!(
                icao,
                tail = %record.tail,
                altitude = record.altitude,
                bearing = record.bearing,
                distance_nm = record.distance_nm,
                "traffic"
            );
        }
        FeedEvent::Status(flags) => {
            info!(
                host = flags.host_reachable,
                attitude = flags.attitude_ok,
                gps = flags.gps_ok,
                traffic = flags.traffic_ok,
                "status"
            );
        }
    }
}
