//! VoiceShield Simulator - headless entry point
//!
//! Runs the monitor plus one scripted detection and verification session,
//! printing every dashboard event as a JSON line.

use std::time::Duration;

use voiceshield_core::constants::{self, env_or};
use voiceshield_core::{DashboardEngine, DashboardEvent, SimulationConfig};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} simulator v{}...", constants::APP_NAME, constants::APP_VERSION);

    let config = match SimulationConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let engine = match DashboardEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Engine init failed: {}", e);
            std::process::exit(1);
        }
    };

    let printer = tokio::spawn(print_events(engine.subscribe()));

    if let Err(e) = run_session(&engine).await {
        log::error!("Session aborted: {}", e);
    }

    match serde_json::to_string_pretty(&engine.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("Failed to serialize final snapshot: {}", e),
    }

    engine.shutdown();
    printer.abort();
}

async fn run_session(engine: &DashboardEngine) -> Result<(), voiceshield_core::WorkflowError> {
    let record_secs: u64 = env_or("VOICESHIELD_SIM_RECORD_SECS", 4);
    let settle = engine.config().processing_delay() + Duration::from_millis(200);

    engine.start_monitoring()?;

    engine.start_capture()?;
    tokio::time::sleep(Duration::from_secs(record_secs)).await;
    engine.stop_capture()?;
    tokio::time::sleep(settle).await;

    engine.provide_reference_sample()?;
    engine.provide_test_sample()?;
    engine.run_verification()?;
    tokio::time::sleep(settle).await;

    engine.stop_monitoring();
    Ok(())
}

async fn print_events(mut rx: tokio::sync::broadcast::Receiver<DashboardEvent>) {
    use tokio::sync::broadcast::error::RecvError;

    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => log::warn!("Failed to serialize {}: {}", event.name(), e),
            },
            Err(RecvError::Lagged(n)) => log::warn!("Event printer lagged, {} events skipped", n),
            Err(RecvError::Closed) => break,
        }
    }
}
