use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use engine_logging::{advance_frame_tick, engine_debug, engine_info};
use kiosk_engine::{QueryOrchestrator, Submission};
use tokio::time::MissedTickBehavior;

use super::bridge::HostBridge;
use super::config::{load_config, KioskConfig};
use super::logging::{self, LogDestination};
use super::ui::ConsoleSink;

/// Kiosk display driven by JSON scene payloads, one per line.
#[derive(Debug, Parser)]
#[command(name = "kiosk", version)]
struct Args {
    /// Configuration file (RON). Defaults to ./kiosk.ron when present.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,

    /// Read payloads from this file instead of stdin.
    #[arg(long)]
    events: Option<PathBuf>,
}

pub fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    logging::initialize(args.log, config.level_filter());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(run(config, args.events))
}

async fn run(config: KioskConfig, events: Option<PathBuf>) -> anyhow::Result<()> {
    let sink = Arc::new(ConsoleSink::new());
    let orchestrator = QueryOrchestrator::new(config.to_engine_config(), sink.clone());

    let frame_interval = config.frame_interval();
    let frame_sink = sink.clone();
    let frames = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let tick = advance_frame_tick();
            frame_sink.present(tick);
        }
    });

    let mut bridge = match &events {
        Some(path) => HostBridge::open(path)
            .await
            .with_context(|| format!("failed to open event file {:?}", path))?,
        None => HostBridge::stdin(),
    };
    engine_info!(
        "kiosk ready, reading payloads from {}",
        events
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "stdin".to_string())
    );

    let mut last_scene = None;
    while let Some(payload) = bridge
        .next_payload()
        .await
        .context("failed to read payload")?
    {
        match orchestrator.submit(&payload) {
            Submission::Dropped(reason) => engine_debug!("payload dropped: {}", reason),
            scene @ Submission::SceneStarted(_) => last_scene = Some(scene),
            Submission::SpeechApplied => {}
        }
    }

    if let Some(scene) = last_scene {
        scene.finished().await;
    }
    frames.abort();

    let session = orchestrator.session();
    engine_info!(
        "input closed: received {}, processed {}, dropped {} busy / {} malformed",
        session.received,
        session.processed,
        session.dropped_busy,
        session.dropped_malformed
    );
    Ok(())
}
