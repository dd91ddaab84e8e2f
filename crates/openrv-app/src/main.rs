//! openrv-replay - headless session runner
//!
//! Replays a JSON event script against a review session on a simulated
//! clock and prints the resulting state snapshots.
//!
//! ```text
//! openrv-replay <script.json> [--config <config.json>]
//! ```
//!
//! A script is an object with an optional `media` description and a list
//! of `steps`. Each step is either a session event
//! (`{"type": "set_exposure", "value": 1.0}`) or a pause in simulated time
//! (`{"advance_ms": 500}`), during which the session is ticked at the
//! configured tick interval.

use anyhow::{bail, Context, Result};
use openrv_core::{FrameRate, MediaInfo, SessionConfig, TransferFunction};
use openrv_session::{ManualClock, Session, SessionEvent};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    media: MediaSpec,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MediaSpec {
    name: String,
    width: u32,
    height: u32,
    fps: u32,
    frames: i64,
    transfer: TransferFunction,
}

impl Default for MediaSpec {
    fn default() -> Self {
        Self {
            name: "untitled".to_string(),
            width: 1920,
            height: 1080,
            fps: 24,
            frames: 100,
            transfer: TransferFunction::Linear,
        }
    }
}

impl MediaSpec {
    fn to_media(&self) -> Result<MediaInfo> {
        let media = MediaInfo::video(
            self.name.clone(),
            self.width,
            self.height,
            FrameRate::new(self.fps, 1),
            self.frames,
        )?;
        Ok(media.with_transfer(self.transfer))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Step {
    Advance { advance_ms: u64 },
    Event(SessionEvent),
}

struct Args {
    script: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut script = None;
    let mut config = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(PathBuf::from(
                    args.next().context("--config needs a path")?,
                ));
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            path => script = Some(PathBuf::from(path)),
        }
    }
    Ok(Args {
        script: script.context("usage: openrv-replay <script.json> [--config <config.json>]")?,
        config,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => SessionConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    let data = std::fs::read(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let script: Script = serde_json::from_slice(&data).context("parsing script")?;

    let clock = ManualClock::new();
    let tick = config.tick_interval();
    let mut session = Session::with_clock(script.media.to_media()?, config, Arc::new(clock.clone()));

    info!(steps = script.steps.len(), "Replaying script");
    for (index, step) in script.steps.into_iter().enumerate() {
        match step {
            Step::Advance { advance_ms } => {
                let mut remaining = Duration::from_millis(advance_ms);
                while !remaining.is_zero() {
                    let slice = remaining.min(tick);
                    clock.advance(slice);
                    remaining -= slice;
                    session.tick();
                }
            }
            Step::Event(SessionEvent::Shutdown) => break,
            Step::Event(event) => {
                if let Err(err) = session.handle(event) {
                    warn!(step = index, %err, "Step rejected");
                }
            }
        }
    }

    let report = serde_json::json!({
        "session": session.session_state(),
        "color": session.color_state(),
        "transform": session.transform_state(),
        "paint": session.paint_state(),
        "history": session.history_panel_state(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
