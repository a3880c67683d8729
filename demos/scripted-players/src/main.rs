//! Spawns a table of scripted players against a live game server.
//!
//! Every player joins the same room, plays the first card in hand when its
//! turn comes and passes on every action window. The process runs until
//! every server connection closes or Ctrl-C is pressed.
//!
//! Environment:
//!
//! | variable      | default               |
//! |---------------|-----------------------|
//! | `SERVER_URL`  | `ws://127.0.0.1:5555` |
//! | `ROOM_ID`     | (server picks)        |
//! | `PLAYERS`     | `4`                   |
//! | `REACTION_MS` | `1000`                |
//! | `JITTER_MS`   | `0`                   |
//! | `RUST_LOG`    | `info`                |

use std::env;
use std::time::Duration;

use tileprobe::prelude::*;
use tileprobe::DEFAULT_SERVER_URL;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

struct DemoConfig {
    url: String,
    room: String,
    players: u32,
    delay: DelayConfig,
}

fn env_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse_u64(name: &str, default: u64) -> Result<u64, String> {
    match env_optional(name) {
        Some(v) => v.trim().parse().map_err(|_| format!("invalid {name}: {v}")),
        None => Ok(default),
    }
}

impl DemoConfig {
    fn from_env() -> Result<Self, String> {
        let players = env_parse_u64("PLAYERS", 4)?;
        let players = u32::try_from(players.clamp(1, 16)).unwrap_or(4);
        let delay = DelayConfig::default()
            .with_reaction_delay(Duration::from_millis(env_parse_u64("REACTION_MS", 1000)?))
            .with_jitter(Duration::from_millis(env_parse_u64("JITTER_MS", 0)?));
        Ok(Self {
            url: env_optional("SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            room: env_optional("ROOM_ID").unwrap_or_default(),
            players,
            delay,
        })
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

async fn run_player(
    index: u32,
    url: String,
    config: ProbeConfig,
    mut stop: watch::Receiver<bool>,
) -> Result<SessionReport, ProbeError> {
    let client = ProbeClient::builder()
        .url(&url)
        .config(config)
        .connect(ProbePolicy::default())
        .await?;
    info!(player = index, "connected");
    client
        .run_until(async move {
            let _ = stop.wait_for(|stopped| *stopped).await;
        })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    let demo = DemoConfig::from_env()?;
    info!(
        url = %demo.url,
        room = %demo.room,
        players = demo.players,
        delay_ms = demo.delay.reaction_delay.as_millis() as u64,
        "starting scripted players"
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, stopping players");
            let _ = stop_tx.send(true);
        }
    });

    let mut tasks = Vec::new();
    for index in 0..demo.players {
        let config = ProbeConfig::new(format!("probe-{index}"))
            .with_nickname(format!("Probe {index}"))
            .with_room(demo.room.as_str())
            .with_delay(demo.delay.clone());
        let task = tokio::spawn(run_player(
            index,
            demo.url.clone(),
            config,
            stop_rx.clone(),
        ));
        tasks.push((index, task));
    }

    for (index, task) in tasks {
        match task.await {
            Ok(Ok(report)) => info!(
                player = %report.player_id,
                seat = ?report.seat,
                end = ?report.end,
                rounds = report.outcomes.len(),
                score = report.total_score(),
                actions = report.dispatch.actions,
                desyncs = report.dispatch.desyncs,
                decode_errors = report.dispatch.decode_errors,
                "player finished"
            ),
            Ok(Err(e)) => error!(player = index, error = %e, "player failed"),
            Err(e) => warn!(player = index, error = %e, "player task aborted"),
        }
    }
    Ok(())
}
