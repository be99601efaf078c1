// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Incentive node entrypoint (systemd-friendly).
//! Opens state, imports genesis once, drives end-of-block on a timer and
//! serves the HTTP surface until ctrl-c.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use amunchain_incentive::core::app::App;
use amunchain_incentive::core::config::{LogFormat, LoggingConfig, NodeConfig};
use amunchain_incentive::core::incentive::{BlockOutcome, GenesisState};
use amunchain_incentive::core::state::persistent_state::PersistentState;
use amunchain_incentive::monitoring::metrics::Metrics;
use amunchain_incentive::rpc::{self, RpcState};
use anyhow::{anyhow, Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn init_tracing(cfg: &LoggingConfig) -> Result<()> {
    let level = tracing::Level::from_str(&cfg.level)
        .map_err(|_| anyhow!("invalid log level {}", cfg.level))?;
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level);
    match cfg.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow!("tracing init: {e}"))
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn load_genesis(path: Option<&str>) -> Result<GenesisState> {
    let Some(path) = path else {
        return Ok(GenesisState::default());
    };
    let raw = std::fs::read_to_string(path).with_context(|| format!("read genesis {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parse genesis {path}"))
}

async fn run_blocks(app: Arc<Mutex<App>>, interval_ms: u64) {
    let mut tick = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
    loop {
        tick.tick().await;
        let now = unix_now();
        let outcome = match rpc::blocking(&app, move |app| app.end_block(now)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(block_time = now, error = %e, "end block task failed");
                continue;
            }
        };
        match outcome {
            Ok(BlockOutcome::Processed {
                distributed,
                transitions,
                ..
            }) => {
                debug!(block_time = now, %distributed, ?transitions, "block processed");
            }
            Ok(BlockOutcome::Skipped {
                last_rewards_time, ..
            }) => {
                warn!(block_time = now, last_rewards_time, "block skipped");
            }
            Err(e) => error!(block_time = now, error = %e, "end block failed"),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "ctrl-c handler failed");
        std::future::pending::<()>().await;
    }
    warn!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| env("AMUN_INCENTIVE_CONFIG", "./incentive.toml"));
    let cfg = NodeConfig::load(&path).with_context(|| format!("load config {path}"))?;
    init_tracing(&cfg.logging)?;

    info!(
        node = %cfg.node.name,
        data_dir = %cfg.node.data_dir,
        git_sha = option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        "incentive node starting"
    );

    let metrics = Arc::new(Metrics::new().context("metrics init")?);
    let state = PersistentState::open(&cfg.node.data_dir).context("open state")?;
    let (bank, collateral, oracle) = cfg.build_keepers().context("build keepers")?;
    let mut app = App::new(state, bank, collateral, oracle).with_metrics(metrics.clone());

    if app.is_empty() {
        let genesis = load_genesis(cfg.chain.genesis_path.as_deref())?;
        genesis.validate().context("validate genesis")?;
        app.init_genesis(&genesis).context("import genesis")?;
    }

    let app = Arc::new(Mutex::new(app));
    let driver = tokio::spawn(run_blocks(app.clone(), cfg.chain.block_interval_ms));

    if cfg.http.accept_msgs {
        warn!("unsigned message submission enabled on POST /msgs");
    }
    let router = rpc::router(RpcState {
        app: app.clone(),
        metrics,
        accept_msgs: cfg.http.accept_msgs,
    });
    let listener = tokio::net::TcpListener::bind(&cfg.http.listen_addr)
        .await
        .with_context(|| format!("bind {}", cfg.http.listen_addr))?;
    info!(addr = %cfg.http.listen_addr, "http listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    driver.abort();
    rpc::blocking(&app, |app| app.flush())
        .await
        .context("flush task")?
        .context("flush state")?;
    info!("shutdown complete");
    Ok(())
}
