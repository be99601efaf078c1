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

//! HTTP surface of the node.
//!
//! ## Endpoints
//!
//! - `GET  /params`
//! - `GET  /programs/:id`
//! - `GET  /programs/status/:status` (`upcoming`, `ongoing`, `completed`)
//! - `GET  /total-bonded`, `GET /total-bonded/:denom`
//! - `GET  /total-unbonding`, `GET /total-unbonding/:denom`
//! - `GET  /pending-rewards/:addr`
//! - `GET  /account-bonds/:addr`
//! - `GET  /restricted-collateral/:addr/:denom`
//! - `GET  /current-rates/:denom`
//! - `GET  /actual-rates/:denom`
//! - `GET  /last-reward-time`
//! - `GET  /state-root`
//! - `GET  /genesis`
//! - `GET  /metrics`
//! - `POST /msgs` (one JSON-encoded message)
//!
//! uToken denoms contain a `/` (`u/uumee`), so denom segments are wildcard
//! captures.
//!
//! Messages posted to `/msgs` carry no signature. The endpoint answers 403
//! unless [`RpcState::accept_msgs`] is set.
//!
//! Calls that commit or scan the store run on the blocking pool.

use crate::core::app::App;
use crate::core::incentive::errors::IncentiveError;
use crate::core::incentive::msg::Msg;
use crate::core::incentive::types::ProgramStatus;
use crate::core::state::merkle::root_hex;
use crate::core::types::Address;
use crate::monitoring::metrics::Metrics;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinError;

/// Shared handler state.
#[derive(Clone)]
pub struct RpcState {
    /// Application (serialized access).
    pub app: Arc<Mutex<App>>,
    /// Metrics registry rendered at `/metrics`.
    pub metrics: Arc<Metrics>,
    /// Serve `POST /msgs`.
    pub accept_msgs: bool,
}

/// Run `f` on the blocking pool with exclusive access to the app.
pub async fn blocking<T, F>(app: &Arc<Mutex<App>>, f: F) -> Result<T, JoinError>
where
    T: Send + 'static,
    F: FnOnce(&mut App) -> T + Send + 'static,
{
    let mut guard = app.clone().lock_owned().await;
    tokio::task::spawn_blocking(move || f(&mut guard)).await
}

/// Error body returned by every handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<IncentiveError> for ApiError {
    fn from(e: IncentiveError) -> Self {
        let status = match &e {
            IncentiveError::NotFound(_) => StatusCode::NOT_FOUND,
            IncentiveError::State(_)
            | IncentiveError::Codec(_)
            | IncentiveError::Invariant(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("task: {e}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

fn to_json<T: Serialize>(v: &T) -> ApiResult {
    serde_json::to_value(v).map(Json).map_err(|e| ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: e.to_string(),
    })
}

fn parse_addr(raw: &str) -> Result<Address, ApiError> {
    Address::from_str(raw).map_err(|e| IncentiveError::from(e).into())
}

fn denom_segment(raw: &str) -> &str {
    raw.trim_start_matches('/')
}

/// Build the router.
pub fn router(state: RpcState) -> Router {
    Router::new()
        .route("/params", get(params))
        .route("/programs/:id", get(program))
        .route("/programs/status/:status", get(programs))
        .route("/total-bonded", get(total_bonded))
        .route("/total-bonded/*denom", get(total_bonded_of))
        .route("/total-unbonding", get(total_unbonding))
        .route("/total-unbonding/*denom", get(total_unbonding_of))
        .route("/pending-rewards/:addr", get(pending_rewards))
        .route("/account-bonds/:addr", get(account_bonds))
        .route("/restricted-collateral/:addr/*denom", get(restricted_collateral))
        .route("/current-rates/*denom", get(current_rates))
        .route("/actual-rates/*denom", get(actual_rates))
        .route("/last-reward-time", get(last_reward_time))
        .route("/state-root", get(state_root))
        .route("/genesis", get(genesis))
        .route("/metrics", get(metrics))
        .route("/msgs", post(deliver))
        .with_state(state)
}

async fn params(State(s): State<RpcState>) -> ApiResult {
    let app = s.app.lock().await;
    to_json(&app.querier().params()?)
}

async fn program(State(s): State<RpcState>, Path(id): Path<u32>) -> ApiResult {
    let app = s.app.lock().await;
    to_json(&app.querier().program(id)?)
}

async fn programs(State(s): State<RpcState>, Path(status): Path<String>) -> ApiResult {
    let status = ProgramStatus::from_str(&status)?;
    let app = s.app.lock().await;
    to_json(&app.querier().programs(status)?)
}

async fn total_bonded(State(s): State<RpcState>) -> ApiResult {
    let app = s.app.lock().await;
    to_json(&app.querier().total_bonded(None)?)
}

async fn total_bonded_of(State(s): State<RpcState>, Path(denom): Path<String>) -> ApiResult {
    let app = s.app.lock().await;
    to_json(&app.querier().total_bonded(Some(denom_segment(&denom)))?)
}

async fn total_unbonding(State(s): State<RpcState>) -> ApiResult {
    let app = s.app.lock().await;
    to_json(&app.querier().total_unbonding(None)?)
}

async fn total_unbonding_of(State(s): State<RpcState>, Path(denom): Path<String>) -> ApiResult {
    let app = s.app.lock().await;
    to_json(&app.querier().total_unbonding(Some(denom_segment(&denom)))?)
}

async fn pending_rewards(State(s): State<RpcState>, Path(addr): Path<String>) -> ApiResult {
    let addr = parse_addr(&addr)?;
    let app = s.app.lock().await;
    to_json(&app.querier().pending_rewards(&addr)?)
}

async fn account_bonds(State(s): State<RpcState>, Path(addr): Path<String>) -> ApiResult {
    let addr = parse_addr(&addr)?;
    let app = s.app.lock().await;
    to_json(&app.querier().account_bonds(&addr)?)
}

async fn restricted_collateral(
    State(s): State<RpcState>,
    Path((addr, denom)): Path<(String, String)>,
) -> ApiResult {
    let addr = parse_addr(&addr)?;
    let denom = denom_segment(&denom);
    let app = s.app.lock().await;
    let amount = app.querier().restricted_collateral(&addr, denom)?;
    Ok(Json(json!({ "denom": denom, "amount": amount })))
}

async fn current_rates(State(s): State<RpcState>, Path(denom): Path<String>) -> ApiResult {
    let app = s.app.lock().await;
    to_json(&app.querier().current_rates(denom_segment(&denom))?)
}

async fn actual_rates(State(s): State<RpcState>, Path(denom): Path<String>) -> ApiResult {
    let app = s.app.lock().await;
    to_json(&app.querier().actual_rates(denom_segment(&denom))?)
}

async fn last_reward_time(State(s): State<RpcState>) -> ApiResult {
    let app = s.app.lock().await;
    let t = app.querier().last_reward_time()?;
    Ok(Json(json!({ "last_rewards_time": t })))
}

async fn state_root(State(s): State<RpcState>) -> ApiResult {
    let root = blocking(&s.app, |app| app.state_root()).await??;
    Ok(Json(json!({ "state_root": root_hex(&root) })))
}

async fn genesis(State(s): State<RpcState>) -> ApiResult {
    to_json(&blocking(&s.app, |app| app.export_genesis()).await??)
}

async fn metrics(State(s): State<RpcState>) -> Result<String, ApiError> {
    s.metrics.render().map_err(|e| ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: e.to_string(),
    })
}

async fn deliver(State(s): State<RpcState>, Json(msg): Json<Msg>) -> ApiResult {
    if !s.accept_msgs {
        return Err(ApiError {
            status: StatusCode::FORBIDDEN,
            message: "message submission is disabled".into(),
        });
    }
    to_json(&blocking(&s.app, move |app| app.deliver(&msg)).await??)
}
