use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Router};
use log::{info, warn};
use serde::Deserialize;
use tokio::net::TcpListener;

use super::event_log::EventLog;
use super::playback::PlaybackState;
use crate::types::Action;

/// Shared state behind the `/control` route.
pub struct ReceiverContext {
    playback: Mutex<PlaybackState>,
    event_log: EventLog,
}

impl ReceiverContext {
    pub fn new(event_log: EventLog) -> Self {
        Self {
            playback: Mutex::new(PlaybackState::new(Instant::now())),
            event_log,
        }
    }

    pub fn playback(&self) -> MutexGuard<'_, PlaybackState> {
        self.playback.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ControlForm {
    pub action: Option<String>,
    pub steps: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ControlRequest {
    pub action: String,
    pub steps: Option<u64>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ControlRejection {
    #[error("Missing 'action' parameter")]
    MissingAction,
    #[error("Invalid 'steps' parameter")]
    InvalidSteps,
}

/// 校验表单：必须有 action，steps 可选但必须是非负整数
pub fn parse_control(form: ControlForm) -> Result<ControlRequest, ControlRejection> {
    let action = form.action.ok_or(ControlRejection::MissingAction)?;
    let steps = match form.steps {
        Some(raw) => Some(
            raw.trim()
                .parse::<u64>()
                .map_err(|_| ControlRejection::InvalidSteps)?,
        ),
        None => None,
    };
    Ok(ControlRequest { action, steps })
}

fn text_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

async fn handle_control(
    State(ctx): State<Arc<ReceiverContext>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Form(form): Form<ControlForm>,
) -> Response {
    let request = match parse_control(form) {
        Ok(request) => request,
        Err(rejection) => {
            warn!("Rejected control request from {}: {}", peer.ip(), rejection);
            return text_response(StatusCode::BAD_REQUEST, rejection.to_string());
        }
    };

    let action = Action::parse(&request.action);
    {
        let mut playback = ctx.playback();
        if let Some(steps) = request.steps {
            playback.set_steps(steps);
        }
        match action {
            Some(action) => {
                playback.apply(action, peer.ip(), Instant::now());
                info!("{} (steps: {})", playback.event_message(), playback.steps());
            }
            None => warn!("Ignoring unknown action '{}' from {}", request.action, peer.ip()),
        }
    }

    if let Some(action) = action {
        if let Err(e) = ctx.event_log.record_event(action, peer.ip()).await {
            warn!("Error logging event: {}", e);
        }
    }

    text_response(
        StatusCode::OK,
        format!("Action received: {}", request.action),
    )
}

pub fn router(ctx: Arc<ReceiverContext>) -> Router {
    Router::new()
        .route("/control", post(handle_control))
        .with_state(ctx)
}

/// Serve `/control` on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    ctx: Arc<ReceiverContext>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(
        listener,
        router(ctx).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}

/// Logs the playback status line periodically while playing.
pub async fn run_status_ticker(ctx: Arc<ReceiverContext>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let playback = ctx.playback();
        if !playback.is_paused() {
            info!("{}", playback.status_line(Instant::now()));
        }
    }
}
