use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{error, info};
use reqwest::header::CONTENT_TYPE;
use tokio::runtime::Handle;

use super::{Dispatch, NotificationSink, StatusMessage};
use crate::types::{ServerEndpoint, StepEvent};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server responded with status {status}: {body}")]
    Status { status: u16, body: String },
}

/// POST one step event to `http://{host}:{port}/control`.
///
/// Returns the raw response body on a 2xx status. No timeout and no retry.
pub async fn send_action(
    client: &reqwest::Client,
    endpoint: &ServerEndpoint,
    event: StepEvent,
) -> Result<String, NotifyError> {
    let response = client
        .post(endpoint.control_url())
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(event.form_body())
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(NotifyError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// Fire-and-forget HTTP sink. Each event is spawned onto the tokio runtime
/// and never awaited by the sampling thread; concurrent sends are unordered.
pub struct HttpNotifier {
    client: reqwest::Client,
    runtime: Handle,
    endpoint: ServerEndpoint,
    status: StatusMessage,
    in_flight: Arc<AtomicUsize>,
}

impl HttpNotifier {
    pub fn new(runtime: Handle, endpoint: ServerEndpoint, status: StatusMessage) -> Self {
        Self {
            client: reqwest::Client::new(),
            runtime,
            endpoint,
            status,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    pub fn set_endpoint(&mut self, endpoint: ServerEndpoint) {
        info!("Notification endpoint set to {}", endpoint);
        self.endpoint = endpoint;
    }

    /// Number of sends spawned but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl NotificationSink for HttpNotifier {
    fn notify(&mut self, event: &StepEvent) -> Dispatch {
        if !self.endpoint.is_configured() {
            return Dispatch::Skipped;
        }

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let status = self.status.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let event = *event;

        info!(
            "Sending action {} with {} steps to {}",
            event.action,
            event.steps,
            endpoint.control_url()
        );

        in_flight.fetch_add(1, Ordering::SeqCst);
        self.runtime.spawn(async move {
            match send_action(&client, &endpoint, event).await {
                Ok(body) => {
                    info!("Server response: {}", body);
                    status.set(format!("Sent: {}", event.action));
                }
                Err(e) => error!("Failed to send action to server: {}", e),
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });

        Dispatch::Sent
    }
}
