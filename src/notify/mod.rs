pub mod http;
pub mod status;

pub use http::{send_action, HttpNotifier, NotifyError, FORM_CONTENT_TYPE};
pub use status::StatusMessage;

use crate::types::StepEvent;

/// Whether a notification left the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Sent,
    /// No endpoint configured.
    Skipped,
}

/// Outbound side of the step detector. Implementations must not block the
/// caller on network I/O.
pub trait NotificationSink {
    fn notify(&mut self, event: &StepEvent) -> Dispatch;
}
