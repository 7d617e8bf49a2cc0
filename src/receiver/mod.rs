//! HTTP control receiver: applies `play`/`pause` notifications to a
//! playback clock and keeps an append-only event log.

pub mod event_log;
pub mod playback;
pub mod server;

pub use event_log::EventLog;
pub use playback::PlaybackState;
pub use server::{parse_control, router, run_status_ticker, serve, ControlForm, ReceiverContext};
