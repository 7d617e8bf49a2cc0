//! StepControl: threshold step detection on an accelerometer stream, with
//! play/pause notifications sent to a remote control receiver over HTTP.

pub mod app;
pub mod config;
pub mod logger;
pub mod motion;
pub mod notify;
pub mod receiver;
pub mod sources;
pub mod storage;
pub mod types;
pub mod utils;

pub use types::{Action, DataPoint, ServerEndpoint, StepEvent};
