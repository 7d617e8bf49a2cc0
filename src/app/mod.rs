pub mod endpoint;
pub mod readout;
pub mod session;

pub use endpoint::{apply_env_overrides, select_endpoint};
pub use readout::Readout;
pub use session::StepSession;
