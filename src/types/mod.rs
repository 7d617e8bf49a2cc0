pub mod data_point;
pub mod endpoint;
pub mod events;

pub use data_point::DataPoint;
pub use endpoint::ServerEndpoint;
pub use events::{Action, StepEvent};
