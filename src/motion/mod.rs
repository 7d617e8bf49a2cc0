pub mod detector;
pub mod sampler;

pub use detector::{StepDetector, WalkingState, DEFAULT_STEP_THRESHOLD};
pub use sampler::{format_axis, magnitude};
