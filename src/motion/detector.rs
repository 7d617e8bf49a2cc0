//! Threshold-crossing step detector.
//!
//! Every upward crossing of the threshold counts one step. The first upward
//! crossing after an idle period also flips the detector into walking and
//! yields a `play` event; every downward crossing flips it back to idle and
//! yields a `pause` event carrying the current count.

use crate::types::StepEvent;

pub const DEFAULT_STEP_THRESHOLD: f64 = 1.2;

/// Walking/idle state of the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkingState {
    Idle,
    Walking,
}

#[derive(Debug, Clone)]
pub struct StepDetector {
    threshold: f64,
    previous_magnitude: f64,
    step_count: u64,
    is_walking: bool,
}

impl StepDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            previous_magnitude: 0.0,
            step_count: 0,
            is_walking: false,
        }
    }

    /// Feed one magnitude. Returns the transition event, if any.
    pub fn process_sample(&mut self, magnitude: f64) -> Option<StepEvent> {
        let threshold = self.threshold;
        let mut event = None;

        if magnitude > threshold && self.previous_magnitude <= threshold {
            self.step_count += 1;
            if !self.is_walking {
                self.is_walking = true;
                event = Some(StepEvent::play(self.step_count));
            }
        } else if magnitude <= threshold && self.previous_magnitude > threshold {
            self.is_walking = false;
            event = Some(StepEvent::pause(self.step_count));
        }

        self.previous_magnitude = magnitude;
        event
    }

    /// Process a batch of magnitudes and return all events in order.
    pub fn process_batch(&mut self, magnitudes: &[f64]) -> Vec<StepEvent> {
        magnitudes
            .iter()
            .filter_map(|&m| self.process_sample(m))
            .collect()
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn is_walking(&self) -> bool {
        self.is_walking
    }

    pub fn state(&self) -> WalkingState {
        if self.is_walking {
            WalkingState::Walking
        } else {
            WalkingState::Idle
        }
    }

    pub fn previous_magnitude(&self) -> f64 {
        self.previous_magnitude
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_THRESHOLD)
    }
}
