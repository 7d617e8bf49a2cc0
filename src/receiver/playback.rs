use std::net::IpAddr;
use std::time::{Duration, Instant};

use crate::types::Action;
use crate::utils::format_elapsed;

/// Remote-controlled playback clock.
///
/// Starts playing. Elapsed time only accumulates while not paused.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    paused: bool,
    steps: u64,
    event_message: String,
    accumulated: Duration,
    playing_since: Option<Instant>,
}

impl PlaybackState {
    pub fn new(now: Instant) -> Self {
        Self {
            paused: false,
            steps: 0,
            event_message: String::new(),
            accumulated: Duration::ZERO,
            playing_since: Some(now),
        }
    }

    pub fn apply(&mut self, action: Action, peer: IpAddr, now: Instant) {
        self.set_paused(action == Action::Pause, now);
        self.event_message = format!("Remote event received '{}' from {}", action, peer);
    }

    pub fn set_paused(&mut self, paused: bool, now: Instant) {
        if paused == self.paused {
            return;
        }
        if paused {
            if let Some(since) = self.playing_since.take() {
                self.accumulated += now.saturating_duration_since(since);
            }
        } else {
            self.playing_since = Some(now);
        }
        self.paused = paused;
    }

    pub fn set_steps(&mut self, steps: u64) {
        self.steps = steps;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn event_message(&self) -> &str {
        &self.event_message
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.playing_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }

    pub fn status_line(&self, now: Instant) -> String {
        let mut line = format!(
            "Time: {} | Steps: {}",
            format_elapsed(self.elapsed(now)),
            self.steps
        );
        if !self.event_message.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.event_message);
        }
        line
    }
}
