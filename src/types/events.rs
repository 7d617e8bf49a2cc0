use std::fmt;

/// Remote playback action carried by a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Play,
    Pause,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Play => "play",
            Action::Pause => "pause",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "play" => Some(Action::Play),
            "pause" => Some(Action::Pause),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A walking/idle transition produced by the step detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    pub action: Action,
    pub steps: u64,
}

impl StepEvent {
    pub fn play(steps: u64) -> Self {
        Self { action: Action::Play, steps }
    }

    pub fn pause(steps: u64) -> Self {
        Self { action: Action::Pause, steps }
    }

    /// Form-encoded request body, e.g. `action=play&steps=3`.
    pub fn form_body(&self) -> String {
        format!("action={}&steps={}", self.action, self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_body_matches_wire_format() {
        assert_eq!(StepEvent::play(1).form_body(), "action=play&steps=1");
        assert_eq!(StepEvent::pause(12).form_body(), "action=pause&steps=12");
    }

    #[test]
    fn parse_only_accepts_known_actions() {
        assert_eq!(Action::parse("play"), Some(Action::Play));
        assert_eq!(Action::parse("pause"), Some(Action::Pause));
        assert_eq!(Action::parse("PLAY"), None);
        assert_eq!(Action::parse("stop"), None);
    }
}
