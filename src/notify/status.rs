use std::sync::{Arc, Mutex};

/// Display-only status text shared between in-flight sends and the readout.
#[derive(Debug, Clone, Default)]
pub struct StatusMessage {
    inner: Arc<Mutex<String>>,
}

impl StatusMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, message: impl Into<String>) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = message.into();
    }

    pub fn get(&self) -> String {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_message() {
        let status = StatusMessage::new();
        let other = status.clone();
        assert_eq!(status.get(), "");
        other.set("Sent: play");
        assert_eq!(status.get(), "Sent: play");
    }
}
