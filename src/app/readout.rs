use crate::motion::format_axis;
use crate::types::DataPoint;
use crate::utils::format_timestamp;

/// Text rendering of the live sensor view.
pub struct Readout<'a> {
    pub sample: &'a DataPoint,
    pub magnitude: Option<f64>,
    pub steps: u64,
    pub walking: bool,
    pub status: &'a str,
}

impl Readout<'_> {
    pub fn render(&self) -> String {
        let time = self
            .sample
            .timestamp
            .map(format_timestamp)
            .unwrap_or_else(|| "--:--:--.---".to_string());
        let magnitude = self
            .magnitude
            .map(|m| format!("{:.3}", m))
            .unwrap_or_else(|| "N/A".to_string());
        let state = if self.walking { "walking" } else { "idle" };

        let mut line = format!(
            "[{}] X: {} Y: {} Z: {} | |a|={} | Steps: {} ({})",
            time,
            format_axis(self.sample.x),
            format_axis(self.sample.y),
            format_axis(self.sample.z),
            magnitude,
            self.steps,
            state,
        );
        if !self.status.is_empty() {
            line.push_str(" | ");
            line.push_str(self.status);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_full_sample() {
        let sample = DataPoint::new(0.104, -0.2, 0.98, 3_723_004);
        let line = Readout {
            sample: &sample,
            magnitude: Some(1.0),
            steps: 4,
            walking: true,
            status: "Sent: play",
        }
        .render();
        assert_eq!(
            line,
            "[01:02:03.004] X: 0.10 Y: -0.20 Z: 0.98 | |a|=1.000 | Steps: 4 (walking) | Sent: play"
        );
    }

    #[test]
    fn renders_missing_axis_as_not_available() {
        let sample = DataPoint {
            x: Some(0.5),
            y: None,
            z: Some(1.0),
            timestamp: None,
        };
        let line = Readout {
            sample: &sample,
            magnitude: None,
            steps: 0,
            walking: false,
            status: "",
        }
        .render();
        assert_eq!(
            line,
            "[--:--:--.---] X: 0.50 Y: N/A Z: 1.00 | |a|=N/A | Steps: 0 (idle)"
        );
    }
}
