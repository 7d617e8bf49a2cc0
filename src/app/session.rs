use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, info};

use super::readout::Readout;
use crate::motion::{magnitude, StepDetector};
use crate::notify::{Dispatch, NotificationSink, StatusMessage};
use crate::types::{DataPoint, StepEvent};

/// Owns the detector and the outbound sink. Samples are processed one at a
/// time on a single thread; only the sink reaches the network.
pub struct StepSession<S: NotificationSink> {
    detector: StepDetector,
    sink: S,
    status: StatusMessage,
    summary_every: u64,
    processed: u64,
    skipped: u64,
}

impl<S: NotificationSink> StepSession<S> {
    pub fn new(detector: StepDetector, sink: S, status: StatusMessage) -> Self {
        Self {
            detector,
            sink,
            status,
            summary_every: 0,
            processed: 0,
            skipped: 0,
        }
    }

    pub fn with_summary_every(mut self, summary_every: u64) -> Self {
        self.summary_every = summary_every;
        self
    }

    /// Runs one sample through magnitude, detection and notification.
    ///
    /// Samples with a missing or non-finite axis are skipped: the detector
    /// does not advance and its previous magnitude is kept.
    pub fn handle_sample(&mut self, sample: &DataPoint) -> Option<StepEvent> {
        let magnitude = magnitude(sample);
        let event = match magnitude {
            Some(m) => {
                self.processed += 1;
                self.detector.process_sample(m)
            }
            None => {
                self.skipped += 1;
                debug!("Skipping sample with missing axis: {:?}", sample);
                None
            }
        };

        if let Some(event) = event {
            info!(
                "Walking {} ({} steps)",
                if self.detector.is_walking() { "started" } else { "stopped" },
                event.steps
            );
            if self.sink.notify(&event) == Dispatch::Skipped {
                debug!("No server configured, {} not sent", event.action);
            }
        }

        let status = self.status.get();
        let readout = Readout {
            sample,
            magnitude,
            steps: self.detector.step_count(),
            walking: self.detector.is_walking(),
            status: &status,
        };
        debug!("{}", readout.render());
        if self.summary_every > 0 && magnitude.is_some() && self.processed % self.summary_every == 0 {
            info!("{}", readout.render());
        }

        event
    }

    pub fn detector(&self) -> &StepDetector {
        &self.detector
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Consume samples until shutdown or until the source hangs up.
    pub fn run(&mut self, receiver: Receiver<DataPoint>, shutdown_signal: Arc<AtomicBool>) {
        info!("Step session started");

        while !shutdown_signal.load(Ordering::Relaxed) {
            match receiver.recv_timeout(Duration::from_millis(100)) {
                Ok(sample) => {
                    self.handle_sample(&sample);
                }
                Err(RecvTimeoutError::Timeout) => {
                    // 超时，继续循环检查关闭信号
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Sample source disconnected, step session exiting");
                    break;
                }
            }
        }

        info!(
            "Step session finished: {} steps, {} samples processed, {} skipped",
            self.detector.step_count(),
            self.processed,
            self.skipped
        );
    }
}
