use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::SourceError;
use crate::config::SimulatorConfig;
use crate::types::DataPoint;
use crate::utils::now_millis;

/// Synthetic accelerometer in g units.
///
/// Alternates `walking_seconds` of gait with `idle_seconds` of rest. While
/// walking, the first tick of every `step_period_ms` carries a heel-strike
/// peak around `peak_magnitude`; every other tick sits near 1 g.
pub struct GaitSimulator {
    rng: StdRng,
    config: SimulatorConfig,
    interval_ms: u64,
    tick: u64,
}

impl GaitSimulator {
    pub fn new(config: SimulatorConfig, interval_ms: u64) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            config,
            interval_ms: interval_ms.max(1),
            tick: 0,
        }
    }

    pub fn is_walking_at(&self, elapsed_ms: u64) -> bool {
        let walking_ms = (self.config.walking_seconds.max(0.0) * 1000.0) as u64;
        let idle_ms = (self.config.idle_seconds.max(0.0) * 1000.0) as u64;
        let cycle_ms = walking_ms + idle_ms;
        if cycle_ms == 0 {
            return false;
        }
        elapsed_ms % cycle_ms < walking_ms
    }

    pub fn next_sample(&mut self, timestamp: i64) -> DataPoint {
        let elapsed_ms = self.tick * self.interval_ms;
        self.tick += 1;

        let magnitude = if self.is_walking_at(elapsed_ms) {
            let period = self.config.step_period_ms.max(1);
            if elapsed_ms % period < self.interval_ms {
                self.config.peak_magnitude + self.rng.random_range(-0.1..0.1)
            } else {
                self.rng.random_range(0.9..1.05)
            }
        } else {
            self.rng.random_range(0.97..1.03)
        };

        // 水平方向少量噪声，其余分量落在 z 轴
        let x: f64 = self.rng.random_range(-0.05..0.05);
        let y: f64 = self.rng.random_range(-0.05..0.05);
        let z = (magnitude * magnitude - x * x - y * y).max(0.0).sqrt();
        DataPoint::new(x, y, z, timestamp)
    }
}

pub fn run_simulated_source(
    config: SimulatorConfig,
    interval_ms: u64,
    data_sender: Sender<DataPoint>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(), SourceError> {
    let mut simulator = GaitSimulator::new(config, interval_ms);
    let interval = Duration::from_millis(interval_ms.max(1));
    info!("Simulated gait source started ({}ms interval)", interval_ms);

    while !shutdown_signal.load(Ordering::Relaxed) {
        let sample = simulator.next_sample(now_millis());
        if data_sender.send(sample).is_err() {
            info!("Sample channel disconnected, simulator exiting");
            break;
        }
        thread::sleep(interval);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{magnitude, StepDetector};

    fn seeded_config() -> SimulatorConfig {
        SimulatorConfig {
            seed: Some(42),
            ..SimulatorConfig::default()
        }
    }

    #[test]
    fn one_cycle_yields_one_step_per_period() {
        let config = seeded_config();
        let mut simulator = GaitSimulator::new(config.clone(), 100);
        let mut detector = StepDetector::default();

        let ticks = ((config.walking_seconds + config.idle_seconds) * 10.0) as usize;
        for i in 0..ticks {
            let sample = simulator.next_sample(i as i64 * 100);
            detector.process_sample(magnitude(&sample).unwrap());
        }

        let expected = (config.walking_seconds * 1000.0) as u64 / config.step_period_ms;
        assert_eq!(detector.step_count(), expected);
        assert!(!detector.is_walking());
    }

    #[test]
    fn idle_samples_stay_below_threshold() {
        let config = SimulatorConfig {
            walking_seconds: 0.0,
            idle_seconds: 1.0,
            ..seeded_config()
        };
        let mut simulator = GaitSimulator::new(config, 100);
        for i in 0..100 {
            let m = magnitude(&simulator.next_sample(i)).unwrap();
            assert!(m < 1.2, "idle magnitude {} crossed threshold", m);
        }
    }

    #[test]
    fn zero_length_cycle_is_idle() {
        let config = SimulatorConfig {
            walking_seconds: 0.0,
            idle_seconds: 0.0,
            ..seeded_config()
        };
        let simulator = GaitSimulator::new(config, 100);
        assert!(!simulator.is_walking_at(0));
        assert!(!simulator.is_walking_at(12_345));
    }

    #[test]
    fn same_seed_same_samples() {
        let mut a = GaitSimulator::new(seeded_config(), 100);
        let mut b = GaitSimulator::new(seeded_config(), 100);
        for i in 0..20 {
            assert_eq!(a.next_sample(i), b.next_sample(i));
        }
    }
}
