//! Deterministic signal generators
//!
//! Produces readings shaped like real receivers: a noisy carrier-to-noise
//! ramp during a GNSS cold start, a BLE beacon walking out of range. Noise
//! comes from a fixed-seed LCG so every run sees the same samples.

use signalquest_core::Timestamp;

use super::TimedReading;

/// Simple seeded generator
pub struct SignalGenerator {
    seed: u32,
    start: Timestamp,
    interval_ms: u64,
}

impl SignalGenerator {
    pub fn new(start: Timestamp, interval_ms: u64) -> Self {
        Self { seed: 42, start, interval_ms }
    }

    /// Timestamp of epoch `i`
    pub fn at(&self, i: usize) -> Timestamp {
        self.start + i as u64 * self.interval_ms
    }

    /// `count` readings at `level` with uniform noise of ±`noise`
    pub fn steady(
        &mut self,
        channel: &'static str,
        level: f32,
        noise: f32,
        first_epoch: usize,
        count: usize,
    ) -> Vec<TimedReading> {
        (first_epoch..first_epoch + count)
            .map(|i| TimedReading::new(channel, level + self.noise(noise), self.at(i)))
            .collect()
    }

    /// Readings from a fixed list, one per epoch
    pub fn series(&self, channel: &'static str, values: &[f32], first_epoch: usize) -> Vec<TimedReading> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| TimedReading::new(channel, *v, self.at(first_epoch + i)))
            .collect()
    }

    /// GNSS receiver epochs: `(cn0, satellites, horizontal accuracy)` per
    /// phase, each phase lasting `epochs` seconds, channels reported in the
    /// order cn0, sats, hacc within an epoch
    pub fn gnss_phases(&mut self, phases: &[(f32, f32, f32, usize)]) -> Vec<TimedReading> {
        let mut readings = Vec::new();
        let mut epoch = 0;
        for &(cn0, sats, hacc, epochs) in phases {
            for _ in 0..epochs {
                let t = self.at(epoch);
                readings.push(TimedReading::new("cn0", cn0 + self.noise(0.5), t));
                readings.push(TimedReading::new("sats", sats, t));
                readings.push(TimedReading::new("hacc", hacc, t));
                epoch += 1;
            }
        }
        readings
    }

    /// Uniform noise in [-amplitude, amplitude]
    fn noise(&mut self, amplitude: f32) -> f32 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        let uniform = (self.seed >> 8) as f32 / (1u32 << 24) as f32;
        (uniform - 0.5) * 2.0 * amplitude
    }
}
