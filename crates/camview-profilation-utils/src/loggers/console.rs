use std::{
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use camview_core::traits::{FrameProcessor, FrameProperties};
use log::info;

#[derive(Default, Clone, Copy)]
struct Accumulator {
    sum: u128,
    count: u128,
}

impl Accumulator {
    fn average(&self) -> Option<u128> {
        self.sum.checked_div(self.count)
    }
}

/// Logs, once per round, how many frames went through and the average of the chosen stats.
pub struct ConsoleAverageStatsLogger<K> {
    header: Option<String>,
    round_duration: Duration,

    current_round_start: Instant,
    round_frames: u32,

    logged_stats: Vec<K>,
    accumulators: HashMap<K, Accumulator>,
}

impl<K> Default for ConsoleAverageStatsLogger<K> {
    fn default() -> Self {
        Self {
            header: None,
            round_duration: Duration::from_secs(1),
            current_round_start: Instant::now(),
            round_frames: 0,
            logged_stats: Vec::new(),
            accumulators: HashMap::new(),
        }
    }
}

impl<K> ConsoleAverageStatsLogger<K>
where
    K: Copy + Debug + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    // Building functions
    pub fn header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    pub fn round_duration(mut self, round_duration: Duration) -> Self {
        self.round_duration = round_duration;
        self
    }

    pub fn log(mut self, key: K) -> Self {
        self.logged_stats.push(key);
        self
    }

    pub fn average(&self, key: &K) -> Option<u128> {
        self.accumulators.get(key).and_then(Accumulator::average)
    }

    // Logging functions
    fn record<F: FrameProperties<K, u128>>(&mut self, frame_data: &F) {
        self.round_frames += 1;

        for key in &self.logged_stats {
            if let Some(value) = frame_data.get(key) {
                let accumulator = self.accumulators.entry(*key).or_default();
                accumulator.sum += value;
                accumulator.count += 1;
            }
        }
    }

    fn print_round_stats(&self) {
        if let Some(header) = &self.header {
            info!("{}", header);
        }

        let elapsed = self.current_round_start.elapsed().as_secs_f64();
        info!(
            "Frames: {} ({:.1} fps)",
            self.round_frames,
            self.round_frames as f64 / elapsed
        );

        for key in &self.logged_stats {
            if let Some(average) = self.average(key) {
                info!("Average {:?}: {}", key, average);
            }
        }
    }

    fn reset_round(&mut self) {
        self.accumulators.clear();
        self.round_frames = 0;
        self.current_round_start = Instant::now();
    }
}

#[async_trait]
impl<F, K> FrameProcessor<F> for ConsoleAverageStatsLogger<K>
where
    K: Copy + Debug + Eq + Hash + Send,
    F: FrameProperties<K, u128> + Send + 'static,
{
    async fn process(&mut self, frame_data: F) -> Option<F> {
        self.record(&frame_data);

        if self.current_round_start.elapsed() > self.round_duration {
            self.print_round_stats();
            self.reset_round();
        }

        Some(frame_data)
    }
}
