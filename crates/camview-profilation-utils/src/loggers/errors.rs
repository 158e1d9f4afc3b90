use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use camview_core::{
    error::DropReason,
    traits::{FrameError, FrameProcessor},
};
use log::info;

/// Counts dropped frames by reason and logs the counts once per round.
///
/// Rounds are closed by whatever frame comes next, dropped or not, so the logger has to see
/// healthy frames too.
pub struct ConsoleDropReasonLogger {
    header: Option<String>,
    round_duration: Duration,

    current_round_start: Instant,

    dropped_frames: HashMap<DropReason, u32>,
}

impl Default for ConsoleDropReasonLogger {
    fn default() -> Self {
        Self {
            header: None,
            round_duration: Duration::from_secs(1),
            current_round_start: Instant::now(),
            dropped_frames: HashMap::new(),
        }
    }
}

impl ConsoleDropReasonLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    pub fn round_duration(mut self, round_duration: Duration) -> Self {
        self.round_duration = round_duration;
        self
    }

    pub fn dropped(&self, reason: DropReason) -> u32 {
        self.dropped_frames.get(&reason).copied().unwrap_or(0)
    }

    fn print_round_stats(&self) {
        if let Some(header) = &self.header {
            info!("{}", header);
        }

        let dropped_frames_count: u32 = self.dropped_frames.values().sum();
        info!("Dropped frames: {}", dropped_frames_count);

        for reason in DropReason::ALL {
            let count = self.dropped(reason);
            if count > 0 {
                info!("{}: {}", reason, count);
            }
        }
    }

    fn reset_round(&mut self) {
        self.dropped_frames.clear();
        self.current_round_start = Instant::now();
    }
}

#[async_trait]
impl<F> FrameProcessor<F> for ConsoleDropReasonLogger
where
    F: FrameError<DropReason> + Send + 'static,
{
    async fn process(&mut self, frame_data: F) -> Option<F> {
        if let Some(reason) = frame_data.get_error() {
            *self.dropped_frames.entry(reason).or_insert(0) += 1;
        }

        if self.current_round_start.elapsed() > self.round_duration {
            self.print_round_stats();
            self.reset_round();
        }

        Some(frame_data)
    }
}
