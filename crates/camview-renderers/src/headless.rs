use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;
use camview_codec::DecodedFrame;
use camview_core::traits::{BorrowFrameProperties, FrameProcessor};
use log::info;

/// Stands in for a display: counts the frames it is handed and logs one out of `log_every`.
pub struct HeadlessRenderer<K> {
    buffer_key: K,
    log_every: u64,
    rendered_frames: Arc<AtomicU64>,
}

impl<K> HeadlessRenderer<K> {
    pub fn new(buffer_key: K) -> Self {
        Self {
            buffer_key,
            log_every: 30,
            rendered_frames: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn log_every(mut self, log_every: u64) -> Self {
        self.log_every = log_every.max(1);
        self
    }

    /// Shared counter of the frames rendered so far.
    pub fn rendered_frames(&self) -> Arc<AtomicU64> {
        self.rendered_frames.clone()
    }
}

#[async_trait]
impl<F, K> FrameProcessor<F> for HeadlessRenderer<K>
where
    K: Send,
    F: BorrowFrameProperties<K, DecodedFrame> + Send + 'static,
{
    async fn process(&mut self, frame_data: F) -> Option<F> {
        if let Some(frame) = frame_data.get_ref(&self.buffer_key) {
            let rendered = self.rendered_frames.fetch_add(1, Ordering::Relaxed) + 1;

            if rendered % self.log_every == 0 {
                info!(
                    "Frame #{}: {}x{}",
                    rendered,
                    frame.width(),
                    frame.height()
                );
            }
        }

        Some(frame_data)
    }
}
