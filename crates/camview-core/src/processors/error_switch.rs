use async_trait::async_trait;
use log::debug;

use crate::{
    error::DropReason,
    traits::{FrameError, FrameProcessor},
};

/// Diverts frames carrying a drop reason to `destination`, letting only healthy frames through.
pub struct OnErrorSwitch<P> {
    destination: P,
}

impl<P> OnErrorSwitch<P> {
    pub fn new(destination: P) -> Self {
        Self { destination }
    }
}

#[async_trait]
impl<F, P> FrameProcessor<F> for OnErrorSwitch<P>
where
    F: FrameError<DropReason> + Send + 'static,
    P: FrameProcessor<F> + Send,
{
    async fn process(&mut self, frame_data: F) -> Option<F> {
        match frame_data.get_error() {
            Some(reason) => {
                debug!("Switching dropped frame ({})", reason);
                self.destination.process(frame_data).await;
                None
            }
            None => Some(frame_data),
        }
    }
}
