use async_trait::async_trait;

use crate::traits::FrameProcessor;

/// Runs the appended processors in order, stopping at the first one that swallows the frame.
pub struct Sequential<F> {
    processors: Vec<Box<dyn FrameProcessor<F> + Send>>,
}

impl<F> Sequential<F> {
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    pub fn append<T: 'static + FrameProcessor<F> + Send>(mut self, processor: T) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn push<T: 'static + FrameProcessor<F> + Send>(&mut self, processor: T) {
        self.processors.push(Box::new(processor));
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl<F> Default for Sequential<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<F: Send> FrameProcessor<F> for Sequential<F> {
    async fn process(&mut self, frame_data: F) -> Option<F> {
        let mut result = Some(frame_data);

        for processor in &mut self.processors {
            let Some(frame_data) = result else {
                break;
            };
            result = processor.process(frame_data).await;
        }

        result
    }
}
