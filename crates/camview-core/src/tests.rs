use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;

use crate::{
    error::DropReason,
    processors::{containers::sequential::Sequential, error_switch::OnErrorSwitch, functional::Function},
    traits::{FrameError, FrameProcessor},
};

#[derive(Default, Debug)]
struct TestFrameData {
    visits: u32,
    error: Option<DropReason>,
}

impl FrameError<DropReason> for TestFrameData {
    fn report_error(&mut self, error: DropReason) {
        self.error = Some(error);
    }

    fn get_error(&self) -> Option<DropReason> {
        self.error
    }
}

struct Counter {
    count: Arc<AtomicUsize>,
}

#[async_trait]
impl FrameProcessor<TestFrameData> for Counter {
    async fn process(&mut self, mut frame_data: TestFrameData) -> Option<TestFrameData> {
        self.count.fetch_add(1, Ordering::SeqCst);
        frame_data.visits += 1;
        Some(frame_data)
    }
}

fn counter() -> (Counter, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    (
        Counter {
            count: count.clone(),
        },
        count,
    )
}

#[tokio::test]
async fn sequential_runs_every_stage() {
    let (first, _) = counter();
    let (second, _) = counter();
    let mut chain = Sequential::new().append(first).append(second);

    let frame_data = chain.process(TestFrameData::default()).await.unwrap();
    assert_eq!(frame_data.visits, 2);
}

#[tokio::test]
async fn sequential_stops_when_a_stage_swallows_the_frame() {
    let (after, after_count) = counter();
    let mut chain = Sequential::new()
        .append(Function::new(|_: TestFrameData| None))
        .append(after);

    assert!(chain.process(TestFrameData::default()).await.is_none());
    assert_eq!(after_count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn error_switch_diverts_dropped_frames() {
    let (dropped, dropped_count) = counter();
    let (rendered, rendered_count) = counter();
    let mut chain = Sequential::new()
        .append(OnErrorSwitch::new(dropped))
        .append(rendered);

    let mut broken = TestFrameData::default();
    broken.report_error(DropReason::BadImage);

    assert!(chain.process(broken).await.is_none());
    assert!(chain.process(TestFrameData::default()).await.is_some());

    assert_eq!(dropped_count.load(Ordering::SeqCst), 1);
    assert_eq!(rendered_count.load(Ordering::SeqCst), 1);
}
