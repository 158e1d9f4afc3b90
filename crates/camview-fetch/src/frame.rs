use std::collections::HashMap;

use camview_codec::DecodedFrame;
use camview_core::{
    error::DropReason,
    traits::{BorrowFrameProperties, FrameError, FrameProperties, PullableFrameProperties},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameStat {
    /// Position of the frame among the ones fetched on its connection, starting at 1.
    FrameIndex,

    /// Request to decoded image, in microseconds.
    FetchLatency,

    /// Base64 payload length announced by the server.
    PayloadSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSlot {
    Decoded,
}

/// Per-tick DTO flowing through the fetch loop processors.
#[derive(Debug, Default)]
pub struct FetchedFrame {
    decoded: Option<DecodedFrame>,
    stats: HashMap<FrameStat, u128>,
    drop_reason: Option<DropReason>,
}

impl FetchedFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dropped(reason: DropReason) -> Self {
        let mut frame_data = Self::default();
        frame_data.report_error(reason);
        frame_data
    }
}

impl FrameProperties<FrameStat, u128> for FetchedFrame {
    fn set(&mut self, key: FrameStat, value: u128) {
        self.stats.insert(key, value);
    }

    fn get(&self, key: &FrameStat) -> Option<u128> {
        self.stats.get(key).copied()
    }
}

impl PullableFrameProperties<FrameSlot, DecodedFrame> for FetchedFrame {
    fn push(&mut self, _key: FrameSlot, value: DecodedFrame) {
        self.decoded = Some(value);
    }

    fn pull(&mut self, _key: &FrameSlot) -> Option<DecodedFrame> {
        self.decoded.take()
    }
}

impl BorrowFrameProperties<FrameSlot, DecodedFrame> for FetchedFrame {
    fn get_ref(&self, _key: &FrameSlot) -> Option<&DecodedFrame> {
        self.decoded.as_ref()
    }
}

impl FrameError<DropReason> for FetchedFrame {
    fn report_error(&mut self, error: DropReason) {
        self.drop_reason = Some(error);
    }

    fn get_error(&self) -> Option<DropReason> {
        self.drop_reason
    }
}
