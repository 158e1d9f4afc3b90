use std::{io, time::Duration};

use camview_codec::{
    decode_response, encode_request, skip_response, DecodedResponse, PayloadPolicy, ResponseError,
};
use camview_core::{
    error::DropReason,
    traits::{FrameError, FrameProperties, PullableFrameProperties},
};
use log::{debug, warn};
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    time::{self, Instant},
};

use crate::{
    frame::{FetchedFrame, FrameSlot, FrameStat},
    metered::MeteredStream,
};

/// Part of an exchange being carried out, with the stream byte counter at its start.
#[derive(Debug, Clone, Copy)]
enum Step {
    Request { written_at: u64 },
    Response { read_at: u64 },
}

/// An open stream to the frame server.
pub struct Connection<S> {
    stream: MeteredStream<S>,
    fetched_frames: u128,

    /// Requests sent whose response has not been read yet.
    unanswered_requests: u32,
    step: Option<Step>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream: MeteredStream::new(stream),
            fetched_frames: 0,
            unanswered_requests: 0,
            step: None,
        }
    }

    /// Requests one frame and reads the answer.
    ///
    /// Answers that cannot be decoded come back as a [`FetchedFrame`] carrying a drop reason;
    /// only failures of the stream itself, timeouts included, are returned as errors.
    ///
    /// A response abandoned before its first byte is read is skipped by the next fetch. An
    /// exchange interrupted halfway through a request or a response leaves the stream out of
    /// sync and fails with [`io::ErrorKind::InvalidData`].
    pub async fn fetch(
        &mut self,
        policy: PayloadPolicy,
        timeout: Duration,
    ) -> io::Result<FetchedFrame> {
        let result = match time::timeout(timeout, self.exchange(policy)).await {
            Ok(result) => result,
            Err(_) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no response within {:?}", timeout),
            )),
        };

        result.map_err(|error| self.interrupted(error))
    }

    fn interrupted(&mut self, error: io::Error) -> io::Error {
        let in_sync = match self.step.take() {
            Some(Step::Request { written_at }) => self.stream.written_bytes() == written_at,
            Some(Step::Response { read_at }) => self.stream.read_bytes() == read_at,
            None => true,
        };

        if in_sync {
            return error;
        }

        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("stream out of sync after an interrupted exchange: {}", error),
        )
    }

    async fn skip_unanswered(&mut self) -> io::Result<()> {
        while self.unanswered_requests > 0 {
            self.step = Some(Step::Response {
                read_at: self.stream.read_bytes(),
            });

            let size = skip_response(&mut self.stream)
                .await
                .map_err(|error| match error {
                    ResponseError::Io(error) => error,
                    ResponseError::Protocol(error) => {
                        io::Error::new(io::ErrorKind::InvalidData, error)
                    }
                })?;

            self.step = None;
            self.unanswered_requests -= 1;
            debug!("Skipped a late response of {} bytes", size);
        }

        Ok(())
    }

    /// Signals the end of the requests, then lets the stream be dropped.
    pub async fn close(mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }

    async fn exchange(&mut self, policy: PayloadPolicy) -> io::Result<FetchedFrame> {
        self.skip_unanswered().await?;

        let started = Instant::now();

        self.step = Some(Step::Request {
            written_at: self.stream.written_bytes(),
        });
        self.stream.write_all(encode_request()).await?;
        self.stream.flush().await?;

        self.unanswered_requests += 1;
        self.step = Some(Step::Response {
            read_at: self.stream.read_bytes(),
        });

        let response = match decode_response(&mut self.stream, policy).await {
            Ok(response) => Ok(response),
            Err(ResponseError::Protocol(error)) => Err(error),
            Err(ResponseError::Io(error)) => return Err(error),
        };
        let latency = started.elapsed();

        self.step = None;
        self.unanswered_requests -= 1;

        self.fetched_frames += 1;

        let mut frame_data = FetchedFrame::new();
        frame_data.set(FrameStat::FrameIndex, self.fetched_frames);
        frame_data.set(FrameStat::FetchLatency, latency.as_micros());

        match response {
            Ok(DecodedResponse::Frame {
                frame,
                payload_size,
            }) => {
                debug!(
                    "Fetched a {}x{} frame in {:?}",
                    frame.width(),
                    frame.height(),
                    latency
                );
                frame_data.set(FrameStat::PayloadSize, payload_size as u128);
                frame_data.push(FrameSlot::Decoded, frame);
            }
            Ok(DecodedResponse::ShortPayload { expected, received }) => {
                warn!(
                    "Dropping frame: stream ended after {} out of {} payload bytes",
                    received, expected
                );
                frame_data.set(FrameStat::PayloadSize, received as u128);
                frame_data.report_error(DropReason::ShortPayload);
            }
            Err(error) => {
                warn!("Dropping frame: {}", error);
                frame_data.report_error(error.drop_reason());
            }
        }

        Ok(frame_data)
    }
}
