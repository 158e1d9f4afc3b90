use std::{fmt, str::FromStr};

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::BytesMut;
use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{
    error::{ProtocolError, ResponseError},
    frame::DecodedFrame,
    HEADER_LEN, MAX_PAYLOAD_LEN,
};

/// What to do when the stream ends before the announced payload length was received.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PayloadPolicy {
    /// Fail with [`ProtocolError::TruncatedPayload`].
    #[default]
    Strict,

    /// Hand back a [`DecodedResponse::ShortPayload`] and let the caller drop the frame.
    Lenient,
}

impl FromStr for PayloadPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "strict" => Ok(PayloadPolicy::Strict),
            "lenient" => Ok(PayloadPolicy::Lenient),
            other => Err(format!("Unknown payload policy '{}'", other)),
        }
    }
}

impl fmt::Display for PayloadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadPolicy::Strict => write!(f, "strict"),
            PayloadPolicy::Lenient => write!(f, "lenient"),
        }
    }
}

#[derive(Debug)]
pub enum DecodedResponse {
    Frame {
        frame: DecodedFrame,
        payload_size: usize,
    },
    ShortPayload {
        expected: usize,
        received: usize,
    },
}

enum Payload {
    Complete(BytesMut),
    Short { expected: usize, received: usize },
}

/// Reads one response from `reader` and decodes it into an image.
///
/// Header or payload bytes that make no sense end up in [`ResponseError::Protocol`]; the
/// stream is left positioned right after whatever was consumed, which is exactly
/// [`HEADER_LEN`] bytes when the header is rejected. Stream failures, including the stream
/// ending in the middle of the header, end up in [`ResponseError::Io`].
pub async fn decode_response<R>(
    reader: &mut R,
    policy: PayloadPolicy,
) -> Result<DecodedResponse, ResponseError>
where
    R: AsyncRead + Unpin,
{
    let size = read_length_header(reader).await?;

    match read_payload(reader, size, policy).await? {
        Payload::Complete(payload) => {
            let frame = decode_payload(&payload)?;
            Ok(DecodedResponse::Frame {
                frame,
                payload_size: size,
            })
        }
        Payload::Short { expected, received } => {
            Ok(DecodedResponse::ShortPayload { expected, received })
        }
    }
}

/// Builds the response for an encoded image: the space padded decimal length of its
/// base64 text, then the text itself.
pub fn encode_response(image_bytes: &[u8]) -> BytesMut {
    let encoded = STANDARD.encode(image_bytes);
    let header = format!("{:<width$}", encoded.len(), width = HEADER_LEN);

    let mut response = BytesMut::with_capacity(HEADER_LEN + encoded.len());
    response.extend_from_slice(header.as_bytes());
    response.extend_from_slice(encoded.as_bytes());
    response
}

/// Reads one response and throws its payload away without decoding it. Returns the length
/// the header announced.
pub async fn skip_response<R>(reader: &mut R) -> Result<usize, ResponseError>
where
    R: AsyncRead + Unpin,
{
    let size = read_length_header(reader).await?;

    let mut payload = (&mut *reader).take(size as u64);
    let skipped = tokio::io::copy(&mut payload, &mut tokio::io::sink()).await? as usize;

    if skipped < size {
        return Err(ProtocolError::TruncatedPayload {
            expected: size,
            received: skipped,
        }
        .into());
    }

    Ok(size)
}

pub fn parse_length_header(header: &[u8]) -> Result<usize, ProtocolError> {
    std::str::from_utf8(header)
        .ok()
        .and_then(|text| text.trim().parse::<usize>().ok())
        .filter(|size| *size <= MAX_PAYLOAD_LEN)
        .ok_or_else(|| ProtocolError::MalformedLength {
            header: String::from_utf8_lossy(header).into_owned(),
        })
}

pub fn decode_payload(payload: &[u8]) -> Result<DecodedFrame, ProtocolError> {
    let image_bytes = STANDARD.decode(payload)?;
    let image = image::load_from_memory(&image_bytes)?.into_rgba8();
    Ok(DecodedFrame::from(image))
}

async fn read_length_header<R>(reader: &mut R) -> Result<usize, ResponseError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).await?;

    let size = parse_length_header(&header)?;
    debug!("Receiving {} payload bytes...", size);

    Ok(size)
}

async fn read_payload<R>(
    reader: &mut R,
    size: usize,
    policy: PayloadPolicy,
) -> Result<Payload, ResponseError>
where
    R: AsyncRead + Unpin,
{
    let mut payload = BytesMut::with_capacity(size);
    payload.resize(size, 0);

    let mut received = 0;
    while received < size {
        let read_bytes = reader.read(&mut payload[received..]).await?;
        trace!("Received {} bytes", read_bytes);

        if read_bytes == 0 {
            break;
        }

        received += read_bytes;
    }

    if received == size {
        return Ok(Payload::Complete(payload));
    }

    debug!("Stream ended after {} out of {} payload bytes", received, size);

    match policy {
        PayloadPolicy::Strict => Err(ProtocolError::TruncatedPayload {
            expected: size,
            received,
        }
        .into()),
        PayloadPolicy::Lenient => Ok(Payload::Short {
            expected: size,
            received,
        }),
    }
}
