use camview_core::error::DropReason;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed length header {header:?}")]
    MalformedLength { header: String },

    #[error("Truncated payload ({received} out of {expected} bytes)")]
    TruncatedPayload { expected: usize, received: usize },

    #[error("Bad payload encoding: {0}")]
    BadEncoding(#[from] base64::DecodeError),

    #[error("Bad image container: {0}")]
    BadImage(#[from] image::ImageError),
}

impl ProtocolError {
    pub fn drop_reason(&self) -> DropReason {
        match self {
            ProtocolError::MalformedLength { .. } => DropReason::MalformedLength,
            ProtocolError::TruncatedPayload { .. } => DropReason::TruncatedPayload,
            ProtocolError::BadEncoding(_) => DropReason::BadEncoding,
            ProtocolError::BadImage(_) => DropReason::BadImage,
        }
    }
}

/// Failure while reading a response: either the bytes made no sense or the stream itself failed.
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("Connection error: {0}")]
    Io(#[from] std::io::Error),
}
