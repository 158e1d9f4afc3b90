//! Byte-level protocol spoken between the viewer and a frame server.
//!
//! The client sends the bare token `getNewFrame`; the server answers with a 16 byte
//! decimal length header followed by that many bytes of base64 encoded image data.

pub mod error;
pub mod frame;
pub mod request;
pub mod response;

pub use error::{ProtocolError, ResponseError};
pub use frame::DecodedFrame;
pub use request::{encode_request, read_request, ServerCommand};
pub use response::{
    decode_response, encode_response, skip_response, DecodedResponse, PayloadPolicy,
};

/// Length of every client command, `getNewFrame` included.
pub const REQUEST_LEN: usize = 11;

/// Width of the decimal length header preceding each response payload.
pub const HEADER_LEN: usize = 16;

/// Largest payload a length header may announce.
pub const MAX_PAYLOAD_LEN: usize = 64 * 1024 * 1024;

#[cfg(test)]
mod tests;
