//! A frame server for the camview wire protocol.
//!
//! It serves one client at a time: every `getNewFrame` is answered with the frame prepared
//! after the previous answer, `closeDriver` shuts the server down and anything else sends it
//! back to waiting for a new client.

pub mod error;
pub mod server;
pub mod source;

pub use error::ServerError;
pub use server::FrameServer;
pub use source::{FrameFormat, FrameSource, StillImageSource, TestPatternSource};
