//! camview is a remote camera viewer: it keeps a single TCP connection to a frame server,
//! asks for a new frame at a fixed delay and hands every decoded image to a chain of processors.
//!
//! This crate holds the pieces every other camview crate builds upon: the frame processor
//! abstraction, the frame DTO property traits and the reasons a frame can be dropped for.

pub mod error;
pub mod processors;
pub mod traits;

#[cfg(test)]
mod tests;
