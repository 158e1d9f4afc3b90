//! camview fetches frames from a remote camera server over a single TCP connection and hands
//! them to a renderer.
//!
//! The pieces live in their own crates and are re-exported here behind features.

pub use camview_core::*;

pub mod codec {
    pub use camview_codec::*;
}

pub mod fetch {
    pub use camview_fetch::*;
}

#[cfg(feature = "render")]
pub mod render {
    pub use camview_renderers::*;
}

#[cfg(feature = "profilation")]
pub mod profilation {
    pub use camview_profilation_utils::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use camview_server::*;
}

pub mod command_line;
pub mod viewer;
