//! The frame-fetch loop: a single task owning the connection to the frame server.
//!
//! Start and stop requests coming from the UI are sent to the task through a
//! [`SessionHandle`]; while acquiring, the task requests a frame, waits for the answer,
//! runs it through the appended processors and only then schedules the next request.

pub mod configuration;
pub mod connection;
pub mod connector;
pub mod error;
pub mod frame;
mod metered;
pub mod session;
pub mod status;

pub use configuration::FetchConfiguration;
pub use connector::{Connector, TcpConnector};
pub use error::SessionError;
pub use frame::{FetchedFrame, FrameSlot, FrameStat};
pub use session::{FetchLoop, SessionHandle};
pub use status::{SessionStatus, StartOutcome, StopOutcome, ToggleOutcome};
