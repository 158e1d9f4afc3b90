use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Impossible to open the camera connection: {0}")]
    Connection(#[source] io::Error),

    #[error("Session task is no longer running")]
    Terminated,
}
