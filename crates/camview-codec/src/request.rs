use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::REQUEST_LEN;

const GET_NEW_FRAME: &[u8; REQUEST_LEN] = b"getNewFrame";
const CLOSE_DRIVER: &[u8; REQUEST_LEN] = b"closeDriver";

/// The request for the next frame, sent as is: no terminator, no framing.
pub fn encode_request() -> &'static [u8] {
    GET_NEW_FRAME
}

/// A command as seen by the frame server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCommand {
    GetNewFrame,
    CloseDriver,
    Unknown(Vec<u8>),
}

impl ServerCommand {
    pub fn parse(command: &[u8]) -> Self {
        if command == GET_NEW_FRAME {
            ServerCommand::GetNewFrame
        } else if command == CLOSE_DRIVER {
            ServerCommand::CloseDriver
        } else {
            ServerCommand::Unknown(command.to_vec())
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ServerCommand::GetNewFrame => GET_NEW_FRAME,
            ServerCommand::CloseDriver => CLOSE_DRIVER,
            ServerCommand::Unknown(command) => command,
        }
    }
}

/// Reads the next command sent by a client. `None` means the client went away.
pub async fn read_request<R>(reader: &mut R) -> io::Result<Option<ServerCommand>>
where
    R: AsyncRead + Unpin,
{
    let mut command = [0u8; REQUEST_LEN];

    match reader.read_exact(&mut command).await {
        Ok(_) => Ok(Some(ServerCommand::parse(&command))),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(error) => Err(error),
    }
}
