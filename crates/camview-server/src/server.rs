use std::{io, net::SocketAddr};

use camview_codec::{encode_response, read_request, ServerCommand};
use log::{debug, info, warn};
use tokio::{
    io::AsyncWriteExt,
    net::{TcpListener, TcpStream},
};

use crate::{error::ServerError, source::FrameSource};

#[derive(Debug, PartialEq, Eq)]
enum ClientOutcome {
    Disconnected,
    CloseDriver,
}

pub struct FrameServer<S> {
    listener: TcpListener,
    source: S,
}

impl<S: FrameSource> FrameServer<S> {
    pub async fn bind(address: &str, source: S) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(address).await?;
        info!("Frame server listening on {}", listener.local_addr()?);

        Ok(Self { listener, source })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves clients one after the other until one of them asks to close the driver.
    pub async fn run(mut self) -> Result<(), ServerError> {
        loop {
            info!("Waiting for TCP client...");
            let (stream, address) = self.listener.accept().await?;
            info!("Connected: {}", address);

            if self.serve(stream).await? == ClientOutcome::CloseDriver {
                info!("Close requested, shutting down");
                return Ok(());
            }
        }
    }

    async fn serve(&mut self, mut stream: TcpStream) -> Result<ClientOutcome, ServerError> {
        stream.set_nodelay(true)?;

        // A frame is always ready before the request for it arrives.
        let mut next_response = encode_response(&self.source.next_frame()?);

        loop {
            let command = match read_request(&mut stream).await {
                Ok(Some(command)) => command,
                Ok(None) => {
                    info!("Client disconnected");
                    return Ok(ClientOutcome::Disconnected);
                }
                Err(error) => {
                    warn!("Lost connection: {}", error);
                    return Ok(ClientOutcome::Disconnected);
                }
            };

            match command {
                ServerCommand::GetNewFrame => {
                    if let Err(error) = stream.write_all(&next_response).await {
                        warn!("Lost connection: {}", error);
                        return Ok(ClientOutcome::Disconnected);
                    }
                    debug!("Sent {} bytes", next_response.len());

                    next_response = encode_response(&self.source.next_frame()?);
                }
                ServerCommand::CloseDriver => return Ok(ClientOutcome::CloseDriver),
                ServerCommand::Unknown(command) => {
                    warn!(
                        "Unknown command {:?}, dropping client",
                        String::from_utf8_lossy(&command)
                    );
                    return Ok(ClientOutcome::Disconnected);
                }
            }
        }
    }
}
