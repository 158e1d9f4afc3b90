use std::io;

use async_trait::async_trait;
use log::info;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};

/// Opens the byte stream to the frame server.
#[async_trait]
pub trait Connector: Send {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    async fn connect(&mut self) -> io::Result<Self::Stream>;
}

pub struct TcpConnector {
    address: String,
}

impl TcpConnector {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&mut self) -> io::Result<TcpStream> {
        info!("Connecting to {}...", self.address);

        let stream = TcpStream::connect(self.address.as_str()).await?;
        stream.set_nodelay(true)?;

        info!("Connected to {}", stream.peer_addr()?);
        Ok(stream)
    }
}
