use std::{error::Error, path::PathBuf};

use clap::Parser;
use log::info;

use camview::{
    command_line::parse_canvas_resolution_str,
    server::{FrameFormat, FrameServer, FrameSource, StillImageSource, TestPatternSource},
};

#[derive(Parser)]
#[clap(version = "0.1.0", about = "Frame server answering getNewFrame requests")]
struct Options {
    #[clap(short, long, default_value = "127.0.0.1:5001")]
    binding_address: String,

    /// Either "test-pattern" or "still"
    #[clap(short, long, default_value = "test-pattern")]
    source: String,

    /// Image served by the "still" source
    #[clap(short, long)]
    image_path: Option<PathBuf>,

    #[clap(short, long, default_value = "320x240")]
    resolution: String,

    /// Encoding of the test pattern frames, "jpeg" or "png"
    #[clap(short, long, default_value = "jpeg")]
    format: FrameFormat,

    #[clap(short, long, default_value = "90")]
    quality: u8,
}

impl Options {
    fn frame_source(&self) -> Result<Box<dyn FrameSource>, Box<dyn Error>> {
        match self.source.as_str() {
            "test-pattern" => {
                let (width, height) = parse_canvas_resolution_str(&self.resolution)?;
                let format = match self.format {
                    FrameFormat::Jpeg { .. } => FrameFormat::Jpeg {
                        quality: self.quality,
                    },
                    format => format,
                };

                info!("Serving a {}x{} test pattern as {:?}", width, height, format);
                Ok(Box::new(TestPatternSource::new(width, height, format)))
            }
            "still" => {
                let path = self
                    .image_path
                    .as_ref()
                    .ok_or("the still source needs --image-path")?;

                Ok(Box::new(StillImageSource::open(path)?))
            }
            other => Err(format!("unknown frame source '{}'", other).into()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let options = Options::parse();
    let source = options.frame_source()?;

    let server = FrameServer::bind(&options.binding_address, source).await?;
    server.run().await?;

    info!("Driver closed, exiting");

    Ok(())
}
