use async_trait::async_trait;
use camview_codec::DecodedFrame;
use camview_core::traits::{FrameProcessor, PullableFrameProperties};
use log::debug;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use thiserror::Error;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event_loop::{EventLoop, EventLoopProxy},
    window::{Window, WindowBuilder},
};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unable to create the window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Pixels error: {0}")]
    Pixels(#[from] pixels::Error),

    #[error("Texture error: {0}")]
    Texture(#[from] pixels::TextureError),
}

/// Messages handed over to the thread running the event loop.
#[derive(Debug)]
pub enum ViewerEvent {
    Frame(DecodedFrame),
    Placeholder,
    Title(String),
}

/// Forwards decoded frames to the event loop thread, which owns the window.
pub struct WinitRenderer<K> {
    buffer_key: K,
    proxy: EventLoopProxy<ViewerEvent>,
}

impl<K> WinitRenderer<K> {
    pub fn new(buffer_key: K, proxy: EventLoopProxy<ViewerEvent>) -> Self {
        Self { buffer_key, proxy }
    }
}

#[async_trait]
impl<F, K> FrameProcessor<F> for WinitRenderer<K>
where
    K: Send,
    F: PullableFrameProperties<K, DecodedFrame> + Send + 'static,
{
    async fn process(&mut self, mut frame_data: F) -> Option<F> {
        if let Some(frame) = frame_data.pull(&self.buffer_key) {
            if self.proxy.send_event(ViewerEvent::Frame(frame)).is_err() {
                debug!("Event loop closed, discarding frame");
            }
        }

        Some(frame_data)
    }
}

/// Window and pixel buffer frames are drawn into. Lives on the event loop thread.
pub struct Canvas {
    window: Window,
    pixels: Pixels,
    buffer_size: (u32, u32),
}

impl Canvas {
    pub fn new<T>(
        event_loop: &EventLoop<T>,
        title: &str,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<Self, RenderError> {
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(LogicalSize::new(canvas_width as f64, canvas_height as f64))
            .build(event_loop)?;

        let pixels = {
            let window_size = window.inner_size();
            let surface_texture =
                SurfaceTexture::new(window_size.width, window_size.height, &window);
            PixelsBuilder::new(canvas_width, canvas_height, surface_texture).build()?
        };

        Ok(Self {
            window,
            pixels,
            buffer_size: (canvas_width, canvas_height),
        })
    }

    pub fn show(&mut self, frame: &DecodedFrame) -> Result<(), RenderError> {
        let frame_size = (frame.width(), frame.height());
        if frame_size.0 == 0 || frame_size.1 == 0 {
            return Ok(());
        }

        if frame_size != self.buffer_size {
            debug!("Resizing canvas buffer to {}x{}", frame_size.0, frame_size.1);
            self.pixels.resize_buffer(frame_size.0, frame_size.1)?;
            self.buffer_size = frame_size;
        }

        self.pixels.frame_mut().copy_from_slice(frame.pixels());
        self.window.request_redraw();

        Ok(())
    }

    pub fn resize_surface(&mut self, size: PhysicalSize<u32>) -> Result<(), RenderError> {
        if size.width > 0 && size.height > 0 {
            self.pixels.resize_surface(size.width, size.height)?;
        }
        Ok(())
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    pub fn render(&self) -> Result<(), RenderError> {
        self.pixels.render()?;
        Ok(())
    }
}
