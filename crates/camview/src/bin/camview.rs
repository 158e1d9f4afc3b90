use std::{error::Error, sync::atomic::Ordering, time::Duration};

use clap::Parser;
use log::{error, info, warn};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    runtime::Runtime,
    sync::watch,
};
use winit::{
    event::{ElementState, Event, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent},
    event_loop::{EventLoopBuilder, EventLoopProxy},
};

use camview::{
    codec::PayloadPolicy,
    command_line::parse_canvas_resolution_str,
    fetch::{
        FetchConfiguration, FetchLoop, FetchedFrame, FrameSlot, FrameStat, SessionHandle,
        SessionStatus, TcpConnector,
    },
    processors::functional::Function,
    profilation::loggers::{console::ConsoleAverageStatsLogger, errors::ConsoleDropReasonLogger},
    render::{
        headless::HeadlessRenderer,
        placeholder::placeholder_frame,
        winit::{Canvas, ViewerEvent, WinitRenderer},
    },
    traits::FrameError,
    viewer::{window_title, ViewerCommand},
};

#[derive(Parser)]
#[clap(version = "0.1.0", about = "Remote camera viewer")]
struct Options {
    #[clap(short, long, default_value = "127.0.0.1:5001")]
    server_address: String,

    #[clap(short, long, default_value = "33")]
    tick_period_ms: u64,

    #[clap(short, long, default_value = "strict")]
    payload_policy: PayloadPolicy,

    #[clap(short, long, default_value = "320x240")]
    resolution: String,

    #[clap(short, long, default_value = "3")]
    maximum_consecutive_connection_losses: u32,

    #[clap(long)]
    headless: bool,

    #[clap(long)]
    autostart: bool,

    #[clap(long)]
    console_profiling: bool,
}

impl Options {
    fn fetch_configuration(&self) -> FetchConfiguration {
        FetchConfiguration {
            tick_period: Duration::from_millis(self.tick_period_ms),
            maximum_consecutive_connection_losses: self.maximum_consecutive_connection_losses,
            payload_policy: self.payload_policy,
            ..FetchConfiguration::default()
        }
    }

    fn fetch_loop(&self) -> FetchLoop<TcpConnector> {
        let mut fetch_loop = FetchLoop::new(TcpConnector::new(&self.server_address))
            .configuration(self.fetch_configuration())
            .append(ConsoleDropReasonLogger::new().header("Dropped frames"))
            .append(Function::new(|frame_data: FetchedFrame| {
                frame_data.get_error().is_none().then_some(frame_data)
            }));

        if self.console_profiling {
            fetch_loop = fetch_loop.append(
                ConsoleAverageStatsLogger::new()
                    .header("Fetch statistics")
                    .log(FrameStat::FetchLatency)
                    .log(FrameStat::PayloadSize),
            );
        }

        fetch_loop
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let options = Options::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    if options.headless {
        runtime.block_on(run_headless(&options))
    } else {
        run_window(runtime, &options)
    }
}

fn run_window(runtime: Runtime, options: &Options) -> Result<(), Box<dyn Error>> {
    let (canvas_width, canvas_height) = parse_canvas_resolution_str(&options.resolution)?;

    let event_loop = EventLoopBuilder::<ViewerEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let mut canvas = Canvas::new(
        &event_loop,
        &window_title(&SessionStatus::Idle),
        canvas_width,
        canvas_height,
    )?;
    canvas.show(&placeholder_frame())?;

    let (handle, _session) = {
        let _guard = runtime.enter();
        options
            .fetch_loop()
            .append(WinitRenderer::new(FrameSlot::Decoded, proxy.clone()))
            .launch()
    };

    runtime.spawn(forward_status(handle.subscribe(), proxy));

    if options.autostart {
        runtime.spawn(toggle(handle.clone()));
    }

    info!("Press Space or click the window to start or stop the camera");

    event_loop.run(move |event, _, control_flow| {
        control_flow.set_wait();

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    handle.shutdown();
                    control_flow.set_exit();
                }
                WindowEvent::Resized(size) => {
                    if let Err(error) = canvas.resize_surface(size) {
                        error!("Unable to resize the surface: {}", error);
                        control_flow.set_exit();
                    }
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Space),
                            ..
                        },
                    ..
                }
                | WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    runtime.spawn(toggle(handle.clone()));
                }
                _ => (),
            },
            Event::UserEvent(viewer_event) => {
                let result = match viewer_event {
                    ViewerEvent::Frame(frame) => canvas.show(&frame),
                    ViewerEvent::Placeholder => canvas.show(&placeholder_frame()),
                    ViewerEvent::Title(title) => {
                        canvas.set_title(&title);
                        Ok(())
                    }
                };

                if let Err(error) = result {
                    warn!("Unable to show the frame: {}", error);
                }
            }
            Event::RedrawRequested(_) => {
                if let Err(error) = canvas.render() {
                    error!("Render error: {}", error);
                    control_flow.set_exit();
                }
            }
            _ => (),
        }
    })
}

async fn toggle(handle: SessionHandle) {
    match handle.toggle().await {
        Ok(outcome) => info!("Camera toggled: {:?}", outcome),
        Err(error) => warn!("Unable to toggle the camera: {}", error),
    }
}

/// Mirrors the session status into the window title, and blanks the canvas when idle.
async fn forward_status(
    mut status: watch::Receiver<SessionStatus>,
    proxy: EventLoopProxy<ViewerEvent>,
) {
    loop {
        let current = status.borrow_and_update().clone();

        let mut events = vec![ViewerEvent::Title(window_title(&current))];
        if !current.is_acquiring() {
            events.push(ViewerEvent::Placeholder);
        }

        for event in events {
            if proxy.send_event(event).is_err() {
                return;
            }
        }

        if status.changed().await.is_err() {
            return;
        }
    }
}

async fn run_headless(options: &Options) -> Result<(), Box<dyn Error>> {
    let renderer = HeadlessRenderer::new(FrameSlot::Decoded);
    let rendered_frames = renderer.rendered_frames();

    let (handle, session) = options.fetch_loop().append(renderer).launch();

    if options.autostart {
        report_start(handle.start().await);
    }

    info!("Commands: start, stop, toggle (or empty line), status, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<ViewerCommand>() {
            Ok(command) => command,
            Err(error) => {
                warn!("{}", error);
                continue;
            }
        };

        match command {
            ViewerCommand::Start => report_start(handle.start().await),
            ViewerCommand::Stop => match handle.stop().await {
                Ok(outcome) => info!("{:?}", outcome),
                Err(error) => warn!("{}", error),
            },
            ViewerCommand::Toggle => toggle(handle.clone()).await,
            ViewerCommand::Status => info!(
                "{:?} ({}), {} frames rendered",
                handle.status(),
                handle.status().toggle_label(),
                rendered_frames.load(Ordering::Relaxed)
            ),
            ViewerCommand::Quit => break,
        }
    }

    handle.shutdown();
    session.await?;

    Ok(())
}

fn report_start<T: std::fmt::Debug, E: std::fmt::Display>(result: Result<T, E>) {
    match result {
        Ok(outcome) => info!("{:?}", outcome),
        Err(error) => warn!("Unable to start the camera: {}", error),
    }
}
