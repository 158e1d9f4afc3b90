use std::io;

use camview_core::{
    error::DropReason,
    processors::containers::sequential::Sequential,
    traits::FrameProcessor,
};
use log::{debug, error, info, warn};
use tokio::{
    sync::{
        mpsc::{self, UnboundedReceiver, UnboundedSender},
        oneshot, watch,
    },
    task::JoinHandle,
    time::{self, Instant},
};

use crate::{
    configuration::FetchConfiguration,
    connection::Connection,
    connector::Connector,
    error::SessionError,
    frame::FetchedFrame,
    status::{SessionStatus, StartOutcome, StopOutcome, ToggleOutcome},
};

pub(crate) enum Command {
    Start(oneshot::Sender<Result<StartOutcome, SessionError>>),
    Stop(oneshot::Sender<StopOutcome>),
    Toggle(oneshot::Sender<Result<ToggleOutcome, SessionError>>),
    Shutdown,
}

/// Builder of the fetch task.
///
/// Processors are run in order on every fetched frame, healthy or dropped, before the
/// next fetch is scheduled.
pub struct FetchLoop<C> {
    connector: C,
    configuration: FetchConfiguration,
    processors: Sequential<FetchedFrame>,
}

impl<C> FetchLoop<C>
where
    C: Connector + 'static,
{
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            configuration: FetchConfiguration::default(),
            processors: Sequential::new(),
        }
    }

    pub fn configuration(mut self, configuration: FetchConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn append<T: 'static + FrameProcessor<FetchedFrame> + Send>(mut self, processor: T) -> Self {
        self.processors.push(processor);
        self
    }

    /// Spawns the fetch task on the current tokio runtime. The session starts idle.
    pub fn launch(self) -> (SessionHandle, JoinHandle<()>) {
        let (command_sender, command_receiver) = mpsc::unbounded_channel();
        let (status_sender, status_receiver) = watch::channel(SessionStatus::Idle);

        let task = SessionTask {
            connector: self.connector,
            configuration: self.configuration,
            processors: self.processors,
            commands: command_receiver,
            status: status_sender,
            state: SessionState::Idle,
            next_tick: Instant::now(),
            consecutive_connection_losses: 0,
        };

        let join_handle = tokio::spawn(task.run());

        let handle = SessionHandle {
            commands: command_sender,
            status: status_receiver,
        };

        (handle, join_handle)
    }
}

/// Cloneable remote control of a running fetch task.
#[derive(Clone)]
pub struct SessionHandle {
    commands: UnboundedSender<Command>,
    status: watch::Receiver<SessionStatus>,
}

impl SessionHandle {
    pub async fn start(&self) -> Result<StartOutcome, SessionError> {
        self.request(Command::Start).await?
    }

    pub async fn stop(&self) -> Result<StopOutcome, SessionError> {
        self.request(Command::Stop).await
    }

    /// Starts an idle session or stops an acquiring one, as decided by the fetch task itself.
    pub async fn toggle(&self) -> Result<ToggleOutcome, SessionError> {
        self.request(Command::Toggle).await?
    }

    /// Stops the acquisition, if any, and ends the fetch task.
    pub fn shutdown(&self) {
        if self.commands.send(Command::Shutdown).is_err() {
            debug!("Session task already terminated");
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.clone()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply_sender, reply_receiver) = oneshot::channel();

        self.commands
            .send(command(reply_sender))
            .map_err(|_| SessionError::Terminated)?;

        reply_receiver.await.map_err(|_| SessionError::Terminated)
    }
}

enum SessionState<S> {
    Idle,
    Acquiring(Connection<S>),
}

enum Wake {
    Command(Command),
    Tick,
}

struct SessionTask<C: Connector> {
    connector: C,
    configuration: FetchConfiguration,
    processors: Sequential<FetchedFrame>,

    commands: UnboundedReceiver<Command>,
    status: watch::Sender<SessionStatus>,

    state: SessionState<C::Stream>,
    next_tick: Instant,
    consecutive_connection_losses: u32,
}

impl<C: Connector> SessionTask<C> {
    async fn run(mut self) {
        debug!("Session task started");

        loop {
            let wake = if self.is_acquiring() {
                tokio::select! {
                    command = self.commands.recv() => Wake::Command(command.unwrap_or(Command::Shutdown)),
                    _ = time::sleep_until(self.next_tick) => Wake::Tick,
                }
            } else {
                Wake::Command(self.commands.recv().await.unwrap_or(Command::Shutdown))
            };

            let command = match wake {
                Wake::Command(command) => command,
                Wake::Tick => match self.tick().await {
                    Some(command) => command,
                    None => continue,
                },
            };

            if !self.handle_command(command).await {
                break;
            }
        }

        info!("Session task terminated");
    }

    fn is_acquiring(&self) -> bool {
        matches!(self.state, SessionState::Acquiring(_))
    }

    fn publish(&self, status: SessionStatus) {
        self.status.send_replace(status);
    }

    /// Returns `false` once the task has to terminate.
    async fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Start(reply) => {
                let result = self.start_acquisition().await;
                let _ = reply.send(result);
            }
            Command::Stop(reply) => {
                let outcome = self.stop_acquisition().await;
                let _ = reply.send(outcome);
            }
            Command::Toggle(reply) => {
                let result = if self.is_acquiring() {
                    self.stop_acquisition().await;
                    Ok(ToggleOutcome::Stopped)
                } else {
                    self.start_acquisition()
                        .await
                        .map(|_| ToggleOutcome::Started)
                };
                let _ = reply.send(result);
            }
            Command::Shutdown => {
                self.stop_acquisition().await;
                return false;
            }
        }

        true
    }

    async fn start_acquisition(&mut self) -> Result<StartOutcome, SessionError> {
        if self.is_acquiring() {
            debug!("Acquisition already running");
            return Ok(StartOutcome::AlreadyAcquiring);
        }

        let connect_timeout = self.configuration.connect_timeout;
        let stream = match time::timeout(connect_timeout, self.connector.connect()).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(error)) => return Err(self.connection_failed(error)),
            Err(_) => {
                let error = io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no connection within {:?}", connect_timeout),
                );
                return Err(self.connection_failed(error));
            }
        };

        info!(
            "Acquisition started, fetching a frame every {:?}",
            self.configuration.tick_period
        );

        self.state = SessionState::Acquiring(Connection::new(stream));
        self.next_tick = Instant::now();
        self.consecutive_connection_losses = 0;
        self.publish(SessionStatus::Acquiring);

        Ok(StartOutcome::Started)
    }

    fn connection_failed(&self, error: io::Error) -> SessionError {
        error!("Impossible to open the camera connection: {}", error);
        self.publish(SessionStatus::Failed(error.to_string()));
        SessionError::Connection(error)
    }

    async fn stop_acquisition(&mut self) -> StopOutcome {
        if !self.close_connection().await {
            debug!("Acquisition not running");
            return StopOutcome::AlreadyIdle;
        }

        info!("Acquisition stopped");
        self.publish(SessionStatus::Idle);
        StopOutcome::Stopped
    }

    /// Closes the connection, if any, exactly once. Returns whether there was one.
    async fn close_connection(&mut self) -> bool {
        match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Acquiring(connection) => {
                match connection.close().await {
                    Ok(()) => debug!("Connection closed"),
                    Err(error) => warn!("Error while closing the connection: {}", error),
                }
                true
            }
            SessionState::Idle => false,
        }
    }

    /// Runs one fetch. A command asking to leave the acquisition while the fetch is in flight
    /// gives it one tick period to complete, then cancels it; such a command is returned to be
    /// handled by the caller.
    async fn tick(&mut self) -> Option<Command> {
        let period = self.configuration.tick_period;
        let policy = self.configuration.payload_policy;
        let fetch_timeout = self.configuration.fetch_timeout;

        let SessionState::Acquiring(connection) = &mut self.state else {
            return None;
        };

        let mut pending = None;
        let outcome = {
            let fetch = connection.fetch(policy, fetch_timeout);
            tokio::pin!(fetch);

            loop {
                tokio::select! {
                    outcome = &mut fetch => break Some(outcome),
                    command = self.commands.recv() => match command {
                        Some(Command::Start(reply)) => {
                            let _ = reply.send(Ok(StartOutcome::AlreadyAcquiring));
                        }
                        command => {
                            debug!("Leaving acquisition while a fetch is in flight");
                            pending = Some(command.unwrap_or(Command::Shutdown));

                            let outcome = time::timeout(period, &mut fetch).await.ok();
                            if outcome.is_none() {
                                warn!("In-flight fetch not completed within {:?}, cancelling it", period);
                            }
                            break outcome;
                        }
                    },
                }
            }
        };

        if let Some(outcome) = outcome {
            self.deliver(outcome).await;
        }
        self.next_tick = Instant::now() + period;

        match pending {
            // The connection broke meanwhile: the toggle found a session already stopped.
            Some(Command::Toggle(reply)) if !self.is_acquiring() => {
                let _ = reply.send(Ok(ToggleOutcome::Stopped));
                None
            }
            pending => pending,
        }
    }

    async fn deliver(&mut self, outcome: io::Result<FetchedFrame>) {
        match outcome {
            Ok(frame_data) => {
                self.consecutive_connection_losses = 0;
                self.processors.process(frame_data).await;
            }
            Err(error)
                if is_transient(&error)
                    && self.consecutive_connection_losses
                        < self.configuration.maximum_consecutive_connection_losses =>
            {
                self.consecutive_connection_losses += 1;
                warn!(
                    "Dropping frame after a connection hiccup ({} in a row): {}",
                    self.consecutive_connection_losses, error
                );
                self.processors
                    .process(FetchedFrame::dropped(DropReason::ConnectionError))
                    .await;
            }
            Err(error) => {
                error!("Connection lost, stopping acquisition: {}", error);
                self.close_connection().await;
                self.publish(SessionStatus::Failed(format!("Connection lost: {}", error)));
            }
        }
    }
}

fn is_transient(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}
