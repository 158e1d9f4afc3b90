use std::str::FromStr;

use camview_fetch::SessionStatus;

/// Commands accepted on stdin by the headless viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    Start,
    Stop,
    Toggle,
    Status,
    Quit,
}

impl FromStr for ViewerCommand {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(ViewerCommand::Start),
            "stop" => Ok(ViewerCommand::Stop),
            "" | "toggle" => Ok(ViewerCommand::Toggle),
            "status" => Ok(ViewerCommand::Status),
            "quit" | "exit" => Ok(ViewerCommand::Quit),
            other => Err(format!("Unknown command '{}'", other)),
        }
    }
}

pub const WINDOW_TITLE: &str = "Video Monitor";

/// Title of the viewer window, which also carries the label of the start/stop toggle.
pub fn window_title(status: &SessionStatus) -> String {
    match status {
        SessionStatus::Failed(reason) => {
            format!("{} ({}) [{}]", WINDOW_TITLE, reason, status.toggle_label())
        }
        _ => format!("{} [{}]", WINDOW_TITLE, status.toggle_label()),
    }
}
