use tokio::sync::oneshot;

use crate::args::Args;
use crate::keybinds;
use crate::launcher::item::project;
use crate::state::AppState;

pub const REPLY_OK: &str = "ok";
pub const REPLY_UNKNOWN: &str = "unknown command";

#[derive(Debug)]
pub struct IpcMessage {
    pub id: u64,
    pub command: IpcCommand,
    pub reply: oneshot::Sender<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpcCommand {
    LauncherToggle { input: Option<String> },
    LauncherShow,
    LauncherHide,
    Search(String),
    Results,
    Activate,
    /// Launch the result at an index; `None` when the index did not parse.
    Launch(Option<usize>),
    Key(String),
    Reload,
    Unknown(String),
}

/// The command a secondary instance sends for its arguments.
pub fn command_for_secondary(args: &Args) -> IpcCommand {
    if args.request.is_empty() {
        return IpcCommand::LauncherToggle {
            input: args.input.clone(),
        };
    }

    match decode_command(&args.request.join(" ")) {
        IpcCommand::LauncherToggle { input: None } => IpcCommand::LauncherToggle {
            input: args.input.clone(),
        },
        command => command,
    }
}

pub fn encode_command(command: &IpcCommand) -> String {
    match command {
        IpcCommand::LauncherToggle { input } => match input {
            Some(input) => format!("toggle-launcher {}", input),
            None => "toggle-launcher".to_string(),
        },
        IpcCommand::LauncherShow => "show-launcher".to_string(),
        IpcCommand::LauncherHide => "hide-launcher".to_string(),
        IpcCommand::Search(text) => format!("search {}", text),
        IpcCommand::Results => "results".to_string(),
        IpcCommand::Activate => "activate".to_string(),
        IpcCommand::Launch(Some(index)) => format!("launch {}", index),
        IpcCommand::Launch(None) => "launch".to_string(),
        IpcCommand::Key(key) => format!("key {}", key),
        IpcCommand::Reload => "reload".to_string(),
        IpcCommand::Unknown(payload) => payload.clone(),
    }
}

pub fn decode_command(payload: &str) -> IpcCommand {
    let payload = payload.trim_end_matches(['\n', '\r']);
    let (name, rest) = match payload.split_once(' ') {
        Some((name, rest)) => (name, Some(rest)),
        None => (payload, None),
    };

    match (name, rest) {
        ("toggle-launcher", rest) => IpcCommand::LauncherToggle {
            input: rest.filter(|r| !r.is_empty()).map(str::to_string),
        },
        ("show-launcher", None) => IpcCommand::LauncherShow,
        ("hide-launcher", None) => IpcCommand::LauncherHide,
        ("search", rest) => IpcCommand::Search(rest.unwrap_or_default().to_string()),
        ("results", None) => IpcCommand::Results,
        ("activate", None) => IpcCommand::Activate,
        ("launch", rest) => IpcCommand::Launch(rest.and_then(|r| r.trim().parse().ok())),
        ("key", Some(key)) if !key.is_empty() => IpcCommand::Key(key.to_string()),
        ("reload", None) => IpcCommand::Reload,
        _ => IpcCommand::Unknown(payload.to_string()),
    }
}

/// Apply a command to the shell state and produce the reply text.
pub fn handle_command(command: IpcCommand, state: &mut AppState) -> String {
    match command {
        IpcCommand::LauncherToggle { input } => {
            state.launcher_mut().toggle(input);
            REPLY_OK.to_string()
        }
        IpcCommand::LauncherShow => {
            state.launcher_mut().show();
            REPLY_OK.to_string()
        }
        IpcCommand::LauncherHide => {
            state.launcher_mut().dismiss();
            REPLY_OK.to_string()
        }
        IpcCommand::Search(text) => {
            state.launcher_mut().set_query(&text);
            results_reply(state)
        }
        IpcCommand::Results => results_reply(state),
        IpcCommand::Activate => {
            state.launcher_mut().controller().activate_default();
            REPLY_OK.to_string()
        }
        IpcCommand::Launch(Some(index)) => match state.launcher_mut().click(index) {
            Ok(()) => REPLY_OK.to_string(),
            Err(err) => format!("error: {}", err),
        },
        IpcCommand::Launch(None) => "error: expected a result index".to_string(),
        IpcCommand::Key(key) => match keybinds::action_for(&key) {
            Some(action) => {
                if state.launcher_mut().handle_action(action) {
                    REPLY_OK.to_string()
                } else {
                    "error: launcher is hidden".to_string()
                }
            }
            None => format!("error: unknown key {:?}", key),
        },
        IpcCommand::Reload => {
            state.refresh_applications();
            REPLY_OK.to_string()
        }
        IpcCommand::Unknown(payload) => {
            tracing::debug!("Unknown IPC request: {:?}", payload);
            REPLY_UNKNOWN.to_string()
        }
    }
}

pub fn handle_message(message: IpcMessage, state: &mut AppState) {
    tracing::info!(
        "Processing request: id={}, command={:?}",
        message.id,
        message.command
    );

    let reply = handle_command(message.command, state);
    if message.reply.send(reply).is_err() {
        tracing::debug!("Requester {} went away before the reply", message.id);
    }
}

fn results_reply(state: &AppState) -> String {
    let items = project(&state.launcher().controller().results());
    serde_json::to_string(&items).unwrap_or_else(|err| format!("error: {}", err))
}
