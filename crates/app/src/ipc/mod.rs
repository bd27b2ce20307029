//! Single-instance control socket.
//!
//! The first process binds the socket and serves requests; later
//! invocations forward their request to it and print the reply.

mod messages;
mod service;

pub use messages::{
    IpcCommand, IpcMessage, REPLY_OK, REPLY_UNKNOWN, command_for_secondary, handle_command,
    handle_message,
};
pub use service::{Instance, IpcReceiver, IpcSubscriber};
