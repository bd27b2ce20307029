use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener as TokioUnixListener;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::args::Args;

use super::messages::{IpcMessage, command_for_secondary, decode_command, encode_command};

pub type IpcReceiver = mpsc::UnboundedReceiver<IpcMessage>;

const READ_TIMEOUT: Duration = Duration::from_millis(100);
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Outcome of claiming the control socket.
pub enum Instance {
    /// No other instance was running; this process serves requests.
    Primary(IpcSubscriber),
    /// Another instance handled the request and sent back `reply`.
    Secondary { reply: String },
}

/// Subscriber for IPC messages from other instances.
pub struct IpcSubscriber {
    /// The bound Unix listener (not yet accepting connections)
    listener: Option<TokioUnixListener>,
    /// Socket path for cleanup
    socket_path: PathBuf,
}

impl std::fmt::Debug for IpcSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpcSubscriber")
            .field("socket_path", &self.socket_path)
            .finish()
    }
}

impl IpcSubscriber {
    /// Become the primary instance, or hand `args` to the running one.
    ///
    /// The secondary path uses blocking I/O so that signalling a running
    /// instance needs no async runtime. Becoming primary must happen inside
    /// a tokio runtime.
    pub fn acquire(args: &Args) -> anyhow::Result<Instance> {
        Self::acquire_at(socket_path(), args)
    }

    fn acquire_at(path: PathBuf, args: &Args) -> anyhow::Result<Instance> {
        if let Ok(stream) = UnixStream::connect(&path) {
            let payload = encode_command(&command_for_secondary(args));
            let reply = send_request(stream, &payload)
                .context("Failed to signal existing instance")?;
            info!("Successfully signaled existing instance");
            return Ok(Instance::Secondary { reply });
        }

        // Nobody answered, so any socket file left behind is stale.
        if path.exists()
            && let Err(e) = std::fs::remove_file(&path)
        {
            warn!("Failed to remove stale socket: {}", e);
        }

        let listener = UnixListener::bind(&path)
            .with_context(|| format!("Failed to bind Unix socket {}", path.display()))?;
        listener
            .set_nonblocking(true)
            .context("Failed to set socket non-blocking")?;
        let listener =
            TokioUnixListener::from_std(listener).context("Failed to create async listener")?;

        info!("Prepared as primary instance, socket at {:?}", path);
        Ok(Instance::Primary(IpcSubscriber {
            listener: Some(listener),
            socket_path: path,
        }))
    }

    /// Start the listener and return a receiver for IPC messages.
    ///
    /// This must be called from within a tokio runtime context.
    pub fn start_listener(&mut self) -> IpcReceiver {
        let (sender, receiver) = mpsc::unbounded_channel();

        if let Some(listener) = self.listener.take() {
            let path = self.socket_path.clone();
            tokio::spawn(async move {
                accept_loop(listener, sender, path).await;
            });
        }

        receiver
    }
}

/// Write one request, half-close, and wait for the reply.
fn send_request(mut stream: UnixStream, payload: &str) -> std::io::Result<String> {
    stream.set_write_timeout(Some(READ_TIMEOUT))?;
    stream.set_read_timeout(Some(REPLY_TIMEOUT))?;

    stream.write_all(payload.as_bytes())?;
    stream.flush()?;
    stream.shutdown(std::net::Shutdown::Write)?;

    let mut reply = String::new();
    stream.read_to_string(&mut reply)?;
    Ok(reply)
}

/// Accept loop for incoming connections.
async fn accept_loop(
    listener: TokioUnixListener,
    sender: mpsc::UnboundedSender<IpcMessage>,
    socket_path: PathBuf,
) {
    static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

    info!("Socket listener started at {:?}", socket_path);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let sender = sender.clone();
                tokio::spawn(async move {
                    let id = REQUEST_COUNTER.fetch_add(1, Ordering::SeqCst);
                    if let Err(e) = handle_connection(stream, sender, id).await {
                        debug!("Request {} failed: {:#}", id, e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                // Small delay to prevent tight loop on persistent errors
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }
}

/// Read one request, hand it to the event loop, and write the reply.
async fn handle_connection(
    mut stream: tokio::net::UnixStream,
    sender: mpsc::UnboundedSender<IpcMessage>,
    id: u64,
) -> anyhow::Result<()> {
    let mut buffer = Vec::with_capacity(256);
    tokio::time::timeout(READ_TIMEOUT, stream.read_to_end(&mut buffer))
        .await
        .context("Timeout reading from socket")?
        .context("Error reading from socket")?;

    let payload = String::from_utf8_lossy(&buffer);
    let (reply_tx, reply_rx) = oneshot::channel();
    sender
        .send(IpcMessage {
            id,
            command: decode_command(&payload),
            reply: reply_tx,
        })
        .context("Event loop is gone")?;

    let reply = reply_rx.await.context("Request dropped without a reply")?;
    stream.write_all(reply.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

impl Drop for IpcSubscriber {
    fn drop(&mut self) {
        // Clean up socket file on shutdown
        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!("Failed to remove socket on shutdown: {}", e);
            } else {
                debug!("Removed socket file on shutdown");
            }
        }
    }
}

/// Get the socket path for IPC.
fn socket_path() -> PathBuf {
    // Prefer XDG_RUNTIME_DIR (user-only access, tmpfs)
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("shell-launcher.sock")
    } else {
        let uid = std::env::var("UID")
            .or_else(|_| std::env::var("SUDO_UID"))
            .or_else(|_| std::env::var("USER"))
            .unwrap_or_else(|_| "unknown".to_string());
        PathBuf::from(format!("/tmp/shell-launcher-{}.sock", uid))
    }
}
