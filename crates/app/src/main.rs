//! Shell launcher - fuzzy application search and launch.

use services::Services;
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::config::Config;
use crate::ipc::{Instance, IpcSubscriber, command_for_secondary, handle_command};
use crate::state::AppState;

mod args;
mod config;
mod ipc;
mod keybinds;
mod launcher;
mod runtime;
mod state;

#[tokio::main]
async fn main() {
    #[cfg(not(target_os = "linux"))]
    compile_error!("This application requires a Linux system.");

    // Initialize tracing with RUST_LOG env var support
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut subscriber = match IpcSubscriber::acquire(&args) {
        Ok(Instance::Primary(subscriber)) => subscriber,
        Ok(Instance::Secondary { reply }) => {
            if !reply.is_empty() {
                println!("{}", reply);
            }
            return;
        }
        Err(err) => {
            tracing::error!("{:#}", err);
            std::process::exit(1);
        }
    };

    let config = Config::load();
    let services = Services::new(config.launcher.weights);
    let mut state = AppState::new(config, services);
    launcher::view::spawn(state.launcher());

    if args.has_request() {
        let reply = handle_command(command_for_secondary(&args), &mut state);
        tracing::info!("Startup request: {}", reply);
    }

    let requests = subscriber.start_listener();
    runtime::run(state, requests).await;
}
