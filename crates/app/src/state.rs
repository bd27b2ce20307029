//! Application-wide runtime state owned by the event loop.

use services::Services;

use crate::config::Config;
use crate::launcher::Launcher;
use crate::launcher::window::WindowRegistry;

/// Runtime state shared by request handlers.
pub struct AppState {
    config: Config,
    services: Services,
    windows: WindowRegistry,
    launcher: Launcher,
}

impl AppState {
    pub fn new(config: Config, services: Services) -> Self {
        let windows = WindowRegistry::new();
        let launcher = Launcher::new(
            &config.launcher,
            services.applications.clone(),
            &windows,
        );

        Self {
            config,
            services,
            windows,
            launcher,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    pub fn launcher_mut(&mut self) -> &mut Launcher {
        &mut self.launcher
    }

    /// Rescan desktop entries and update visible results.
    pub fn refresh_applications(&mut self) {
        self.services.applications.refresh();
        self.launcher.refresh_results();
    }

    /// Replace the running config with `config`.
    pub fn apply_config(&mut self, config: Config) {
        if config == self.config {
            return;
        }

        self.services
            .applications
            .set_weights(config.launcher.weights);
        self.launcher.apply_config(&config.launcher);
        self.config = config;
        tracing::info!("Config applied");
    }
}
