use std::sync::Arc;

use bridge_core::actions::ActionEnv;
use bridge_core::SessionResolver;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is immutable after start-up.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Turns untrusted `path` parameters into session directories.
    pub resolver: Arc<SessionResolver>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let resolver = SessionResolver::new(&config.sessions_dir, config.bridge_dir.as_deref());
        Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
        }
    }

    /// Locations the maintenance action catalogue needs.
    pub fn action_env(&self) -> ActionEnv {
        ActionEnv {
            scripts_dir: self.config.scripts_dir.clone(),
            launchd_plist: self.config.launchd_plist.clone(),
            home: self.config.home_dir.clone(),
        }
    }
}
