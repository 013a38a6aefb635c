use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running the dashboard locally next
/// to the agent. Configuration is read once at start-up and never changes.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `8787`).
    pub port: u16,
    /// Root of the agent's session tree.
    pub sessions_dir: PathBuf,
    /// Direct-bridge override; when set the dashboard shows this single
    /// bridge directory instead of discovering sessions.
    pub bridge_dir: Option<PathBuf>,
    /// Shared static token. Empty disables auth.
    pub auth_token: String,
    /// Directory holding the maintenance scripts.
    pub scripts_dir: PathBuf,
    /// Prompt presets used when `~/.claude/prompts` does not exist.
    pub prompts_dir: PathBuf,
    /// Static assets served under `/public`.
    pub assets_dir: PathBuf,
    /// Log file of the CLI bridge watcher.
    pub watcher_log: PathBuf,
    /// launchd plist of the auto-setup daemon.
    pub launchd_plist: PathBuf,
    /// User home, used for `~` expansion and the primary prompts directory.
    pub home_dir: PathBuf,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                                     |
    /// |------------------------|-------------------------------------------------------------|
    /// | `HOST`                 | `127.0.0.1`                                                 |
    /// | `PORT`                 | `8787`                                                      |
    /// | `SESSIONS_DIR`         | `~/Library/Application Support/Claude/local-agent-mode-sessions` |
    /// | `BRIDGE_DIR`           | unset                                                       |
    /// | `BRIDGE_TOKEN`         | empty                                                       |
    /// | `SCRIPTS_DIR`          | `./scripts`                                                 |
    /// | `PROMPTS_DIR`          | `./prompts`                                                 |
    /// | `ASSETS_DIR`           | `./public`                                                  |
    /// | `WATCHER_LOG`          | `/tmp/cowork-bridge-watcher.log`                            |
    /// | `LAUNCHD_PLIST`        | `~/Library/LaunchAgents/com.claude.bridge-auto-setup.plist` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                                        |
    pub fn from_env() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8787".into())
            .parse()
            .expect("PORT must be a valid u16");

        let sessions_dir = env_path("SESSIONS_DIR").unwrap_or_else(|| {
            home_dir
                .join("Library")
                .join("Application Support")
                .join("Claude")
                .join("local-agent-mode-sessions")
        });

        let launchd_plist = env_path("LAUNCHD_PLIST").unwrap_or_else(|| {
            home_dir
                .join("Library")
                .join("LaunchAgents")
                .join("com.claude.bridge-auto-setup.plist")
        });

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            sessions_dir,
            bridge_dir: env_path("BRIDGE_DIR"),
            auth_token: std::env::var("BRIDGE_TOKEN").unwrap_or_default(),
            scripts_dir: env_path("SCRIPTS_DIR").unwrap_or_else(|| PathBuf::from("scripts")),
            prompts_dir: env_path("PROMPTS_DIR").unwrap_or_else(|| PathBuf::from("prompts")),
            assets_dir: env_path("ASSETS_DIR").unwrap_or_else(|| PathBuf::from("public")),
            watcher_log: env_path("WATCHER_LOG")
                .unwrap_or_else(|| PathBuf::from("/tmp/cowork-bridge-watcher.log")),
            launchd_plist,
            home_dir,
            request_timeout_secs,
        }
    }

    /// `~/.claude/prompts`, the preferred preset directory.
    pub fn user_prompts_dir(&self) -> PathBuf {
        self.home_dir.join(".claude").join("prompts")
    }

    pub fn auth_enabled(&self) -> bool {
        !self.auth_token.is_empty()
    }
}

/// Non-empty env var as a path.
fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
