//! Maintenance action catalogue.
//!
//! Translates an action name plus form fields into the script invocation
//! that carries it out. Planning is pure; running the plan is left to
//! [`crate::scripting::run_command`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::presets::{self, PromptPreset};
use crate::scripting::Invocation;

/// launchd label of the auto-setup daemon.
pub const DAEMON_LABEL: &str = "com.claude.bridge-auto-setup";

/// Form fields submitted with an action. Blank values count as absent.
#[derive(Debug, Clone, Default)]
pub struct ActionParams(HashMap<String, String>);

impl ActionParams {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self(fields)
    }

    /// Non-blank value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Checkbox semantics: only the literal `true` is set.
    pub fn flag(&self, name: &str) -> bool {
        self.0.get(name).map(String::as_str) == Some("true")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ActionParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Why an action could not be planned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    Unknown(String),

    #[error("{0}")]
    MissingInput(&'static str),

    #[error("Confirmation required.")]
    ConfirmationRequired,
}

/// A titled action and the invocation that performs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPlan {
    pub title: &'static str,
    pub invocation: Result<Invocation, ActionError>,
}

/// Locations the catalogue needs to build invocations.
#[derive(Debug, Clone)]
pub struct ActionEnv {
    pub scripts_dir: PathBuf,
    pub launchd_plist: PathBuf,
    pub home: PathBuf,
}

impl ActionEnv {
    fn script(&self, name: &str, args: Vec<String>, secs: u64) -> Invocation {
        Invocation::new(self.scripts_dir.join(name), args, Duration::from_secs(secs))
    }

    fn launchctl(&self, args: Vec<String>) -> Invocation {
        Invocation::new("launchctl", args, Duration::from_secs(15))
    }
}

/// Inputs for a session-scoped action.
#[derive(Debug, Clone, Copy)]
pub struct SessionTarget<'a> {
    pub session: &'a Path,
    /// Directory holding `cowork_settings.json`.
    pub config_dir: &'a Path,
    pub presets: &'a [PromptPreset],
}

fn title(title: &'static str, invocation: Result<Invocation, ActionError>) -> ActionPlan {
    ActionPlan { title, invocation }
}

fn required<'p>(params: &'p ActionParams, name: &str, message: &'static str) -> Result<&'p str, ActionError> {
    params.get(name).ok_or(ActionError::MissingInput(message))
}

fn confirmed(params: &ActionParams) -> Result<(), ActionError> {
    if params.flag("confirmed") {
        Ok(())
    } else {
        Err(ActionError::ConfirmationRequired)
    }
}

/// Plan an action from the session tools page.
pub fn plan_session_action(
    env: &ActionEnv,
    action: &str,
    target: SessionTarget<'_>,
    params: &ActionParams,
) -> ActionPlan {
    let session = target.session.display().to_string();
    let config = target.config_dir.display().to_string();
    let s = |items: &[&str]| items.iter().map(|item| item.to_string()).collect::<Vec<_>>();
    let inject_session = |verb: &str, extra: Option<&str>, secs: u64| {
        let mut args = s(&["--session", config.as_str(), verb]);
        args.extend(extra.map(str::to_string));
        env.script("inject-session.sh", args, secs)
    };

    match action {
        "prompt-show" => title(
            "Show Prompt",
            Ok(env.script("inject-prompt.sh", s(&["--session", session.as_str(), "--show"]), 15)),
        ),
        "prompt-restore" => title(
            "Restore Prompt",
            Ok(env.script("inject-prompt.sh", s(&["--session", session.as_str(), "--restore"]), 15)),
        ),
        "prompt-inject" => title(
            "Inject Prompt",
            presets::resolve_prompt_arg(
                target.presets,
                params.get("preset"),
                params.get("promptFile"),
                &env.home,
            )
            .ok_or(ActionError::MissingInput(
                "Select a preset or provide a prompt file path.",
            ))
            .map(|prompt| {
                let mut args = s(&["--session", session.as_str()]);
                if params.flag("backup") {
                    args.push("--backup".into());
                }
                if params.flag("dryRun") {
                    args.push("--dry-run".into());
                }
                args.push(prompt);
                env.script("inject-prompt.sh", args, 20)
            }),
        ),
        "config-show" => title("Show Config", Ok(inject_session("show", None, 15))),
        "config-model" => title(
            "Update Model",
            Ok(inject_session(
                "model",
                Some(params.get("model").unwrap_or("sonnet")),
                15,
            )),
        ),
        "config-approve-path" => title(
            "Approve Path",
            required(params, "value", "Provide a path to approve.")
                .map(|value| inject_session("approve-path", Some(value), 15)),
        ),
        "config-mount" => title(
            "Mount Folder",
            required(params, "value", "Provide a folder path to mount.")
                .map(|value| inject_session("mount", Some(value), 15)),
        ),
        "config-list-tools" => title("List MCP Tools", Ok(inject_session("list-tools", None, 20))),
        "config-enable-tool" => title(
            "Enable Tool",
            required(params, "value", "Provide a tool hash to enable.")
                .map(|value| inject_session("enable-tool", Some(value), 15)),
        ),
        "config-disable-tool" => title(
            "Disable Tool",
            required(params, "value", "Provide a tool hash to disable.")
                .map(|value| inject_session("disable-tool", Some(value), 15)),
        ),
        "config-backup" => title("Backup Config", Ok(inject_session("backup", None, 15))),
        "config-restore" => title("Restore Config", Ok(inject_session("restore", None, 15))),
        "bridge-init" => title(
            "Initialize Bridge",
            Ok(env.script("bridge-init.sh", s(&[session.as_str()]), 30)),
        ),
        "bridge-env" => title(
            "Inject Env Var",
            required(params, "envKey", "Provide an env key.").map(|key| {
                let pair = format!("{key}={}", params.get("envValue").unwrap_or_default());
                env.script("bridge-init.sh", s(&["--env", session.as_str(), pair.as_str()]), 15)
            }),
        ),
        "bridge-uninstall" => title(
            "Uninstall Bridge (Session)",
            confirmed(params).map(|()| {
                let mut args = s(&["--session", session.as_str()]);
                if params.flag("dryRun") {
                    args.push("true".into());
                }
                env.script("bridge-uninstall.sh", args, 30)
            }),
        ),
        other => title("Action Result", Err(ActionError::Unknown(other.to_string()))),
    }
}

/// Plan an action from the global or daemon pages.
pub fn plan_global_action(env: &ActionEnv, action: &str, params: &ActionParams) -> ActionPlan {
    let plist = env.launchd_plist.display().to_string();
    let dry_run_tail = |mut args: Vec<String>| {
        if params.flag("dryRun") {
            args.push("true".into());
        }
        args
    };

    match action {
        "setup-all" => {
            let mut args = Vec::new();
            if params.flag("force") {
                args.push("--force".to_string());
            }
            if params.flag("dryRun") {
                args.push("--dry-run".to_string());
            }
            title(
                "Setup All Sessions",
                Ok(env.script("setup-all-sessions.sh", args, 60)),
            )
        }
        "uninstall-all" => title(
            "Uninstall All Sessions",
            confirmed(params).map(|()| {
                env.script("bridge-uninstall.sh", dry_run_tail(vec!["--all".into()]), 60)
            }),
        ),
        "uninstall-global" => title(
            "Uninstall Global Components",
            confirmed(params).map(|()| {
                env.script("bridge-uninstall.sh", dry_run_tail(vec!["--global".into()]), 60)
            }),
        ),
        "install-skill" => title(
            "Install Skill (Latest Session)",
            required(params, "sessionPath", "Missing session path.")
                .map(|path| env.script("bridge-init.sh", vec![path.to_string()], 30)),
        ),
        "install-skill-all" => title(
            "Install Skill (All Sessions)",
            Ok(env.script("setup-all-sessions.sh", vec!["--force".into()], 60)),
        ),
        "watcher-start" | "watcher-stop" | "watcher-restart" => {
            let verb = action.trim_start_matches("watcher-");
            let label = match verb {
                "start" => "Start Watcher",
                "stop" => "Stop Watcher",
                _ => "Restart Watcher",
            };
            title(
                label,
                Ok(env.script("watcher-control.sh", vec![verb.to_string()], 15)),
            )
        }
        "daemon-start" => title(
            "Start Auto-Setup Daemon",
            Ok(env.launchctl(vec!["load".into(), plist])),
        ),
        "daemon-stop" => title(
            "Stop Auto-Setup Daemon",
            Ok(env.launchctl(vec!["unload".into(), plist])),
        ),
        "daemon-status" => title("Daemon Status", Ok(env.launchctl(vec!["list".into()]))),
        other => title("Global Action", Err(ActionError::Unknown(other.to_string()))),
    }
}

/// Page to return to after a global action; only known pages are honoured.
pub fn global_back_link(origin: Option<&str>) -> &'static str {
    match origin {
        Some("/daemon") => "/daemon",
        Some("/global") => "/global",
        _ => "/",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
