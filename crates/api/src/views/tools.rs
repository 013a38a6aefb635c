//! Maintenance views: session tools, global and daemon pages, action results.

use std::path::Path;

use bridge_core::presets::PromptPreset;
use bridge_core::scripting::CommandOutput;
use bridge_core::services::{DaemonStatus, WatcherStatus};
use bridge_core::sessions::{ConfigScope, SessionConfig};

use super::layout::escape_html;
use super::pages::{badge, poll};

/// An extra input on a session tool form.
#[derive(Clone, Copy)]
enum Field {
    Text {
        label: &'static str,
        name: &'static str,
        placeholder: &'static str,
    },
    Switch {
        label: &'static str,
        name: &'static str,
        checked: bool,
    },
    Select {
        label: &'static str,
        name: &'static str,
        options: &'static [&'static str],
    },
    /// Preset dropdown filled from the discovered presets.
    Presets,
}

/// One form posting to `/actions/session`.
struct ToolForm {
    action: &'static str,
    button: &'static str,
    secondary: bool,
    confirm: Option<&'static str>,
    fields: &'static [Field],
}

const fn button(action: &'static str, button: &'static str, secondary: bool) -> ToolForm {
    ToolForm {
        action,
        button,
        secondary,
        confirm: None,
        fields: &[],
    }
}

const fn text(label: &'static str, name: &'static str, placeholder: &'static str) -> Field {
    Field::Text {
        label,
        name,
        placeholder,
    }
}

const DRY_RUN: Field = Field::Switch {
    label: "Dry run",
    name: "dryRun",
    checked: false,
};

const PROMPT_FORMS: &[ToolForm] = &[
    button("prompt-show", "Show Current Prompt", true),
    ToolForm {
        action: "prompt-inject",
        button: "Inject Prompt",
        secondary: false,
        confirm: None,
        fields: &[
            Field::Presets,
            text("Or custom prompt file", "promptFile", "/path/to/prompt.json"),
            Field::Switch {
                label: "Backup current prompt first",
                name: "backup",
                checked: true,
            },
            Field::Switch {
                label: "Dry run (preview only)",
                name: "dryRun",
                checked: false,
            },
        ],
    },
    button("prompt-restore", "Restore Prompt Backup", true),
];

const CONFIG_FORMS: &[ToolForm] = &[
    button("config-show", "Show Config", true),
    ToolForm {
        fields: &[Field::Select {
            label: "Model",
            name: "model",
            options: &["sonnet", "opus", "haiku"],
        }],
        ..button("config-model", "Update Model", false)
    },
    ToolForm {
        fields: &[text("Approve Path", "value", "~/projects")],
        ..button("config-approve-path", "Approve Path", false)
    },
    ToolForm {
        fields: &[text("Mount Folder", "value", "~/Documents")],
        ..button("config-mount", "Mount Folder", false)
    },
    button("config-list-tools", "List MCP Tools", true),
    ToolForm {
        fields: &[text("Enable Tool (hash)", "value", "tool-hash")],
        ..button("config-enable-tool", "Enable Tool", false)
    },
    ToolForm {
        fields: &[text("Disable Tool (hash)", "value", "tool-hash")],
        ..button("config-disable-tool", "Disable Tool", false)
    },
    button("config-backup", "Backup Config", true),
    button("config-restore", "Restore Config", true),
];

const BRIDGE_FORMS: &[ToolForm] = &[
    button("bridge-init", "Initialize Bridge", false),
    ToolForm {
        fields: &[
            text("Env Key", "envKey", "API_KEY"),
            text("Env Value", "envValue", "value"),
        ],
        ..button("bridge-env", "Inject Env", false)
    },
    ToolForm {
        confirm: Some(
            "Uninstall bridge from this session? This removes the .bridge folder and injected skill.",
        ),
        fields: &[DRY_RUN],
        ..button("bridge-uninstall", "Uninstall Bridge (Session)", true)
    },
];

fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{name}" value="{}" />"#,
        escape_html(value)
    )
}

fn switch(label: &str, name: &str, checked: bool) -> String {
    let checked = if checked { " checked" } else { "" };
    format!(
        r#"<label class="switch"><span>{label}</span><input type="checkbox" name="{name}" value="true"{checked} /><span class="switch-track"></span></label>"#
    )
}

fn submit(label: &str, secondary: bool) -> String {
    let class = if secondary { r#" class="secondary""# } else { "" };
    format!(r#"<button type="submit"{class}>{label}</button>"#)
}

fn confirm_attr(confirm: Option<&str>) -> String {
    confirm
        .map(|message| format!(r#" data-confirm="{}""#, escape_html(message)))
        .unwrap_or_default()
}

fn render_field(field: &Field, presets: &[PromptPreset]) -> String {
    match *field {
        Field::Text {
            label,
            name,
            placeholder,
        } => format!(
            r#"<label>{label} <input type="text" name="{name}" placeholder="{placeholder}" /></label>"#
        ),
        Field::Switch {
            label,
            name,
            checked,
        } => switch(label, name, checked),
        Field::Select {
            label,
            name,
            options,
        } => {
            let options: String = options
                .iter()
                .map(|o| format!(r#"<option value="{o}">{o}</option>"#))
                .collect();
            format!(r#"<label>{label} <select name="{name}">{options}</select></label>"#)
        }
        Field::Presets => {
            let options: String = presets
                .iter()
                .map(|preset| {
                    format!(
                        r#"<option value="{}">{}</option>"#,
                        escape_html(&preset.value),
                        escape_html(&preset.label)
                    )
                })
                .collect();
            format!(
                r#"<label>Preset <select name="preset"><option value="">Select preset</option>{options}</select></label>"#
            )
        }
    }
}

fn render_tool_form(form: &ToolForm, session: &str, presets: &[PromptPreset]) -> String {
    let fields: String = form
        .fields
        .iter()
        .map(|field| render_field(field, presets))
        .collect();
    format!(
        r#"
      <form method="post" action="/actions/session"{}>
        {}{}
        {fields}
        <div class="form-actions">{}</div>
      </form>"#,
        confirm_attr(form.confirm),
        hidden("action", form.action),
        hidden("path", session),
        submit(form.button, form.secondary),
    )
}

fn tool_panel(
    heading: &str,
    subtitle: &str,
    extra: &str,
    forms: &[ToolForm],
    session: &str,
    presets: &[PromptPreset],
) -> String {
    let forms: String = forms
        .iter()
        .map(|form| render_tool_form(form, session, presets))
        .collect();
    format!(
        r#"
    <div class="panel">
      <h2>{heading}</h2>
      <p class="panel-subtitle">{subtitle}</p>{extra}{forms}
    </div>"#
    )
}

/// The Tools tab of a session page.
///
/// Without a config file (or in direct-bridge mode) only an explanation is
/// shown, since every session action needs it.
pub fn session_tools(
    session: &Path,
    config: &SessionConfig,
    presets: &[PromptPreset],
    direct: bool,
) -> String {
    if direct || !config.exists() {
        let reason = if direct {
            "Session tools are unavailable in direct bridge mode. Unset BRIDGE_DIR to manage sessions.".to_string()
        } else {
            format!(
                "Missing cowork_settings.json. Looked for: {}",
                config.path.display()
            )
        };
        return format!(
            r#"
    <div class="panel">
      <h2>Session Tools</h2>
      <p class="notice">{}</p>
      <p class="notice">Open the session in Cowork and send one message to generate the config file.</p>
    </div>"#,
            escape_html(&reason)
        );
    }

    let scope = match config.scope {
        ConfigScope::Workspace => "Using workspace-level config",
        _ => "Using session config",
    };
    let scope_note = format!(
        r#"<p class="panel-subtitle">{scope}: <code>{}</code></p>"#,
        escape_html(&config.path.display().to_string())
    );
    let session = session.display().to_string();

    [
        tool_panel(
            "Prompt Injection",
            "Swap system prompts for a single session.",
            &scope_note,
            PROMPT_FORMS,
            &session,
            presets,
        ),
        tool_panel(
            "Session Config",
            "Model, mounts, and MCP tools for this session.",
            "",
            CONFIG_FORMS,
            &session,
            presets,
        ),
        tool_panel(
            "Bridge Setup",
            "Initialize or tear down bridge resources for this session.",
            "",
            BRIDGE_FORMS,
            &session,
            presets,
        ),
    ]
    .concat()
}

// ---------------------------------------------------------------------------
// Global page
// ---------------------------------------------------------------------------

/// Account and skill install details of the newest session.
#[derive(Debug, Clone)]
pub struct GlobalDetails {
    pub session_id: String,
    pub session_path: String,
    pub account_id: String,
    pub workspace_id: String,
    pub install_path: String,
    pub install_exists: bool,
}

fn global_form(action: &str, origin: &str, confirm: Option<&str>, inner: &str) -> String {
    format!(
        r#"
      <form method="post" action="/actions/global"{}>
        {}{}
        {inner}
      </form>"#,
        confirm_attr(confirm),
        hidden("action", action),
        hidden("origin", origin),
    )
}

pub fn global_details(details: Option<&GlobalDetails>) -> String {
    let Some(details) = details else {
        return r#"
      <div class="panel">
        <h2>Global Details</h2>
        <p class="panel-subtitle">No active sessions detected.</p>
        <p class="notice">Start a Cowork session to populate account/workspace details.</p>
      </div>"#
            .to_string();
    };

    let install_label = if details.install_exists {
        "Reinstall Skill (Latest Session)"
    } else {
        "Install Skill for Latest Session"
    };
    let install = global_form(
        "install-skill",
        "/global",
        None,
        &format!(
            "{}{}",
            hidden("sessionPath", &details.session_path),
            submit(install_label, false)
        ),
    );
    let install_all = global_form(
        "install-skill-all",
        "/global",
        None,
        &submit("Install Skill for All Sessions", true),
    );
    let present = badge(if details.install_exists {
        "installed"
    } else {
        "missing"
    });

    let kv = |label: &str, value: &str| {
        format!(
            r#"<div class="kv"><strong>{label}</strong><span class="mono">{}</span></div>"#,
            escape_html(value)
        )
    };

    format!(
        r#"
    <div class="panel">
      <h2>Global Details</h2>
      <p class="panel-subtitle">Derived from the most recently modified session.</p>
      <div class="grid cols-2">{}{}{}{}<div class="kv"><strong>Skill Present</strong><span>{present}</span></div></div>
      <div class="form-actions">{install}{install_all}</div>
    </div>"#,
        kv("Account ID", &details.account_id),
        kv("Workspace ID", &details.workspace_id),
        kv("Session", &details.session_id),
        kv("Skill Install Path", &details.install_path),
    )
}

pub fn global_maintenance() -> String {
    let dry_run = switch("Dry run", "dryRun", false);
    let setup = global_form(
        "setup-all",
        "/global",
        None,
        &format!(
            r#"{}{dry_run}<div class="form-actions">{}</div>"#,
            switch("Force re-setup of configured sessions", "force", false),
            submit("Setup All Sessions", false)
        ),
    );
    let uninstall_all = global_form(
        "uninstall-all",
        "/global",
        Some("Uninstall the bridge from ALL sessions? This removes .bridge folders and injected skills."),
        &format!(
            r#"{dry_run}<div class="form-actions">{}</div>"#,
            submit("Uninstall Bridge (All Sessions)", true)
        ),
    );
    let uninstall_global = global_form(
        "uninstall-global",
        "/global",
        Some("Uninstall global components (skills, tools, daemon)?"),
        &format!(
            r#"{dry_run}<div class="form-actions">{}</div>"#,
            submit("Uninstall Global Components", true)
        ),
    );
    format!(
        r#"
    <div class="panel">
      <h2>Global Maintenance</h2>
      <p class="panel-subtitle">Bulk setup and removal across all sessions.</p>
      {setup}
      <div class="divider"></div>
      {uninstall_all}
      <div class="divider"></div>
      {uninstall_global}
    </div>"#
    )
}

pub fn global_page() -> String {
    format!(
        r#"
      <div class="grid cols-2">
        {}
        {}
      </div>"#,
        poll("/global/details", "5s"),
        global_maintenance()
    )
}

// ---------------------------------------------------------------------------
// Daemon page
// ---------------------------------------------------------------------------

pub fn daemon_page() -> String {
    format!(
        r#"
      <div class="grid cols-2">
        {}
        {}
      </div>"#,
        poll("/daemon/auto-setup", "10s"),
        poll("/daemon/watcher", "5s")
    )
}

pub fn daemon_tools(status: DaemonStatus, plist: &Path) -> String {
    let forms: String = [
        ("daemon-start", "Start Daemon", false),
        ("daemon-stop", "Stop Daemon", true),
        ("daemon-status", "Refresh Status", true),
    ]
    .iter()
    .map(|(action, label, secondary)| {
        global_form(
            action,
            "/daemon",
            None,
            &format!(
                r#"<div class="form-actions">{}</div>"#,
                submit(label, *secondary)
            ),
        )
    })
    .collect();

    format!(
        r#"
    <div class="panel">
      <h2>Auto-Setup Daemon</h2>
      <p class="panel-subtitle">Manage the launchd service that auto-configures new sessions.</p>
      <p class="notice">Launchd plist: <code>{}</code></p>
      <p>Status: {}</p>{forms}
    </div>"#,
        escape_html(&plist.display().to_string()),
        badge(status.as_str()),
    )
}

pub fn watcher_tools(status: &WatcherStatus, log: Option<&str>) -> String {
    let forms: String = [
        ("watcher-start", "Start Watcher", false),
        ("watcher-stop", "Stop Watcher", true),
        ("watcher-restart", "Restart Watcher", true),
    ]
    .iter()
    .map(|(action, label, secondary)| {
        global_form(action, "/daemon", None, &submit(label, *secondary))
    })
    .collect();
    let pids = if status.pids.is_empty() {
        "n/a"
    } else {
        &status.pids
    };
    let log = log
        .filter(|s| !s.is_empty())
        .map(|log| format!(r#"<pre class="pre-scroll pre-wrap">{}</pre>"#, escape_html(log)))
        .unwrap_or_default();

    format!(
        r#"
    <div class="panel">
      <h2>Watcher</h2>
      <p class="panel-subtitle">Controls for the local CLI bridge watcher process.</p>
      <div class="grid cols-2">
        <div class="kv"><strong>Status</strong><span>{}</span></div>
        <div class="kv"><strong>PIDs</strong><span class="mono">{}</span></div>
      </div>
      <div class="form-actions">{forms}</div>
      {log}
    </div>"#,
        badge(status.as_str()),
        escape_html(pids),
    )
}

// ---------------------------------------------------------------------------
// Action result
// ---------------------------------------------------------------------------

pub fn action_result(title: &str, output: &CommandOutput, back: &str) -> String {
    let mut crumbs = vec![r#"<a href="/">Sessions</a>"#.to_string()];
    if back != "/" {
        let label = match back {
            "/global" => "Global",
            "/daemon" => "Daemon",
            _ => "Session",
        };
        crumbs.push(format!(r#"<a href="{}">{label}</a>"#, escape_html(back)));
    }
    crumbs.push("Result".into());

    let section = |heading: &str, text: &str| {
        if text.is_empty() {
            String::new()
        } else {
            format!(
                r#"<h3>{heading}</h3><pre class="pre-scroll pre-wrap">{}</pre>"#,
                escape_html(text)
            )
        }
    };

    format!(
        r#"
    <div class="panel">
      <div class="breadcrumbs">{}</div>
      <h2>{}</h2>
      <p class="notice">Exit code: {}</p>
      {}
      {}
      <p><a href="{}">Back</a></p>
    </div>"#,
        crumbs.join(" / "),
        escape_html(title),
        output.exit_code,
        section("Output", &output.stdout),
        section("Error", &output.stderr),
        escape_html(back),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
