//! Page shell and the string helpers every view uses.

use url::form_urlencoded;

/// Escape HTML special characters for text and attribute positions.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Encode a value for use inside a query string.
pub fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Top navigation entry marked as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Sessions,
    Global,
    Daemon,
}

impl Nav {
    const ALL: [(Nav, &'static str, &'static str); 3] = [
        (Nav::Sessions, "/", "Sessions"),
        (Nav::Global, "/global", "Global"),
        (Nav::Daemon, "/daemon", "Daemon"),
    ];
}

/// Wrap `body` in the full document: head, navigation, and the shared
/// confirmation dialog used by forms with `data-confirm`.
pub fn layout(title: &str, body: &str, active: Nav) -> String {
    let nav: String = Nav::ALL
        .iter()
        .map(|(nav, href, label)| {
            let class = if *nav == active { "active" } else { "" };
            format!(r#"<a href="{href}" class="{class}">{label}</a>"#)
        })
        .collect::<Vec<_>>()
        .join("\n          ");

    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{title}</title>
    <link rel="stylesheet" href="/public/styles.css" />
    <script src="/public/htmx-lite.js" defer></script>
    <script src="/public/ui.js" defer></script>
  </head>
  <body>
    <header>
      <h1>Cowork Bridge UI</h1>
      <p>Local dashboard for bridge sessions, requests, and streaming output.</p>
      <div class="nav-bar">
        <nav class="nav">
          {nav}
        </nav>
        <label class="switch theme-toggle">
          <span>Light mode</span>
          <input type="checkbox" id="theme-toggle" />
          <span class="switch-track"></span>
        </label>
      </div>
    </header>
    <main>
      {body}
    </main>
    <dialog id="confirm-dialog">
      <div class="dialog-body">
        <h3>Confirm Action</h3>
        <p data-confirm-message>Are you sure?</p>
        <div class="dialog-actions">
          <button type="button" data-confirm-ok>Confirm</button>
          <button type="button" class="secondary" data-confirm-cancel>Cancel</button>
        </div>
      </div>
    </dialog>
  </body>
</html>"#,
        title = escape_html(title),
    )
}

/// Standalone error page.
pub fn error_page(heading: &str, message: &str, back: Option<&str>) -> String {
    let back = back
        .map(|href| format!(r#"<a href="{}">Back</a>"#, escape_html(href)))
        .unwrap_or_default();
    let body = format!(
        r#"<div class="panel"><h2>{}</h2><pre>{}</pre>{back}</div>"#,
        escape_html(heading),
        escape_html(message),
    );
    layout("Error", &body, Nav::Sessions)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
