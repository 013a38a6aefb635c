//! Trigger specification and swap mode parsing.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

/// Trigger used when an element has no trigger attribute.
pub const DEFAULT_TRIGGER: &str = "click";

static EVERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bevery\s+(\d+)(ms|s)\b").expect("static regex must compile")
});

/// When an element fetches its fragment. All three are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trigger {
    pub click: bool,
    pub load: bool,
    pub every: Option<Duration>,
}

impl Trigger {
    /// Parse the value of the trigger attribute.
    ///
    /// Tokens are separated by whitespace or commas. `click` and `load`
    /// must appear as whole tokens. The first `every <n>ms` or
    /// `every <n>s` sets the interval; a zero, overflowing or malformed
    /// interval sets none. An absent or empty attribute means `click`.
    pub fn parse(spec: Option<&str>) -> Self {
        let spec = match spec {
            Some(spec) if !spec.is_empty() => spec,
            _ => DEFAULT_TRIGGER,
        };

        let mut trigger = Trigger {
            every: parse_interval(spec),
            ..Trigger::default()
        };
        for token in spec.split(|c: char| c.is_whitespace() || c == ',') {
            match token {
                "click" => trigger.click = true,
                "load" => trigger.load = true,
                _ => {}
            }
        }
        trigger
    }

    pub fn is_empty(&self) -> bool {
        !self.click && !self.load && self.every.is_none()
    }
}

fn parse_interval(spec: &str) -> Option<Duration> {
    let caps = EVERY_RE.captures(spec)?;
    let value: u64 = caps[1].parse().ok()?;
    let millis = if caps[2].eq_ignore_ascii_case("ms") {
        value
    } else {
        value.checked_mul(1000)?
    };
    (millis > 0).then(|| Duration::from_millis(millis))
}

/// How a fetched fragment replaces its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwapMode {
    /// Replace the target's children; the target keeps its binding.
    #[default]
    Inner,
    /// Replace the target node itself.
    Outer,
}

impl SwapMode {
    /// Anything other than `outerHTML` swaps inner content.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("outerHTML") => SwapMode::Outer,
            _ => SwapMode::Inner,
        }
    }
}
