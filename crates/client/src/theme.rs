//! Light/dark theme behind the `#theme-toggle` switch.
//!
//! The page renders dark unless light was chosen earlier. The choice lives
//! in the same store as tab selections.

use crate::tabs::TabStore;

/// Id of the checkbox switching themes.
pub const TOGGLE_ID: &str = "theme-toggle";

/// Storage key of the chosen theme.
pub const THEME_KEY: &str = "ui-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Value written to storage and to the document's `data-theme`.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Theme selected by the toggle's checked state.
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    /// Whether the toggle shows this theme as checked.
    pub fn checked(self) -> bool {
        self == Theme::Light
    }
}

/// Theme to apply on page load. Only a stored `light` switches away from
/// the default; any other value is ignored.
pub fn restore(store: &impl TabStore) -> Theme {
    match store.get(THEME_KEY).as_deref() {
        Some("light") => Theme::Light,
        _ => Theme::Dark,
    }
}

/// Apply the toggle's new state and persist it.
pub fn toggle(checked: bool, store: &mut impl TabStore) -> Theme {
    let theme = Theme::from_checked(checked);
    store.set(THEME_KEY, theme.as_str());
    theme
}
