//! Tab groups with a persisted selection.

use std::collections::HashMap;

/// Group id used when the group attribute is absent or empty.
pub const DEFAULT_GROUP: &str = "default";

/// Key-value storage surviving page loads.
pub trait TabStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

impl TabStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }
}

/// One set of tab buttons and their panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabGroup {
    id: String,
    tabs: Vec<String>,
    active: Option<String>,
}

impl TabGroup {
    pub fn new(group: Option<&str>, tabs: Vec<String>) -> Self {
        let id = group
            .filter(|group| !group.is_empty())
            .unwrap_or(DEFAULT_GROUP)
            .to_string();
        Self {
            id,
            tabs,
            active: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn storage_key(&self) -> String {
        format!("tab:{}", self.id)
    }

    /// Activate the stored tab, else the first one. A stored tab that no
    /// longer exists is still activated, leaving every panel hidden.
    pub fn restore(&mut self, store: &mut impl TabStore) -> Option<&str> {
        let tab = store
            .get(&self.storage_key())
            .or_else(|| self.tabs.first().cloned())?;
        self.activate(&tab, store);
        self.active.as_deref()
    }

    /// Activate `tab` and persist the choice.
    pub fn activate(&mut self, tab: &str, store: &mut impl TabStore) {
        store.set(&self.storage_key(), tab);
        self.active = Some(tab.to_string());
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Whether the button or panel named `tab` carries the active class.
    pub fn is_active(&self, tab: &str) -> bool {
        self.active.as_deref() == Some(tab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_tabs() -> TabGroup {
        TabGroup::new(
            Some("session"),
            ["overview", "tools", "jobs", "logs"].map(String::from).to_vec(),
        )
    }

    #[test]
    fn first_tab_without_saved_choice() {
        let mut store: HashMap<String, String> = HashMap::new();
        let mut group = session_tabs();
        assert_eq!(group.restore(&mut store), Some("overview"));
        assert_eq!(store.get("tab:session").map(String::as_str), Some("overview"));
    }

    #[test]
    fn saved_choice_wins() {
        let mut store = HashMap::from([("tab:session".to_string(), "jobs".to_string())]);
        let mut group = session_tabs();
        assert_eq!(group.restore(&mut store), Some("jobs"));
        assert!(group.is_active("jobs"));
        assert!(!group.is_active("overview"));
    }

    #[test]
    fn activation_is_persisted_per_group() {
        let mut store: HashMap<String, String> = HashMap::new();
        let mut session = session_tabs();
        let mut other = TabGroup::new(None, vec!["a".into(), "b".into()]);
        session.activate("logs", &mut store);
        other.activate("b", &mut store);

        assert_eq!(other.id(), DEFAULT_GROUP);
        assert_eq!(store.get("tab:session").map(String::as_str), Some("logs"));
        assert_eq!(store.get("tab:default").map(String::as_str), Some("b"));
    }

    #[test]
    fn empty_group_has_nothing_to_activate() {
        let mut store: HashMap<String, String> = HashMap::new();
        let mut group = TabGroup::new(Some(""), Vec::new());
        assert_eq!(group.id(), DEFAULT_GROUP);
        assert_eq!(group.restore(&mut store), None);
        assert!(store.is_empty());
    }
}
