//! Prompt preset discovery and prompt argument resolution.

use std::path::{Path, PathBuf};

use crate::scan;

/// Preset keywords the injection script understands without a file.
const BUILTIN_PRESETS: &[&str] = &["power-user", "power", "minimal", "min", "cli-mode", "cli"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPreset {
    pub label: String,
    pub value: String,
    pub file_path: PathBuf,
}

/// `*.json` presets from `primary` if it exists, else from `fallback`.
///
/// `power-user-prompt.json` becomes label and value `power-user`.
pub async fn list_presets(primary: &Path, fallback: &Path) -> Vec<PromptPreset> {
    let base = if scan::exists(primary).await {
        primary
    } else {
        fallback
    };

    let mut presets: Vec<PromptPreset> = scan::list_stems(base, "json")
        .await
        .into_iter()
        .map(|stem| {
            let label = stem.strip_suffix("-prompt").unwrap_or(&stem).to_string();
            PromptPreset {
                value: label.clone(),
                file_path: base.join(format!("{stem}.json")),
                label,
            }
        })
        .collect();
    presets.sort_by(|a, b| a.label.cmp(&b.label));
    presets
}

/// Expand a leading `~` against `home`.
pub fn expand_home(value: &str, home: &Path) -> String {
    if value == "~" {
        return home.display().to_string();
    }
    match value.strip_prefix("~/") {
        Some(rest) => home.join(rest).display().to_string(),
        None => value.to_string(),
    }
}

/// Prompt argument for the injection script.
///
/// An explicit prompt file wins; otherwise a built-in keyword is passed
/// through, a known preset maps to its file, and anything else is treated
/// as a path. `None` when neither input is given.
pub fn resolve_prompt_arg(
    presets: &[PromptPreset],
    preset: Option<&str>,
    prompt_file: Option<&str>,
    home: &Path,
) -> Option<String> {
    if let Some(file) = prompt_file {
        return Some(expand_home(file, home));
    }
    let preset = preset?;
    if BUILTIN_PRESETS.contains(&preset) {
        return Some(preset.to_string());
    }
    Some(
        presets
            .iter()
            .find(|candidate| candidate.value == preset)
            .map(|candidate| candidate.file_path.display().to_string())
            .unwrap_or_else(|| expand_home(preset, home)),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_presets_from_fallback_when_primary_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fallback = dir.path().join("prompts");
        std::fs::create_dir_all(&fallback).unwrap();
        std::fs::write(fallback.join("zeta-prompt.json"), "{}").unwrap();
        std::fs::write(fallback.join("alpha.json"), "{}").unwrap();
        std::fs::write(fallback.join("notes.txt"), "").unwrap();

        let presets = list_presets(&dir.path().join("missing"), &fallback).await;
        let labels: Vec<&str> = presets.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["alpha", "zeta"]);
        assert_eq!(presets[1].file_path, fallback.join("zeta-prompt.json"));
    }

    #[test]
    fn expands_home() {
        let home = Path::new("/home/me");
        assert_eq!(expand_home("~", home), "/home/me");
        assert_eq!(expand_home("~/p.json", home), "/home/me/p.json");
        assert_eq!(expand_home("/abs", home), "/abs");
    }

    #[test]
    fn prompt_arg_resolution_order() {
        let home = Path::new("/h");
        let presets = vec![PromptPreset {
            label: "team".into(),
            value: "team".into(),
            file_path: PathBuf::from("/p/team-prompt.json"),
        }];

        assert_eq!(
            resolve_prompt_arg(&presets, Some("team"), Some("~/x.json"), home).as_deref(),
            Some("/h/x.json")
        );
        assert_eq!(
            resolve_prompt_arg(&presets, Some("minimal"), None, home).as_deref(),
            Some("minimal")
        );
        assert_eq!(
            resolve_prompt_arg(&presets, Some("team"), None, home).as_deref(),
            Some("/p/team-prompt.json")
        );
        assert_eq!(
            resolve_prompt_arg(&presets, Some("~/other.json"), None, home).as_deref(),
            Some("/h/other.json")
        );
        assert_eq!(resolve_prompt_arg(&presets, None, None, home), None);
    }
}
