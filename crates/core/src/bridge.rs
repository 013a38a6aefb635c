//! Session path resolution and bridge directory layout.
//!
//! [`SessionResolver`] is the only place an untrusted path from a request
//! is turned into a file system location. It normalizes the input to an
//! absolute path and only accepts it when it lies under the sessions root
//! (or equals the direct-bridge override).

use std::path::{Component, Path, PathBuf};

/// Path segments from a session directory to its bridge directory.
const SESSION_BRIDGE_SEGMENTS: [&str; 2] = ["outputs", ".bridge"];

/// Resolves session paths and maps them to bridge directories.
#[derive(Debug, Clone)]
pub struct SessionResolver {
    sessions_root: PathBuf,
    bridge_override: Option<PathBuf>,
}

impl SessionResolver {
    /// Build a resolver. Both paths are made absolute up front so that
    /// containment checks compare like with like.
    pub fn new(sessions_root: impl AsRef<Path>, bridge_override: Option<&Path>) -> Self {
        Self {
            sessions_root: absolutize(sessions_root.as_ref()),
            bridge_override: bridge_override.map(absolutize),
        }
    }

    pub fn sessions_root(&self) -> &Path {
        &self.sessions_root
    }

    /// The configured direct-bridge directory, if any.
    pub fn bridge_override(&self) -> Option<&Path> {
        self.bridge_override.as_deref()
    }

    /// Whether the dashboard points at a single bridge directory.
    pub fn is_direct(&self) -> bool {
        self.bridge_override.is_some()
    }

    /// Resolve an untrusted session path.
    ///
    /// Returns `None` for empty input and for any path whose normalized
    /// absolute form is outside the sessions root, unless it is exactly the
    /// direct-bridge override. `..` segments are applied before the check,
    /// so they cannot escape the root.
    pub fn resolve(&self, input: &str) -> Option<PathBuf> {
        if input.trim().is_empty() {
            return None;
        }
        let resolved = absolutize(Path::new(input));

        if self.bridge_override.as_deref() == Some(resolved.as_path()) {
            return Some(resolved);
        }
        if resolved.starts_with(&self.sessions_root) {
            return Some(resolved);
        }
        None
    }

    /// The `<session-id>.json` sibling of a resolved session path.
    ///
    /// Only sessions strictly below the sessions root have one; the root
    /// itself and the direct-bridge override would point outside the tree.
    pub fn meta_file(&self, session: &Path) -> Option<PathBuf> {
        if self.bridge_override.as_deref() == Some(session)
            || session == self.sessions_root
            || !session.starts_with(&self.sessions_root)
        {
            return None;
        }
        let mut name = session.file_name()?.to_os_string();
        name.push(".json");
        Some(session.parent()?.join(name))
    }

    /// Bridge directory for a resolved session path.
    pub fn bridge_dir(&self, session: &Path) -> BridgeDir {
        match self.bridge_override.as_deref() {
            Some(direct) if direct == session => BridgeDir::new(direct),
            _ => BridgeDir::for_session(session),
        }
    }
}

/// Make `path` absolute against the current directory and normalize it
/// lexically. Symlinks are not followed.
pub fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(segment) => normalized.push(segment),
        }
    }
    normalized
}

/// A job id is joined into artifact file names, so it must be a single,
/// non-traversing path segment.
pub fn is_valid_job_id(id: &str) -> bool {
    !id.is_empty()
        && !id.contains('/')
        && !id.contains('\\')
        && !id.contains("..")
        && !id.contains('\0')
}

/// Layout of a bridge directory. Nothing here touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeDir {
    root: PathBuf,
}

impl BridgeDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<session>/outputs/.bridge`
    pub fn for_session(session: &Path) -> Self {
        let mut root = session.to_path_buf();
        for segment in SESSION_BRIDGE_SEGMENTS {
            root.push(segment);
        }
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn status_file(&self) -> PathBuf {
        self.root.join("status.json")
    }

    pub fn requests_dir(&self) -> PathBuf {
        self.root.join("requests")
    }

    pub fn responses_dir(&self) -> PathBuf {
        self.root.join("responses")
    }

    pub fn streams_dir(&self) -> PathBuf {
        self.root.join("streams")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn request_file(&self, id: &str) -> PathBuf {
        self.requests_dir().join(format!("{id}.json"))
    }

    pub fn response_file(&self, id: &str) -> PathBuf {
        self.responses_dir().join(format!("{id}.json"))
    }

    /// `requests/<id>.json.processing`; its existence marks in-flight work.
    pub fn processing_marker(&self, id: &str) -> PathBuf {
        self.requests_dir().join(format!("{id}.json.processing"))
    }

    pub fn stream_file(&self, id: &str) -> PathBuf {
        self.streams_dir().join(format!("{id}.log"))
    }

    pub fn bridge_log(&self) -> PathBuf {
        self.logs_dir().join("bridge.log")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SessionResolver {
        SessionResolver::new("/a/sessions", None)
    }

    #[test]
    fn accepts_path_under_root() {
        assert_eq!(
            resolver().resolve("/a/sessions/x/y"),
            Some(PathBuf::from("/a/sessions/x/y"))
        );
    }

    #[test]
    fn rejects_traversal_out_of_root() {
        assert_eq!(resolver().resolve("/a/sessions/x/../../etc/passwd"), None);
    }

    #[test]
    fn traversal_that_stays_inside_is_normalized() {
        assert_eq!(
            resolver().resolve("/a/sessions/x/../y"),
            Some(PathBuf::from("/a/sessions/y"))
        );
    }

    #[test]
    fn rejects_sibling_with_shared_prefix() {
        assert_eq!(resolver().resolve("/a/sessions-evil/x"), None);
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(resolver().resolve(""), None);
        assert_eq!(resolver().resolve("   "), None);
    }

    #[test]
    fn accepts_exact_bridge_override() {
        let resolver = SessionResolver::new("/a/sessions", Some(Path::new("/tmp/bridge")));
        assert_eq!(
            resolver.resolve("/tmp/bridge"),
            Some(PathBuf::from("/tmp/bridge"))
        );
        assert_eq!(resolver.resolve("/tmp/bridge/requests"), None);
        assert_eq!(resolver.resolve("/tmp"), None);
    }

    #[test]
    fn bridge_dir_for_session_and_direct_mode() {
        let resolver = SessionResolver::new("/a/sessions", Some(Path::new("/tmp/bridge")));
        assert_eq!(
            resolver.bridge_dir(Path::new("/a/sessions/x")).root(),
            Path::new("/a/sessions/x/outputs/.bridge")
        );
        assert_eq!(
            resolver.bridge_dir(Path::new("/tmp/bridge")).root(),
            Path::new("/tmp/bridge")
        );
    }

    #[test]
    fn meta_file_stays_inside_sessions_tree() {
        let resolver = SessionResolver::new("/a/sessions", Some(Path::new("/a/sessions/x/direct")));
        assert_eq!(
            resolver.meta_file(Path::new("/a/sessions/acct/ws/local_1")),
            Some(PathBuf::from("/a/sessions/acct/ws/local_1.json"))
        );
        assert_eq!(
            resolver.meta_file(Path::new("/a/sessions/x")),
            Some(PathBuf::from("/a/sessions/x.json"))
        );
        assert_eq!(resolver.meta_file(Path::new("/a/sessions")), None);
        assert_eq!(resolver.meta_file(Path::new("/a/sessions/x/direct")), None);
        assert_eq!(resolver.meta_file(Path::new("/tmp/bridge")), None);
    }

    #[test]
    fn processing_marker_sits_next_to_request() {
        let dir = BridgeDir::new("/b");
        assert_eq!(
            dir.processing_marker("job-1"),
            PathBuf::from("/b/requests/job-1.json.processing")
        );
    }

    #[test]
    fn job_id_validation() {
        assert!(is_valid_job_id("job-20250101-120000-ab12"));
        assert!(!is_valid_job_id(""));
        assert!(!is_valid_job_id("../status"));
        assert!(!is_valid_job_id("a/b"));
    }
}
