use serde::{Deserialize, Serialize};

/// Repository facts needed to build a permalink for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryState {
    /// Absolute path to the repository working tree.
    pub root: String,
    /// Push URL of the selected remote, falling back to its fetch URL.
    #[serde(default)]
    pub remote_url: Option<String>,
    /// Full object id of the HEAD commit, when HEAD is born.
    #[serde(default)]
    pub commit: Option<String>,
    /// Name of the checked-out branch, including an unborn one.
    #[serde(default)]
    pub branch: Option<String>,
}

impl RepositoryState {
    /// Reference to anchor a permalink to: the commit, else the branch.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        let non_empty = |value: &&str| !value.is_empty();
        self.commit
            .as_deref()
            .filter(non_empty)
            .or_else(|| self.branch.as_deref().filter(non_empty))
    }
}

/// Push and fetch URLs configured for a single remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteInfo {
    /// Remote name (e.g., "origin").
    pub name: String,
    /// Explicit push URL, if configured.
    #[serde(default)]
    pub push_url: Option<String>,
    /// Fetch URL, if configured.
    #[serde(default)]
    pub fetch_url: Option<String>,
}

impl RemoteInfo {
    /// URL used for links: the push URL, else the fetch URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        let non_empty = |url: &&str| !url.is_empty();
        self.push_url
            .as_deref()
            .filter(non_empty)
            .or_else(|| self.fetch_url.as_deref().filter(non_empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(commit: Option<&str>, branch: Option<&str>) -> RepositoryState {
        RepositoryState {
            root: "/tmp/repo".into(),
            remote_url: Some("git@github.com:user/repo.git".into()),
            commit: commit.map(str::to_owned),
            branch: branch.map(str::to_owned),
        }
    }

    #[test]
    fn reference_prefers_commit() {
        let state = state(Some("deadbeef"), Some("main"));
        assert_eq!(state.reference(), Some("deadbeef"));
    }

    #[test]
    fn reference_falls_back_to_branch() {
        assert_eq!(state(None, Some("main")).reference(), Some("main"));
        assert_eq!(state(Some(""), Some("main")).reference(), Some("main"));
        assert_eq!(state(None, None).reference(), None);
    }

    #[test]
    fn remote_url_prefers_push_url() {
        let remote = RemoteInfo {
            name: "origin".into(),
            push_url: Some("git@github.com:user/repo.git".into()),
            fetch_url: Some("https://github.com/user/repo.git".into()),
        };
        assert_eq!(remote.url(), Some("git@github.com:user/repo.git"));

        let fetch_only = RemoteInfo {
            push_url: None,
            ..remote
        };
        assert_eq!(fetch_only.url(), Some("https://github.com/user/repo.git"));
    }

    #[test]
    fn empty_push_url_falls_back_to_fetch_url() {
        let remote = RemoteInfo {
            name: "origin".into(),
            push_url: Some(String::new()),
            fetch_url: Some("https://github.com/user/repo.git".into()),
        };
        assert_eq!(remote.url(), Some("https://github.com/user/repo.git"));

        let blank = RemoteInfo {
            fetch_url: Some(String::new()),
            ..remote
        };
        assert_eq!(blank.url(), None);
    }

    #[test]
    fn repository_state_defaults() {
        let json = r#"{ "root": "/tmp/repo" }"#;
        let state: RepositoryState = serde_json::from_str(json).expect("deserialize state");
        assert_eq!(state.root, "/tmp/repo");
        assert!(state.remote_url.is_none());
        assert!(state.reference().is_none());
    }
}
