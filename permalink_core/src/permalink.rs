//! Pure permalink construction from remote URL, reference, path, and lines.

use std::fmt;

use crate::LineRange;

const SSH_PREFIX: &str = "git@";
const GIT_SUFFIX: &str = ".git";

/// Hosting service family, chosen by the remote's host segment.
///
/// Each variant knows its path segment and line-anchor syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostProvider {
    /// GitHub-compatible `blob` URLs (GitHub, GitLab, and unknown hosts).
    Generic,
    /// Bitbucket Cloud `src` URLs.
    Bitbucket,
}

impl HostProvider {
    /// Select the provider for an already normalized HTTPS base URL.
    #[must_use]
    pub fn detect(base_url: &str) -> Self {
        if host_segment(base_url)
            .to_ascii_lowercase()
            .contains("bitbucket.org")
        {
            Self::Bitbucket
        } else {
            Self::Generic
        }
    }

    /// Path segment placed between the repository URL and the reference.
    #[must_use]
    pub const fn tree_segment(self) -> &'static str {
        match self {
            Self::Generic => "blob",
            Self::Bitbucket => "src",
        }
    }

    /// Fragment for `lines`, or `None` when no line is selected.
    #[must_use]
    pub fn anchor(self, lines: LineRange) -> Option<String> {
        if lines.start == 0 {
            return None;
        }
        let start = lines.start;
        let end = lines.end;
        let anchor = match (self, lines.is_span()) {
            (Self::Generic, false) => format!("#L{start}"),
            (Self::Generic, true) => format!("#L{start}-L{end}"),
            (Self::Bitbucket, false) => format!("#lines-{start}"),
            (Self::Bitbucket, true) => format!("#lines-{start}:{end}"),
        };
        Some(anchor)
    }
}

impl fmt::Display for HostProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => f.write_str("generic"),
            Self::Bitbucket => f.write_str("bitbucket"),
        }
    }
}

/// Build the permalink for `file_path` at `reference` in the repository
/// hosted at `remote_url`.
///
/// `start_line` and `end_line` are 1-based. A `start_line` of 0 omits the
/// fragment; an `end_line` of 0 or equal to `start_line` yields a single-line
/// anchor. Reversed ranges are emitted as given.
///
/// ```
/// use permalink_core::permalink::build;
///
/// let url = build("git@github.com:user/repo.git", "deadbeef", "src\\lib.rs", 3, 8);
/// assert_eq!(url, "https://github.com/user/repo/blob/deadbeef/src/lib.rs#L3-L8");
/// ```
#[must_use]
pub fn build(
    remote_url: &str,
    reference: &str,
    file_path: &str,
    start_line: u32,
    end_line: u32,
) -> String {
    build_for_lines(
        remote_url,
        reference,
        file_path,
        LineRange::new(start_line, end_line),
    )
}

/// Same as [`build`], taking the lines as a [`LineRange`].
#[must_use]
pub fn build_for_lines(
    remote_url: &str,
    reference: &str,
    file_path: &str,
    lines: LineRange,
) -> String {
    let base = normalize_remote_url(remote_url);
    let provider = HostProvider::detect(&base);
    let path = normalize_path(file_path);

    let mut link = format!(
        "{base}/{segment}/{reference}/{path}",
        segment = provider.tree_segment()
    );
    if let Some(anchor) = provider.anchor(lines) {
        link.push_str(&anchor);
    }
    link
}

/// Rewrite a remote URL into the HTTPS base of the repository web UI.
///
/// Trailing slashes are removed, then one trailing `.git` is dropped, and
/// `git@host:owner/repo` becomes `https://host/owner/repo` (only the first
/// `:` is replaced). Other forms pass through.
#[must_use]
pub fn normalize_remote_url(remote_url: &str) -> String {
    let unslashed = remote_url.trim_end_matches('/');
    let trimmed = unslashed.strip_suffix(GIT_SUFFIX).unwrap_or(unslashed);
    match trimmed.strip_prefix(SSH_PREFIX) {
        Some(rest) => format!("https://{}", rest.replacen(':', "/", 1)),
        None => trimmed.to_string(),
    }
}

/// Convert every backslash to a forward slash.
#[must_use]
pub fn normalize_path(file_path: &str) -> String {
    file_path.replace('\\', "/")
}

/// Host portion of a URL: the text between `://` (if any) and the next `/`.
fn host_segment(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
}
