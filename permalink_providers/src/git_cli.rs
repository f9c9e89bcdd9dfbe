use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use permalink_provider_api::{ProviderError, ProviderResult, RemoteInfo, RepositoryInfoProvider};
use tracing::debug;
use wait_timeout::ChildExt;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Repository info provider that shells out to the `git` command-line tool.
#[derive(Debug, Clone)]
pub struct GitCliProvider {
    binary: OsString,
    timeout: Duration,
}

impl GitCliProvider {
    /// Provider that runs `git` from `PATH` with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            binary: OsString::from("git"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Use a specific `git` executable.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<OsString>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Bound every `git` invocation by `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn run(&self, dir: &Path, args: &[&str]) -> ProviderResult<ProcessOutput> {
        debug!(binary = ?self.binary, dir = %dir.display(), ?args, "running git");

        let mut command = Command::new(&self.binary);
        command.arg("-C").arg(dir).args(args);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        command.env("GIT_TERMINAL_PROMPT", "0");

        let mut child = command
            .spawn()
            .map_err(|err| ProviderError::message(format!("failed to spawn git: {err}")))?;

        let stdout_handle = child.stdout.take().map(|mut stdout| {
            thread::spawn(move || -> io::Result<Vec<u8>> {
                let mut buffer = Vec::new();
                stdout.read_to_end(&mut buffer)?;
                Ok(buffer)
            })
        });

        let stderr_handle = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || -> io::Result<Vec<u8>> {
                let mut buffer = Vec::new();
                stderr.read_to_end(&mut buffer)?;
                Ok(buffer)
            })
        });

        match child.wait_timeout(self.timeout) {
            Ok(Some(_)) => (),
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProviderError::message(format!(
                    "git timed out after {:?}",
                    self.timeout
                )));
            }
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProviderError::message(format!(
                    "failed waiting on git: {err}"
                )));
            }
        }

        let status = child
            .wait()
            .map_err(|err| ProviderError::message(format!("failed to reap git: {err}")))?;

        let stdout = join_reader(stdout_handle, "stdout")?;
        let stderr = join_reader(stderr_handle, "stderr")?;

        Ok(ProcessOutput {
            code: status.code(),
            stdout,
            stderr,
        })
    }

    /// Run a query whose non-zero exit is always a failure.
    fn query(&self, dir: &Path, args: &[&str], context: &str) -> ProviderResult<String> {
        let output = self.run(dir, args)?;
        if output.success() {
            if !output.stderr.trim().is_empty() {
                debug!(stderr = output.stderr.trim(), "git wrote diagnostics");
            }
            return Ok(output.stdout);
        }
        Err(output.failure(context))
    }

    /// Run a query where exit status 1 with no stderr means "no value".
    fn optional_query(
        &self,
        dir: &Path,
        args: &[&str],
        context: &str,
    ) -> ProviderResult<Option<String>> {
        let output = self.run(dir, args)?;
        if output.success() {
            return Ok(first_line(&output.stdout));
        }
        if output.code == Some(1) && output.stderr.trim().is_empty() {
            return Ok(None);
        }
        Err(output.failure(context))
    }

    fn config_value(&self, root: &Path, key: &str) -> ProviderResult<Option<String>> {
        self.optional_query(
            root,
            &["config", "--get", key],
            "Could not get remote URL. Is this a git repository?",
        )
    }
}

impl Default for GitCliProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryInfoProvider for GitCliProvider {
    fn id(&self) -> &'static str {
        "git-cli"
    }

    fn label(&self) -> &'static str {
        "Git command line"
    }

    fn discover_root(&self, path: &Path) -> ProviderResult<PathBuf> {
        let dir = query_dir(path);
        let output = self.run(&dir, &["rev-parse", "--show-toplevel"])?;
        if !output.success() {
            debug!(stderr = output.stderr.trim(), "git could not locate a repository");
            return Err(ProviderError::NotARepository {
                path: dir.to_string_lossy().into_owned(),
            });
        }
        first_line(&output.stdout)
            .map(PathBuf::from)
            .ok_or_else(|| ProviderError::message("git did not report a repository root"))
    }

    fn remotes(&self, root: &Path) -> ProviderResult<Vec<RemoteInfo>> {
        let names = self.query(
            root,
            &["remote"],
            "Could not get remote URL. Is this a git repository?",
        )?;

        names
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| -> ProviderResult<RemoteInfo> {
                Ok(RemoteInfo {
                    name: name.to_string(),
                    push_url: self.config_value(root, &format!("remote.{name}.pushurl"))?,
                    fetch_url: self.config_value(root, &format!("remote.{name}.url"))?,
                })
            })
            .collect()
    }

    fn head_commit(&self, root: &Path) -> ProviderResult<Option<String>> {
        self.optional_query(
            root,
            &["rev-parse", "--verify", "--quiet", "HEAD"],
            "Could not get commit hash.",
        )
    }

    fn current_branch(&self, root: &Path) -> ProviderResult<Option<String>> {
        self.optional_query(
            root,
            &["symbolic-ref", "--quiet", "--short", "HEAD"],
            "Could not get branch name.",
        )
    }
}

#[derive(Debug)]
struct ProcessOutput {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl ProcessOutput {
    const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Failure carrying git's own diagnostic when it printed one.
    fn failure(&self, context: &str) -> ProviderError {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            ProviderError::message(context)
        } else {
            ProviderError::message(format!("{context} {stderr}"))
        }
    }
}

fn join_reader(
    handle: Option<thread::JoinHandle<io::Result<Vec<u8>>>>,
    stream: &str,
) -> ProviderResult<String> {
    match handle {
        Some(handle) => {
            let bytes = handle
                .join()
                .map_err(|_| ProviderError::message(format!("failed to join git {stream} reader")))?
                .map_err(|err| {
                    ProviderError::message(format!("failed to read git {stream}: {err}"))
                })?;
            Ok(String::from_utf8_lossy(&bytes).to_string())
        }
        None => Ok(String::new()),
    }
}

fn first_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_owned)
}

/// `git -C` needs a directory; files are queried from their parent.
fn query_dir(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
