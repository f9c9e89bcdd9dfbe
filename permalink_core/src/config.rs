use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::repository::display_path;
use crate::{Error, Result};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".permalink.toml";

const DEFAULT_PROVIDER: &str = "libgit2";
const DEFAULT_GIT_BINARY: &str = "git";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings that pick the repository provider and the remote to link to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Identifier of the provider used to read repository state.
    pub provider: String,
    /// Remote to link to; the first configured remote when unset or missing.
    pub remote: Option<String>,
    /// Options for the `git-cli` provider.
    pub git_cli: GitCliConfig,
}

/// Options for the provider that shells out to `git`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitCliConfig {
    /// Executable to run.
    pub binary: PathBuf,
    /// Seconds before a `git` invocation is killed.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            remote: None,
            git_cli: GitCliConfig::default(),
        }
    }
}

impl Default for GitCliConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_GIT_BINARY),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GitCliConfig {
    /// Timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load `.permalink.toml` from `dir`, or defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails for a reason other than
    /// not-found, `Error::Config` if the TOML is malformed, or
    /// `Error::InvalidConfig` if a value is unusable.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&path, &content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(Error::Io {
                path: display_path(&path),
                source,
            }),
        }
    }

    /// Load an explicitly named config file; it must exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, `Error::Config` if the
    /// TOML is malformed, or `Error::InvalidConfig` if a value is unusable.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: display_path(path),
            source,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|source| Error::Config {
            path: display_path(path),
            source,
        })?;
        if config.git_cli.timeout_secs == 0 {
            return Err(Error::InvalidConfig {
                path: display_path(path),
                reason: "git_cli.timeout_secs must be at least 1".into(),
            });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        let config = Config::load(temp.path())?;

        assert_eq!(config, Config::default());
        assert_eq!(config.provider, "libgit2");
        assert_eq!(config.git_cli.timeout(), Duration::from_secs(10));
        Ok(())
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "provider = \"git-cli\"\nremote = \"upstream\"\n\n[git_cli]\ntimeout_secs = 3\n",
        )
        .expect("write config");

        let config = Config::load(temp.path())?;
        assert_eq!(config.provider, "git-cli");
        assert_eq!(config.remote.as_deref(), Some("upstream"));
        assert_eq!(config.git_cli.binary, PathBuf::from("git"));
        assert_eq!(config.git_cli.timeout_secs, 3);
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().expect("tempdir");
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "provider = [").expect("write config");

        let err = Config::load(temp.path());
        assert!(matches!(err, Err(Error::Config { .. })));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("custom.toml");
        std::fs::write(&path, "remotes = \"origin\"\n").expect("write config");

        assert!(matches!(Config::load_file(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let temp = TempDir::new().expect("tempdir");
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[git_cli]\ntimeout_secs = 0\n",
        )
        .expect("write config");

        let err = Config::load(temp.path()).expect_err("zero timeout");
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert!(err.to_string().contains("timeout_secs"), "{err}");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = TempDir::new().expect("tempdir");
        let err = Config::load_file(&temp.path().join("absent.toml"));
        assert!(matches!(err, Err(Error::Io { .. })));
    }
}
