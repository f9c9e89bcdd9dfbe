//! Repository access built on top of libgit2.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::{ErrorClass, ErrorCode, Repository as GitRepository};

use crate::{Error, RemoteInfo, Result};

const BRANCH_PREFIX: &str = "refs/heads/";

/// Lightweight handle to the repository enclosing a file.
pub struct Repository {
    inner: GitRepository,
    root: PathBuf,
}

impl Repository {
    /// Open the repository enclosing the given file or directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be canonicalized, is not inside a
    /// git repository, or resolves to a bare repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let original = path.as_ref();
        let canonical = std::fs::canonicalize(original).map_err(|source| Error::Io {
            path: display_path(original),
            source,
        })?;
        let start = if canonical.is_file() {
            canonical.parent().map_or_else(|| canonical.clone(), Path::to_path_buf)
        } else {
            canonical
        };

        let repo = match GitRepository::discover(&start) {
            Ok(repo) => repo,
            Err(err)
                if err.class() == ErrorClass::Repository && err.code() == ErrorCode::NotFound =>
            {
                return Err(Error::NotARepository {
                    path: display_path(&start),
                })
            }
            Err(err) => return Err(Error::from(err)),
        };

        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::BareRepository {
                path: display_path(&start),
            })?;

        Ok(Self { inner: repo, root })
    }

    /// Returns the absolute path to the repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configured remotes in libgit2's listing order.
    ///
    /// # Errors
    ///
    /// Propagates libgit2 failures while reading remote configuration.
    pub fn remotes(&self) -> Result<Vec<RemoteInfo>> {
        let names = self.inner.remotes()?;
        let mut remotes = Vec::with_capacity(names.len());
        for name in names.iter().flatten() {
            let remote = self.inner.find_remote(name)?;
            remotes.push(RemoteInfo {
                name: name.to_owned(),
                push_url: remote.pushurl().map(str::to_owned),
                fetch_url: remote.url().map(str::to_owned),
            });
        }
        Ok(remotes)
    }

    /// Returns the full id of the HEAD commit, if HEAD is born.
    ///
    /// # Errors
    ///
    /// Returns any error produced while resolving the HEAD reference.
    pub fn head_commit(&self) -> Result<Option<String>> {
        let Some(head) = self.head()? else {
            return Ok(None);
        };
        let commit = head.resolve()?.peel_to_commit()?;
        Ok(Some(commit.id().to_string()))
    }

    /// Returns the checked-out branch name, including an unborn branch.
    ///
    /// Detached HEADs have no branch.
    ///
    /// # Errors
    ///
    /// Returns any error produced while reading HEAD.
    pub fn current_branch(&self) -> Result<Option<String>> {
        match self.head()? {
            Some(head) if head.is_branch() => Ok(head.shorthand().map(str::to_owned)),
            Some(_) => Ok(None),
            None => self.unborn_branch(),
        }
    }

    fn head(&self) -> Result<Option<git2::Reference<'_>>> {
        match self.inner.head() {
            Ok(head) => Ok(Some(head)),
            Err(err)
                if matches!(
                    (err.class(), err.code()),
                    (
                        ErrorClass::Reference,
                        ErrorCode::NotFound | ErrorCode::UnbornBranch
                    )
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(Error::from(err)),
        }
    }

    fn unborn_branch(&self) -> Result<Option<String>> {
        let head = match self.inner.find_reference("HEAD") {
            Ok(head) => head,
            Err(err) if err.code() == ErrorCode::NotFound => return Ok(None),
            Err(err) => return Err(Error::from(err)),
        };
        Ok(head
            .symbolic_target()
            .and_then(|target| target.strip_prefix(BRANCH_PREFIX))
            .map(str::to_owned))
    }
}

/// Lossy string form of a path for error messages and FFI records.
pub(crate) fn display_path(path: &Path) -> String {
    path.to_path_buf()
        .into_os_string()
        .to_string_lossy()
        .into_owned()
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{IndexAddOption, RepositoryInitOptions};
    use tempfile::TempDir;

    #[test]
    fn unborn_head_reports_branch_without_commit() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        init_with_branch(temp.path(), "trunk")?;

        let repo = Repository::open(temp.path())?;
        assert!(repo.head_commit()?.is_none());
        assert_eq!(repo.current_branch()?.as_deref(), Some("trunk"));

        Ok(())
    }

    #[test]
    fn head_commit_matches_latest_commit() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        let git_repo = init_with_branch(temp.path(), "main")?;

        std::fs::write(temp.path().join("README.md"), "hello\n").expect("write file");
        let oid = stage_and_commit(&git_repo, "Initial commit")?;

        let repo = Repository::open(temp.path().join("README.md"))?;
        assert_eq!(repo.head_commit()?, Some(oid.to_string()));
        assert_eq!(repo.current_branch()?.as_deref(), Some("main"));

        Ok(())
    }

    #[test]
    fn detached_head_has_no_branch() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        let git_repo = init_with_branch(temp.path(), "main")?;

        std::fs::write(temp.path().join("file.txt"), "one\n").expect("write file");
        let oid = stage_and_commit(&git_repo, "Initial commit")?;
        git_repo.set_head_detached(oid)?;

        let repo = Repository::open(temp.path())?;
        assert_eq!(repo.head_commit()?, Some(oid.to_string()));
        assert!(repo.current_branch()?.is_none());

        Ok(())
    }

    #[test]
    fn remotes_report_push_and_fetch_urls() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        let git_repo = init_with_branch(temp.path(), "main")?;
        git_repo.remote("origin", "https://github.com/user/repo.git")?;
        git_repo.remote_set_pushurl("origin", Some("git@github.com:user/repo.git"))?;

        let repo = Repository::open(temp.path())?;
        let remotes = repo.remotes()?;

        assert_eq!(remotes.len(), 1);
        assert_eq!(remotes[0].name, "origin");
        assert_eq!(remotes[0].url(), Some("git@github.com:user/repo.git"));
        assert_eq!(
            remotes[0].fetch_url.as_deref(),
            Some("https://github.com/user/repo.git")
        );

        Ok(())
    }

    #[test]
    fn open_non_repository_returns_error() {
        let temp = TempDir::new().expect("tempdir");
        let err = Repository::open(temp.path());
        assert!(matches!(err, Err(Error::NotARepository { .. })));
    }

    fn init_with_branch(path: &Path, branch: &str) -> Result<GitRepository> {
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head(branch);
        Ok(GitRepository::init_opts(path, &opts)?)
    }

    fn stage_and_commit(repo: &GitRepository, message: &str) -> Result<git2::Oid> {
        let mut index = repo.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let signature = git2::Signature::now("Test User", "test@example.com")?;

        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit()?],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

        Ok(repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parent_refs,
        )?)
    }
}
