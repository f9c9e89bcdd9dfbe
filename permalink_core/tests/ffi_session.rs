use std::fs;
use std::path::Path;

use git2::{IndexAddOption, Repository as GitRepository, RepositoryInitOptions};
use permalink_core::ffi::{build_permalink, open, CoreError};
use tempfile::TempDir;

#[test]
fn session_links_zero_based_selection() {
    let temp = TempDir::new().expect("tempdir");
    let oid = committed_repo(temp.path(), "git@github.com:user/repo.git");

    let session = open(temp.path().display().to_string()).expect("open session");
    assert_eq!(session.provider(), "libgit2");

    let link = session
        .permalink("src/main.rs".into(), 9, 11)
        .expect("permalink");
    assert_eq!(
        link,
        format!("https://github.com/user/repo/blob/{oid}/src/main.rs#L10-L12")
    );
}

#[test]
fn session_reports_containment_and_state() {
    let temp = TempDir::new().expect("tempdir");
    committed_repo(temp.path(), "https://gitlab.com/group/project.git");

    let session = open(temp.path().display().to_string()).expect("open session");
    assert!(session.contains("src/main.rs".into()));
    assert!(!session.contains("src/absent.rs".into()));

    let state = session
        .repository_state("src/main.rs".into())
        .expect("repository state");
    assert_eq!(state.branch.as_deref(), Some("main"));
    assert_eq!(session.providers().len(), 2);
}

#[test]
fn session_without_remote_reports_display_message() {
    let temp = TempDir::new().expect("tempdir");
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    GitRepository::init_opts(temp.path(), &opts).expect("init");
    fs::write(temp.path().join("notes.txt"), "notes\n").expect("write file");

    let session = open(temp.path().display().to_string()).expect("open session");
    let err = session
        .permalink("notes.txt".into(), 0, 0)
        .expect_err("missing remote");
    assert!(matches!(err, CoreError::MissingRemote));
    assert_eq!(err.to_string(), "Could not determine remote URL.");
}

#[test]
fn open_rejects_unknown_provider() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(temp.path().join(".permalink.toml"), "provider = \"svn\"\n").expect("write config");

    let err = open(temp.path().display().to_string()).expect_err("unknown provider");
    assert!(matches!(err, CoreError::ProviderNotRegistered));
}

#[test]
fn open_rejects_malformed_config() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(temp.path().join(".permalink.toml"), "provider =").expect("write config");

    let err = open(temp.path().display().to_string()).expect_err("malformed config");
    assert!(matches!(err, CoreError::Config { .. }));
    assert!(err.to_string().contains(".permalink.toml"), "{err}");
}

#[test]
fn build_permalink_is_exposed() {
    let link = build_permalink(
        "https://bitbucket.org/user/repo.git".into(),
        "beadfeed".into(),
        "README.md".into(),
        3,
        7,
    );
    assert_eq!(
        link,
        "https://bitbucket.org/user/repo/src/beadfeed/README.md#lines-3:7"
    );
}

fn committed_repo(path: &Path, remote: &str) -> git2::Oid {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = GitRepository::init_opts(path, &opts).expect("init");
    repo.remote("origin", remote).expect("add remote");

    fs::create_dir_all(path.join("src")).expect("create src");
    fs::write(path.join("src/main.rs"), "fn main() {}\n").expect("write file");

    let mut index = repo.index().expect("index");
    index
        .add_all(["*"], IndexAddOption::DEFAULT, None)
        .expect("add all");
    index.write().expect("write index");
    let tree = repo
        .find_tree(index.write_tree().expect("write tree"))
        .expect("find tree");
    let signature = git2::Signature::now("Test User", "test@example.com").expect("signature");
    repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
        .expect("commit")
}
