//! Repository info providers that do not link a git library.

mod git_cli;

pub use git_cli::GitCliProvider;
