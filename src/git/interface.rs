//! git::interface
//!
//! Production [`RepositoryGateway`] backed by `git2` and the `git` binary.
//!
//! Queries (current branch, status, ahead/behind) read the repository through
//! `git2`. Mutations (`run`) spawn the `git` binary so hooks, credentials and
//! the user's git configuration behave exactly as they do on the command line.
//!
//! # Example
//!
//! ```ignore
//! use gitkit::git::{Git, RepositoryGateway};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! if git.has_uncommitted_changes()? {
//!     git.run(&["add", "."])?;
//! }
//! ```

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::gateway::{format_command, BranchScope, CommandOutput, GitError, RepositoryGateway};

/// The git gateway.
///
/// Holds the discovered repository and a memoised current-branch lookup.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
    /// Working directory that sub-commands run in
    work_dir: PathBuf,
    /// Remote used for remote-scope branch checks
    remote: String,
    /// Memoised `current_branch()` result
    branch_cache: RefCell<Option<Option<String>>>,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("work_dir", &self.work_dir)
            .field("remote", &self.remote)
            .finish()
    }
}

impl Git {
    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// inside the working tree.
    ///
    /// # Errors
    ///
    /// - [`GitError::RepositoryNotFound`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo =
            git2::Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
                path: path.to_path_buf(),
            })?;

        let work_dir = repo.workdir().ok_or(GitError::BareRepo)?.to_path_buf();

        Ok(Self {
            repo,
            work_dir,
            remote: "origin".to_string(),
            branch_cache: RefCell::new(None),
        })
    }

    /// Use a remote other than `origin` for remote-scope queries.
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// The working directory sub-commands run in.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// The `.git` directory.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    fn read_current_branch(&self) -> Result<Option<String>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                return Ok(None)
            }
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            return Ok(head.shorthand().map(String::from));
        }

        Ok(None) // Detached HEAD
    }
}

impl RepositoryGateway for Git {
    fn current_branch(&self) -> Result<Option<String>, GitError> {
        if let Some(cached) = self.branch_cache.borrow().as_ref() {
            return Ok(cached.clone());
        }

        let branch = self.read_current_branch()?;
        *self.branch_cache.borrow_mut() = Some(branch.clone());
        Ok(branch)
    }

    fn invalidate(&self) {
        self.branch_cache.borrow_mut().take();
    }

    fn branch_exists(&self, name: &str, scope: BranchScope) -> Result<bool, GitError> {
        let (lookup, kind) = match scope {
            BranchScope::Local => (name.to_string(), git2::BranchType::Local),
            BranchScope::Remote => (format!("{}/{}", self.remote, name), git2::BranchType::Remote),
        };

        match self.repo.find_branch(&lookup, kind) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) if e.code() == git2::ErrorCode::InvalidSpec => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn has_uncommitted_changes(&self) -> Result<bool, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(false)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let dirty = statuses
            .iter()
            .any(|entry| entry.status() != git2::Status::CURRENT);

        debug!(dirty, "checked working tree status");
        Ok(dirty)
    }

    fn has_unpushed_commits(&self) -> Result<bool, GitError> {
        let Some(branch) = self.current_branch()? else {
            return Ok(false);
        };

        let local = self.repo.find_branch(&branch, git2::BranchType::Local)?;
        let upstream = match local.upstream() {
            Ok(u) => u,
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                debug!(%branch, "no upstream configured");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let (Some(local_oid), Some(upstream_oid)) = (local.get().target(), upstream.get().target())
        else {
            return Ok(false);
        };

        let (ahead, behind) = self.repo.graph_ahead_behind(local_oid, upstream_oid)?;
        debug!(%branch, ahead, behind, "compared with upstream");
        Ok(ahead > 0)
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutput, GitError> {
        let command = format_command(args);
        debug!(%command, "running");

        let result = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output();

        // Any sub-command may move HEAD.
        self.invalidate();

        let output = result.map_err(|e| GitError::Spawn {
            command: command.clone(),
            message: e.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            debug!(%command, status = ?output.status.code(), "failed");
            return Err(GitError::CommandFailed {
                command,
                stderr,
                stdout,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_outside_repository_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        // A fresh temp dir is normally outside any repository, but the test
        // host could itself live in one; only assert the error shape.
        if let Err(err) = Git::open(temp.path()) {
            assert!(matches!(err, GitError::RepositoryNotFound { .. }));
            assert!(err.to_string().contains("git repository not found"));
        }
    }
}
