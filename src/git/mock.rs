//! git::mock
//!
//! Recording gateway for deterministic testing.
//!
//! # Design
//!
//! The mock gateway answers state queries from configured values and records
//! every `run` call in order. Individual commands can be scripted to fail,
//! and `checkout` calls update the reported current branch so handlers that
//! move between branches behave as they would against a real repository.
//!
//! # Example
//!
//! ```
//! use gitkit::git::mock::MockGateway;
//! use gitkit::git::RepositoryGateway;
//!
//! let git = MockGateway::on_branch("main").with_uncommitted_changes(true);
//! git.fail_on(&["push", "origin", "main"], "rejected");
//!
//! assert!(git.has_uncommitted_changes().unwrap());
//! assert!(git.run(&["add", "."]).is_ok());
//! assert!(git.run(&["push", "origin", "main"]).is_err());
//! assert_eq!(git.commands(), vec!["add .", "push origin main"]);
//! ```

use std::sync::{Arc, Mutex};

use super::gateway::{BranchScope, CommandOutput, GitError, RepositoryGateway};

/// Mock gateway for testing.
///
/// Cheap to clone; clones share state, so a test can keep one handle while
/// handing another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    inner: Arc<Mutex<MockGatewayInner>>,
}

#[derive(Debug, Default)]
struct MockGatewayInner {
    current_branch: Option<String>,
    uncommitted: bool,
    unpushed: bool,
    local_branches: Vec<String>,
    remote_branches: Vec<String>,
    failures: Vec<ScriptedFailure>,
    responses: Vec<(Vec<String>, CommandOutput)>,
    calls: Vec<Vec<String>>,
    queries: Vec<MockQuery>,
}

#[derive(Debug, Clone)]
struct ScriptedFailure {
    args: Vec<String>,
    stderr: String,
    stdout: String,
    /// Only fail while this branch is checked out
    on_branch: Option<String>,
}

/// Recorded state query for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockQuery {
    CurrentBranch,
    BranchExists { name: String, scope: BranchScope },
    UncommittedChanges,
    UnpushedCommits,
}

impl MockGateway {
    /// Create a gateway with a detached HEAD and a clean tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway positioned on `branch`.
    pub fn on_branch(branch: &str) -> Self {
        let gateway = Self::new();
        {
            let mut inner = gateway.lock();
            inner.current_branch = Some(branch.to_string());
            inner.local_branches.push(branch.to_string());
        }
        gateway
    }

    /// Set whether the working tree reports uncommitted changes.
    pub fn with_uncommitted_changes(self, value: bool) -> Self {
        self.lock().uncommitted = value;
        self
    }

    /// Set whether HEAD reports unpushed commits.
    pub fn with_unpushed_commits(self, value: bool) -> Self {
        self.lock().unpushed = value;
        self
    }

    /// Add a branch that `branch_exists` reports in the given scope.
    pub fn with_branch(self, name: &str, scope: BranchScope) -> Self {
        {
            let mut inner = self.lock();
            match scope {
                BranchScope::Local => inner.local_branches.push(name.to_string()),
                BranchScope::Remote => inner.remote_branches.push(name.to_string()),
            }
        }
        self
    }

    /// Change the uncommitted-changes answer mid-test.
    pub fn set_uncommitted_changes(&self, value: bool) {
        self.lock().uncommitted = value;
    }

    /// Make the exact command `args` fail with the given stderr.
    pub fn fail_on(&self, args: &[&str], stderr: &str) {
        self.fail_on_with_stdout(args, stderr, "");
    }

    /// Make the exact command `args` fail with the given stderr and stdout.
    pub fn fail_on_with_stdout(&self, args: &[&str], stderr: &str, stdout: &str) {
        self.lock().failures.push(ScriptedFailure {
            args: to_owned(args),
            stderr: stderr.to_string(),
            stdout: stdout.to_string(),
            on_branch: None,
        });
    }

    /// Make `args` fail only while `branch` is checked out.
    pub fn fail_on_branch(&self, branch: &str, args: &[&str], stderr: &str) {
        self.lock().failures.push(ScriptedFailure {
            args: to_owned(args),
            stderr: stderr.to_string(),
            stdout: String::new(),
            on_branch: Some(branch.to_string()),
        });
    }

    /// Make the exact command `args` succeed with the given stdout.
    pub fn respond_to(&self, args: &[&str], stdout: &str) {
        self.lock()
            .responses
            .push((to_owned(args), CommandOutput::from_stdout(stdout)));
    }

    /// All `run` calls so far, each joined with spaces.
    pub fn commands(&self) -> Vec<String> {
        self.lock().calls.iter().map(|c| c.join(" ")).collect()
    }

    /// All `run` calls so far as argument vectors.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.lock().calls.clone()
    }

    /// All state queries so far.
    pub fn queries(&self) -> Vec<MockQuery> {
        self.lock().queries.clone()
    }

    /// Number of times a given query was made.
    pub fn query_count(&self, query: &MockQuery) -> usize {
        self.lock().queries.iter().filter(|q| *q == query).count()
    }

    /// The branch the mock currently reports.
    pub fn branch(&self) -> Option<String> {
        self.lock().current_branch.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockGatewayInner> {
        // A panic in another test thread must not cascade into this one.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn to_owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

impl RepositoryGateway for MockGateway {
    fn current_branch(&self) -> Result<Option<String>, GitError> {
        let mut inner = self.lock();
        inner.queries.push(MockQuery::CurrentBranch);
        Ok(inner.current_branch.clone())
    }

    fn invalidate(&self) {}

    fn branch_exists(&self, name: &str, scope: BranchScope) -> Result<bool, GitError> {
        let mut inner = self.lock();
        inner.queries.push(MockQuery::BranchExists {
            name: name.to_string(),
            scope,
        });
        let known = match scope {
            BranchScope::Local => &inner.local_branches,
            BranchScope::Remote => &inner.remote_branches,
        };
        Ok(known.iter().any(|b| b == name))
    }

    fn has_uncommitted_changes(&self) -> Result<bool, GitError> {
        let mut inner = self.lock();
        inner.queries.push(MockQuery::UncommittedChanges);
        Ok(inner.uncommitted)
    }

    fn has_unpushed_commits(&self) -> Result<bool, GitError> {
        let mut inner = self.lock();
        inner.queries.push(MockQuery::UnpushedCommits);
        Ok(inner.unpushed)
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutput, GitError> {
        let mut inner = self.lock();
        let owned = to_owned(args);
        inner.calls.push(owned.clone());

        let current = inner.current_branch.clone();
        let failure = inner.failures.iter().find(|f| {
            f.args == owned && f.on_branch.as_ref().map_or(true, |b| current.as_ref() == Some(b))
        });
        if let Some(failure) = failure {
            return Err(GitError::command_failed(args, &failure.stderr, &failure.stdout));
        }

        match args {
            ["checkout", "-b", name] => {
                inner.local_branches.push(name.to_string());
                inner.current_branch = Some(name.to_string());
            }
            ["checkout", name] => inner.current_branch = Some(name.to_string()),
            _ => {}
        }

        let output = inner
            .responses
            .iter()
            .find(|(a, _)| *a == owned)
            .map(|(_, out)| out.clone())
            .unwrap_or_default();

        Ok(output)
    }
}
