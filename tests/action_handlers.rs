//! Action behaviour against the recording gateway.
//!
//! Every test drives an action through `MockGateway` and `ScriptedIo` and
//! asserts on the exact git sub-commands issued and the returned result.

use std::rc::Rc;

use serde_json::json;

use gitkit::actions::{ActionContext, ActionOptions, ActionRegistry, ActionResult};
use gitkit::core::config::{Config, Settings};
use gitkit::core::events::{DomainEvent, EventBus, RecordingSubscriber};
use gitkit::git::mock::{MockGateway, MockQuery};
use gitkit::ui::ScriptedIo;

/// Test fixture bundling the gateway, events and registry.
struct Harness {
    git: MockGateway,
    events: Rc<RecordingSubscriber>,
    ctx: ActionContext,
    registry: ActionRegistry,
}

impl Harness {
    fn new(git: MockGateway) -> Self {
        Self::with_settings(git, Settings::default())
    }

    fn with_settings(git: MockGateway, settings: Settings) -> Self {
        let events = Rc::new(RecordingSubscriber::new());
        let mut bus = EventBus::new();
        bus.subscribe(events.clone());

        let config = Rc::new(Config::from_settings(settings).unwrap());
        let ctx = ActionContext::new(Rc::new(git.clone()), config).with_events(bus);

        Self {
            git,
            events,
            ctx,
            registry: ActionRegistry::with_builtins(),
        }
    }

    fn run(&self, action: &str, options: ActionOptions, io: &mut ScriptedIo) -> ActionResult {
        let action = self.registry.resolve(action, &self.ctx).unwrap();
        action.execute(&options, io)
    }

    fn commands(&self) -> Vec<String> {
        self.git.commands()
    }
}

fn opts() -> ActionOptions {
    ActionOptions::default()
}

// =============================================================================
// push
// =============================================================================

#[test]
fn push_up_to_date_runs_nothing() {
    let h = Harness::new(MockGateway::on_branch("main"));
    let result = h.run("push", opts(), &mut ScriptedIo::new());

    assert!(result.is_success());
    assert_eq!(result.message(), "Repository is up to date - nothing to push");
    assert!(h.commands().is_empty());
}

#[test]
fn push_unpushed_only_pushes() {
    let h = Harness::new(MockGateway::on_branch("main").with_unpushed_commits(true));
    let result = h.run("push", opts(), &mut ScriptedIo::new());

    assert!(result.is_success());
    assert_eq!(result.message(), "Successfully pushed existing commits to main");
    assert_eq!(h.commands(), vec!["push origin main"]);
    assert!(h.events.events().is_empty());
}

#[test]
fn push_command_sequence_depends_only_on_state() {
    let expect_commit = vec![
        "add .".to_string(),
        "commit -m fix".to_string(),
        "push origin main".to_string(),
    ];

    for (uncommitted, unpushed, expected) in [
        (false, false, vec![]),
        (false, true, vec!["push origin main".to_string()]),
        (true, false, expect_commit.clone()),
        (true, true, expect_commit.clone()),
    ] {
        let git = MockGateway::on_branch("main")
            .with_uncommitted_changes(uncommitted)
            .with_unpushed_commits(unpushed);
        let h = Harness::new(git);
        let options = ActionOptions {
            message: Some("fix".into()),
            ..opts()
        };
        let result = h.run("push", options, &mut ScriptedIo::new());

        assert!(result.is_success(), "state ({uncommitted}, {unpushed})");
        assert_eq!(h.commands(), expected, "state ({uncommitted}, {unpushed})");
        assert_eq!(h.git.query_count(&MockQuery::UncommittedChanges), 1);
        assert_eq!(h.git.query_count(&MockQuery::UnpushedCommits), 1);
    }
}

#[test]
fn push_commits_with_explicit_message_and_branch() {
    let h = Harness::new(MockGateway::on_branch("dev").with_uncommitted_changes(true));
    let options = ActionOptions {
        message: Some("fix".into()),
        branch: Some("main".into()),
        ..opts()
    };
    let result = h.run("push", options, &mut ScriptedIo::new());

    assert_eq!(h.commands(), vec!["add .", "commit -m fix", "push origin main"]);
    assert!(result.is_success());
    assert!(result.message().contains("main"));
    assert_eq!(result.get("message"), Some(&json!("fix")));

    let events = h.events.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        DomainEvent::CommitPushed { branch, message, .. } if branch == "main" && message == "fix"
    ));
}

#[test]
fn push_builds_message_interactively() {
    let h = Harness::new(MockGateway::on_branch("main").with_uncommitted_changes(true));
    let mut io = ScriptedIo::new().answer("tidy up").answer("chore");
    let result = h.run("push", opts(), &mut io);

    assert!(result.is_success());
    assert_eq!(h.commands()[1], "commit -m 🔧 chore: tidy up");
    assert_eq!(io.prompts().len(), 2);
}

#[test]
fn push_uses_default_message_when_configured() {
    let settings = Settings {
        push_with_default_message: Some(true),
        ..Default::default()
    };
    let h = Harness::with_settings(
        MockGateway::on_branch("main").with_uncommitted_changes(true),
        settings,
    );
    let mut io = ScriptedIo::new();
    let result = h.run("push", opts(), &mut io);

    assert!(result.is_success());
    assert_eq!(
        h.commands()[1],
        "commit -m 🚀 feat: Update [main] branch with latest changes."
    );
    assert!(io.prompts().is_empty());
}

#[test]
fn push_uses_configured_remote() {
    let settings = Settings {
        remote: Some("upstream".into()),
        ..Default::default()
    };
    let h = Harness::with_settings(
        MockGateway::on_branch("main").with_unpushed_commits(true),
        settings,
    );
    h.run("push", opts(), &mut ScriptedIo::new());
    assert_eq!(h.commands(), vec!["push upstream main"]);
}

#[test]
fn push_stops_at_first_failure() {
    let git = MockGateway::on_branch("main").with_uncommitted_changes(true);
    git.fail_on(&["commit", "-m", "fix"], "pre-commit hook failed");
    let h = Harness::new(git);

    let mut io = ScriptedIo::new();
    let options = ActionOptions {
        message: Some("fix".into()),
        ..opts()
    };
    let result = h.run("push", options, &mut io);

    assert!(result.is_failure());
    assert!(result.message().starts_with("Push failed:"));
    assert!(result.message().contains("pre-commit hook failed"));
    assert_eq!(h.commands(), vec!["add .", "commit -m fix"]);
    assert!(io.saw_error("Push failed"));
    assert!(h.events.events().is_empty());
}

#[test]
fn push_nothing_to_commit_is_reported() {
    let git = MockGateway::on_branch("main").with_uncommitted_changes(true);
    git.fail_on_with_stdout(
        &["commit", "-m", "fix"],
        "",
        "nothing to commit, working tree clean",
    );
    let h = Harness::new(git);
    let options = ActionOptions {
        message: Some("fix".into()),
        ..opts()
    };
    let result = h.run("push", options, &mut ScriptedIo::new());

    assert!(result.is_failure());
    assert_eq!(result.message(), "Push failed: no changes to commit");
}

#[test]
fn push_failure_after_commit_keeps_event() {
    let git = MockGateway::on_branch("main").with_uncommitted_changes(true);
    git.fail_on(&["push", "origin", "main"], "rejected: non-fast-forward");
    let h = Harness::new(git);
    let options = ActionOptions {
        message: Some("fix".into()),
        ..opts()
    };
    let result = h.run("push", options, &mut ScriptedIo::new());

    assert!(result.is_failure());
    assert!(result.message().contains("non-fast-forward"));

    // Published once the commit exists, before the push was attempted.
    let events = h.events.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), "commit_pushed");
    assert_eq!(events[0].branch(), "main");
}

#[test]
fn push_survives_failing_subscriber() {
    let git = MockGateway::on_branch("main").with_uncommitted_changes(true);
    let mut bus = EventBus::new();
    bus.subscribe(Rc::new(RecordingSubscriber::failing()));
    let ctx = ActionContext::new(Rc::new(git.clone()), Rc::new(Config::default())).with_events(bus);

    let action = ActionRegistry::with_builtins().resolve("push", &ctx).unwrap();
    let options = ActionOptions {
        message: Some("fix".into()),
        ..opts()
    };
    let result = action.execute(&options, &mut ScriptedIo::new());

    assert!(result.is_success());
    assert_eq!(git.commands().len(), 3);
}

#[test]
fn push_detached_head_needs_branch() {
    let h = Harness::new(MockGateway::new().with_unpushed_commits(true));
    let result = h.run("push", opts(), &mut ScriptedIo::new());

    assert!(result.is_failure());
    assert!(result.message().contains("detached HEAD"));
    assert!(h.commands().is_empty());
}

#[test]
fn push_clean_detached_head_is_up_to_date() {
    let h = Harness::new(MockGateway::new());
    let result = h.run("push", opts(), &mut ScriptedIo::new());

    assert!(result.is_success());
    assert_eq!(result.message(), "Repository is up to date - nothing to push");
    assert_eq!(result.get("branch"), Some(&json!(null)));
    assert!(h.commands().is_empty());
}

#[test]
fn push_dirty_detached_head_fails_before_committing() {
    let h = Harness::new(MockGateway::new().with_uncommitted_changes(true));
    let mut io = ScriptedIo::new();
    let result = h.run("push", opts(), &mut io);

    assert!(result.is_failure());
    assert!(result.message().contains("detached HEAD"));
    assert!(io.prompts().is_empty());
    assert!(h.commands().is_empty());
}

// =============================================================================
// merge
// =============================================================================

fn merge_opts(source: &str, target: &str) -> ActionOptions {
    ActionOptions {
        source: Some(source.into()),
        target: Some(target.into()),
        ..opts()
    }
}

#[test]
fn merge_partial_failure_scenario() {
    let git = MockGateway::on_branch("a");
    git.fail_on_branch("b", &["merge", "feature/x"], "CONFLICT (content): Merge conflict in x.rs");
    let h = Harness::new(git);

    let mut io = ScriptedIo::new();
    let result = h.run("merge", merge_opts("feature/x", "a,b"), &mut io);

    assert_eq!(
        h.commands(),
        vec![
            "checkout a",
            "merge feature/x",
            "push origin a",
            "checkout b",
            "merge feature/x",
            "checkout a",
        ]
    );
    assert!(result.is_success());
    assert_eq!(result.message(), "Partially merged feature/x: 1 succeeded, 1 failed");
    assert_eq!(result.get("merged_branches"), Some(&json!(["a"])));

    let failed = result.get("failed_branches").unwrap().as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["branch"], "b");
    assert!(failed[0]["error"].as_str().unwrap().contains("CONFLICT"));
    assert_eq!(result.get("success_count"), Some(&json!(1)));
    assert_eq!(result.get("failure_count"), Some(&json!(1)));
    assert!(io.saw_error("Failed to merge feature/x into b"));
    assert!(io.saw_warning("Could not merge feature/x into:\n  - b"));
}

#[test]
fn merge_single_target_failure_has_no_summary() {
    let git = MockGateway::on_branch("main");
    git.fail_on(&["checkout", "gone"], "pathspec did not match");
    let h = Harness::new(git);

    let mut io = ScriptedIo::new();
    let result = h.run("merge", merge_opts("dev", "gone"), &mut io);

    assert!(result.is_failure());
    assert!(!io.saw_warning("Could not merge"));
}

#[test]
fn merge_result_class_follows_success_count() {
    let targets = ["t1", "t2", "t3"];
    for failing in 0..=targets.len() {
        let git = MockGateway::on_branch("main");
        for target in &targets[..failing] {
            git.fail_on(&["checkout", *target], "pathspec did not match");
        }
        let h = Harness::new(git);
        let result = h.run("merge", merge_opts("dev", &targets.join(",")), &mut ScriptedIo::new());

        let succeeded = targets.len() - failing;
        assert_eq!(result.is_failure(), succeeded == 0, "{failing} failing");
        assert_eq!(result.get("total_count"), Some(&json!(targets.len())));
        assert_eq!(
            result.get("success_count").unwrap().as_u64().unwrap()
                + result.get("failure_count").unwrap().as_u64().unwrap(),
            targets.len() as u64
        );
        if succeeded == targets.len() {
            assert!(result.message().starts_with("Successfully merged dev into 3 branches"));
        } else if succeeded > 0 {
            assert!(result.message().starts_with("Partially merged dev"));
        } else {
            assert_eq!(result.message(), "Failed to merge dev into any target branches");
        }
    }
}

#[test]
fn merge_no_trailing_checkout_when_last_target_is_original() {
    let h = Harness::new(MockGateway::on_branch("main"));
    h.run("merge", merge_opts("dev", "staging,main"), &mut ScriptedIo::new());

    let commands = h.commands();
    assert_eq!(commands.last().map(String::as_str), Some("push origin main"));
    assert_eq!(commands.iter().filter(|c| *c == "checkout main").count(), 1);
}

#[test]
fn merge_single_trailing_checkout_when_original_differs() {
    let h = Harness::new(MockGateway::on_branch("dev"));
    h.run("merge", merge_opts("dev", "staging,main"), &mut ScriptedIo::new());

    let commands = h.commands();
    assert_eq!(commands.last().map(String::as_str), Some("checkout dev"));
    assert_eq!(commands.iter().filter(|c| *c == "checkout dev").count(), 1);
    assert_eq!(h.git.branch().as_deref(), Some("dev"));
}

#[test]
fn merge_push_failure_is_only_a_warning() {
    let git = MockGateway::on_branch("main");
    git.fail_on(&["push", "origin", "main"], "remote rejected");
    let h = Harness::new(git);

    let mut io = ScriptedIo::new();
    let result = h.run("merge", merge_opts("dev", "main"), &mut io);

    assert!(result.is_success());
    assert_eq!(result.message(), "Successfully merged dev into main and pushed to remote");
    assert!(io.saw_warning("Failed to push main"));
}

#[test]
fn merge_legacy_options_and_defaults() {
    let h = Harness::new(MockGateway::on_branch("main"));
    let options = ActionOptions {
        merge: Some("dev".into()),
        branch: Some("staging".into()),
        ..opts()
    };
    let result = h.run("merge", options, &mut ScriptedIo::new());

    assert!(result.is_success());
    assert_eq!(h.commands()[..2], ["checkout staging", "merge dev"]);
}

#[test]
fn merge_asks_for_source_and_defaults_target_to_current() {
    let h = Harness::new(MockGateway::on_branch("main"));
    let mut io = ScriptedIo::new().answer("feature/y");
    let result = h.run("merge", opts(), &mut io);

    assert!(result.is_success());
    assert_eq!(
        io.prompts()[0],
        "Source branch to merge: [blank for current branch `main`]"
    );
    assert_eq!(
        h.commands(),
        vec!["checkout main", "merge feature/y", "push origin main"]
    );
}

#[test]
fn merge_rejects_unquoted_target_list() {
    let h = Harness::new(MockGateway::on_branch("main"));
    let result = h.run("merge", merge_opts("dev", "a b"), &mut ScriptedIo::new());

    assert!(result.is_failure());
    assert!(result.message().contains("Use quotes around the entire"));
    assert!(h.commands().is_empty());
}

// =============================================================================
// rebase
// =============================================================================

#[test]
fn rebase_refuses_dirty_tree() {
    let h = Harness::new(MockGateway::on_branch("topic").with_uncommitted_changes(true));
    let options = ActionOptions {
        branch: Some("main".into()),
        ..opts()
    };
    let result = h.run("rebase", options, &mut ScriptedIo::new());

    assert!(result.is_failure());
    assert_eq!(result.message(), "Rebase failed: Uncommitted changes detected");
    assert!(h.commands().is_empty());
}

#[test]
fn rebase_command_forms() {
    let h = Harness::new(MockGateway::on_branch("topic"));
    let options = ActionOptions {
        branch: Some("topic".into()),
        onto: Some("main".into()),
        interactive: true,
        ..opts()
    };
    let result = h.run("rebase", options, &mut ScriptedIo::new());

    assert!(result.is_success());
    assert_eq!(result.message(), "Successfully rebased onto topic");
    assert_eq!(h.commands(), vec!["rebase --interactive --onto main topic"]);
}

#[test]
fn rebase_continue_with_unresolved_changes_never_runs() {
    let h = Harness::new(MockGateway::on_branch("topic").with_uncommitted_changes(true));
    let options = ActionOptions {
        continue_rebase: true,
        ..opts()
    };
    let result = h.run("rebase", options, &mut ScriptedIo::new());

    assert!(result.is_failure());
    assert_eq!(result.message(), "Rebase continue failed: Unresolved conflicts");
    assert!(h.commands().is_empty());
}

#[test]
fn rebase_continue_when_clean() {
    let h = Harness::new(MockGateway::on_branch("topic"));
    let options = ActionOptions {
        continue_rebase: true,
        ..opts()
    };
    let result = h.run("rebase", options, &mut ScriptedIo::new());

    assert!(result.is_success());
    assert_eq!(result.message(), "Rebase operation continued");
    assert_eq!(h.commands(), vec!["rebase --continue"]);
}

#[test]
fn rebase_abort_and_skip_ignore_dirty_tree() {
    for (options, expected, message) in [
        (
            ActionOptions { abort: true, ..opts() },
            "rebase --abort",
            "Rebase operation aborted",
        ),
        (
            ActionOptions { skip: true, ..opts() },
            "rebase --skip",
            "Rebase skip completed",
        ),
    ] {
        let h = Harness::new(MockGateway::on_branch("topic").with_uncommitted_changes(true));
        let result = h.run("rebase", options, &mut ScriptedIo::new());
        assert!(result.is_success());
        assert_eq!(result.message(), message);
        assert_eq!(h.commands(), vec![expected]);
        assert_eq!(h.git.query_count(&MockQuery::UncommittedChanges), 0);
    }
}

#[test]
fn rebase_conflict_sets_flag_in_any_case() {
    for marker in ["CONFLICT (content)", "conflict", "Merge Conflict in a.rs"] {
        let git = MockGateway::on_branch("topic");
        git.fail_on(&["rebase", "main"], marker);
        let h = Harness::new(git);

        let mut io = ScriptedIo::new();
        let options = ActionOptions {
            branch: Some("main".into()),
            ..opts()
        };
        let result = h.run("rebase", options, &mut io);

        assert!(result.is_failure());
        assert_eq!(result.message(), "Rebase conflicts require manual resolution");
        assert_eq!(result.get("conflicts"), Some(&json!(true)));
        assert!(io.saw_info("rebase --continue"));
        assert!(io.saw_info("rebase --abort"));
        assert!(io.saw_info("rebase --skip"));
    }
}

#[test]
fn rebase_conflict_reported_on_stdout() {
    let git = MockGateway::on_branch("topic");
    git.fail_on_with_stdout(
        &["rebase", "--continue"],
        "error: could not apply 1a2b3c",
        "CONFLICT (content): Merge conflict in lib.rs",
    );
    let h = Harness::new(git);
    let options = ActionOptions {
        continue_rebase: true,
        ..opts()
    };
    let result = h.run("rebase", options, &mut ScriptedIo::new());

    assert_eq!(result.get("conflicts"), Some(&json!(true)));
}

#[test]
fn rebase_other_failure_has_no_conflict_flag() {
    let git = MockGateway::on_branch("topic");
    git.fail_on(&["rebase", "main"], "fatal: invalid upstream 'main'");
    let h = Harness::new(git);

    let mut io = ScriptedIo::new();
    let options = ActionOptions {
        branch: Some("main".into()),
        ..opts()
    };
    let result = h.run("rebase", options, &mut io);

    assert!(result.is_failure());
    assert!(result.message().starts_with("Rebase failed:"));
    assert!(result.message().contains("invalid upstream"));
    assert_eq!(result.get("conflicts"), None);
    assert!(io.saw_error("Rebase failed"));
}

// =============================================================================
// pull, checkout, branch, fetch
// =============================================================================

#[test]
fn pull_defaults_to_current_branch() {
    let h = Harness::new(MockGateway::on_branch("dev"));
    let result = h.run("pull", opts(), &mut ScriptedIo::new());

    assert!(result.is_success());
    assert_eq!(result.message(), "Successfully pulled from dev");
    assert_eq!(h.commands(), vec!["pull origin dev"]);
}

#[test]
fn pull_failure_is_reported() {
    let git = MockGateway::on_branch("dev");
    git.fail_on(&["pull", "origin", "dev"], "could not resolve host");
    let h = Harness::new(git);

    let mut io = ScriptedIo::new();
    let result = h.run("pull", opts(), &mut io);

    assert!(result.is_failure());
    assert!(result.message().starts_with("Pull failed:"));
    assert!(io.saw_error("could not resolve host"));
}

#[test]
fn checkout_asks_when_branch_missing() {
    let h = Harness::new(MockGateway::on_branch("main"));
    let mut io = ScriptedIo::new().answer("dev");
    let result = h.run("checkout", opts(), &mut io);

    assert!(result.is_success());
    assert_eq!(result.message(), "Successfully switched to dev");
    assert_eq!(io.prompts(), &["Branch name:"]);
    assert_eq!(h.commands(), vec!["checkout dev"]);
}

#[test]
fn branch_sanitizes_explicit_name() {
    let h = Harness::new(MockGateway::on_branch("main"));
    let options = ActionOptions {
        branch: Some("feature/test@branch#123".into()),
        ..opts()
    };
    let result = h.run("branch", options, &mut ScriptedIo::new());

    assert!(result.is_success());
    assert_eq!(h.commands(), vec!["checkout -b feature/test-branch-123"]);
    assert_eq!(h.git.branch().as_deref(), Some("feature/test-branch-123"));

    let events = h.events.events();
    assert!(matches!(
        &events[0],
        DomainEvent::BranchCreated { branch, from, .. }
            if branch == "feature/test-branch-123" && from.as_deref() == Some("main")
    ));
}

#[test]
fn branch_rejects_unusable_name() {
    let h = Harness::new(MockGateway::on_branch("main"));
    let options = ActionOptions {
        branch: Some("###".into()),
        ..opts()
    };
    let result = h.run("branch", options, &mut ScriptedIo::new());

    assert!(result.is_failure());
    assert_eq!(result.message(), "Branch creation failed: invalid branch name: ###");
    assert!(h.commands().is_empty());
}

#[test]
fn branch_composes_interactive_parts() {
    let h = Harness::new(MockGateway::on_branch("main"));
    let mut io = ScriptedIo::new()
        .answer("feature")
        .answer("Login Page")
        .answer("")
        .answer("");
    let result = h.run("branch", opts(), &mut io);

    assert!(result.is_success());
    assert_eq!(h.commands(), vec!["checkout -b feature/general/Login-Page"]);
    assert_eq!(
        io.prompts(),
        &[
            "Branch type:",
            "Branch name:",
            "Feature area (optional):",
            "Prefix (optional):"
        ]
    );
}

#[test]
fn fetch_runs_single_command() {
    let h = Harness::new(MockGateway::on_branch("main"));
    let result = h.run("fetch", opts(), &mut ScriptedIo::new());

    assert!(result.is_success());
    assert_eq!(result.message(), "Successfully fetched from remote");
    assert_eq!(h.commands(), vec!["fetch"]);
}

// =============================================================================
// registry
// =============================================================================

#[test]
fn registry_second_registration_wins() {
    use gitkit::actions::Action;
    use gitkit::ui::ConsoleIo;

    struct Stub(&'static str);

    impl Action for Stub {
        fn name(&self) -> &'static str {
            "push"
        }

        fn description(&self) -> &'static str {
            "stub"
        }

        fn execute(&self, _options: &ActionOptions, _io: &mut dyn ConsoleIo) -> ActionResult {
            ActionResult::success(self.0, serde_json::Value::Null)
        }
    }

    let mut h = Harness::new(MockGateway::on_branch("main"));
    h.registry.register("push", "first", |_| Box::new(Stub("first")));
    h.registry.register("push", "second", |_| Box::new(Stub("second")));

    let result = h.run("push", opts(), &mut ScriptedIo::new());
    assert_eq!(result.message(), "second");
    assert!(h.commands().is_empty());
}
