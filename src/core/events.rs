//! core::events
//!
//! Domain events emitted by actions.
//!
//! Events are notifications only. A subscriber that fails is logged and
//! skipped; the action that published the event is never affected.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Something that happened in the repository because of an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Changes were committed on `branch` and the push is about to run.
    ///
    /// Published as soon as the commit succeeds. A push that git rejects
    /// afterwards does not retract it, since the commit exists either way.
    CommitPushed {
        branch: String,
        message: String,
        at: DateTime<Utc>,
    },
    /// A new branch was created from `from`.
    BranchCreated {
        branch: String,
        from: Option<String>,
        at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Event for a commit made by the push action, before its push runs.
    pub fn commit_pushed(branch: &str, message: &str) -> Self {
        DomainEvent::CommitPushed {
            branch: branch.to_string(),
            message: message.to_string(),
            at: Utc::now(),
        }
    }

    pub fn branch_created(branch: &str, from: Option<&str>) -> Self {
        DomainEvent::BranchCreated {
            branch: branch.to_string(),
            from: from.map(String::from),
            at: Utc::now(),
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::CommitPushed { .. } => "commit_pushed",
            DomainEvent::BranchCreated { .. } => "branch_created",
        }
    }

    /// Branch the event is about.
    pub fn branch(&self) -> &str {
        match self {
            DomainEvent::CommitPushed { branch, .. } | DomainEvent::BranchCreated { branch, .. } => {
                branch
            }
        }
    }
}

impl fmt::Display for DomainEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainEvent::CommitPushed { branch, message, .. } => {
                write!(f, "committed on {}: {}", branch, message)
            }
            DomainEvent::BranchCreated { branch, from, .. } => match from {
                Some(from) => write!(f, "created {} from {}", branch, from),
                None => write!(f, "created {}", branch),
            },
        }
    }
}

/// Receiver of domain events.
pub trait EventSubscriber {
    /// Name used when logging subscriber failures.
    fn name(&self) -> &str;

    /// Handle one event.
    fn notify(&self, event: &DomainEvent) -> Result<(), String>;
}

/// Fan-out of events to subscribers in registration order.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Rc<dyn EventSubscriber>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.subscribers.iter().map(|s| s.name()).collect();
        f.debug_struct("EventBus").field("subscribers", &names).finish()
    }
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bus with the [`LogSubscriber`] attached.
    pub fn with_logging() -> Self {
        let mut bus = Self::new();
        bus.subscribe(Rc::new(LogSubscriber));
        bus
    }

    pub fn subscribe(&mut self, subscriber: Rc<dyn EventSubscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Deliver `event` to every subscriber. Never fails.
    pub fn publish(&self, event: &DomainEvent) {
        for subscriber in &self.subscribers {
            if let Err(error) = subscriber.notify(event) {
                warn!(
                    subscriber = subscriber.name(),
                    event = event.kind(),
                    %error,
                    "event subscriber failed"
                );
            }
        }
    }
}

/// Writes every event to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSubscriber;

impl EventSubscriber for LogSubscriber {
    fn name(&self) -> &str {
        "log"
    }

    fn notify(&self, event: &DomainEvent) -> Result<(), String> {
        info!(event = event.kind(), branch = event.branch(), "{}", event);
        Ok(())
    }
}

/// Subscriber that keeps every event it sees; for tests.
#[derive(Debug, Default)]
pub struct RecordingSubscriber {
    events: RefCell<Vec<DomainEvent>>,
    fail: bool,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// A subscriber that records and then reports failure.
    pub fn failing() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.borrow().clone()
    }
}

impl EventSubscriber for RecordingSubscriber {
    fn name(&self) -> &str {
        "recording"
    }

    fn notify(&self, event: &DomainEvent) -> Result<(), String> {
        self.events.borrow_mut().push(event.clone());
        if self.fail {
            Err("subscriber unavailable".to_string())
        } else {
            Ok(())
        }
    }
}
