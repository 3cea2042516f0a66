//! actions::registry
//!
//! Name to action-factory lookup.
//!
//! # Design
//!
//! Registration happens once at startup; afterwards the registry is only
//! read, so it needs no locking. Re-registering a name replaces its factory
//! but keeps the name's position in [`ActionRegistry::list_names`].

use super::{
    branch, checkout, fetch, merge, pull, push, rebase, Action, ActionContext, ActionError,
};

/// Builds a fresh action for one invocation.
pub type ActionFactory = Box<dyn Fn(&ActionContext) -> Box<dyn Action>>;

struct Registration {
    name: String,
    description: String,
    factory: ActionFactory,
}

/// Registry of available actions, in registration order.
#[derive(Default)]
pub struct ActionRegistry {
    entries: Vec<Registration>,
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.list_names())
            .finish()
    }
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in action.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("push", push::DESCRIPTION, |ctx| {
            Box::new(push::PushAction::new(ctx))
        });
        registry.register("pull", pull::DESCRIPTION, |ctx| {
            Box::new(pull::PullAction::new(ctx))
        });
        registry.register("checkout", checkout::DESCRIPTION, |ctx| {
            Box::new(checkout::CheckoutAction::new(ctx))
        });
        registry.register("branch", branch::DESCRIPTION, |ctx| {
            Box::new(branch::BranchAction::new(ctx))
        });
        registry.register("merge", merge::DESCRIPTION, |ctx| {
            Box::new(merge::MergeAction::new(ctx))
        });
        registry.register("fetch", fetch::DESCRIPTION, |ctx| {
            Box::new(fetch::FetchAction::new(ctx))
        });
        registry.register("rebase", rebase::DESCRIPTION, |ctx| {
            Box::new(rebase::RebaseAction::new(ctx))
        });
        registry
    }

    /// Register an action, replacing any factory already under `name`.
    pub fn register<F>(&mut self, name: &str, description: &str, factory: F)
    where
        F: Fn(&ActionContext) -> Box<dyn Action> + 'static,
    {
        let factory: ActionFactory = Box::new(factory);
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.description = description.to_string();
                entry.factory = factory;
            }
            None => self.entries.push(Registration {
                name: name.to_string(),
                description: description.to_string(),
                factory,
            }),
        }
    }

    /// Build a fresh action for `name`.
    ///
    /// # Errors
    ///
    /// [`ActionError::UnsupportedAction`] if nothing is registered under `name`.
    pub fn resolve(&self, name: &str, ctx: &ActionContext) -> Result<Box<dyn Action>, ActionError> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| (e.factory)(ctx))
            .ok_or_else(|| ActionError::UnsupportedAction {
                action: name.to_string(),
                supported: self.list_names().iter().map(|n| n.to_string()).collect(),
            })
    }

    pub fn supports(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Registered names in registration order.
    pub fn list_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// `(name, description)` pairs in registration order.
    pub fn catalog(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.description.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
