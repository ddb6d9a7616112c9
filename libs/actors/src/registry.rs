//! Actor Registry
//!
//! Name-based actor discovery for a single process. The registry is an
//! explicitly constructed value handed to every actor at build time rather
//! than a hidden process-wide singleton; share it with `Arc` and any actor
//! can look up any other by name.
//!
//! Entries are non-owning handles. Removing a registered actor does not stop
//! it, and stopping an actor does not remove it; callers own both sides of
//! that lifecycle.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::actor::ActorRef;
use crate::error::{ActorError, Result};
use crate::messages::ActorId;

/// Process-wide name-to-actor directory.
pub struct ActorRegistry {
    entries: RwLock<HashMap<ActorId, ActorRef>>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register an actor under its own name.
    ///
    /// Insert-only: a duplicate name is reported and leaves the existing
    /// entry untouched.
    pub fn add(&self, actor: ActorRef) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.contains_key(actor.id()) {
            warn!(actor_id = %actor.id(), "name conflict, keeping existing registration");
            return Err(ActorError::NameConflict {
                name: actor.id().clone(),
            });
        }
        debug!(actor_id = %actor.id(), "registered actor");
        entries.insert(actor.id().clone(), actor);
        Ok(())
    }

    /// Remove an entry if present. Removing an absent name is a reported
    /// no-op, not an error.
    pub fn remove(&self, id: &ActorId) {
        if self.entries.write().remove(id).is_some() {
            debug!(actor_id = %id, "unregistered actor");
        } else {
            warn!(actor_id = %id, "remove of unknown actor ignored");
        }
    }

    /// Look up an actor by name.
    ///
    /// A miss is a legitimate signal, not a failure; the send policy uses it
    /// to pick the spawn-down branch.
    pub fn get(&self, id: &ActorId) -> Option<ActorRef> {
        self.entries.read().get(id).cloned()
    }

    pub fn contains(&self, id: &ActorId) -> bool {
        self.entries.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Names of all registered actors, in no particular order.
    pub fn names(&self) -> Vec<ActorId> {
        self.entries.read().keys().cloned().collect()
    }
}

impl Default for ActorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorRef;

    fn actor_ref(name: &str) -> ActorRef {
        ActorRef::detached(ActorId::from(name))
    }

    #[test]
    fn add_then_get_returns_the_same_actor() {
        let registry = ActorRegistry::new();
        let actor = actor_ref("numeric_actor");
        registry.add(actor.clone()).unwrap();

        let found = registry.get(&ActorId::from("numeric_actor")).unwrap();
        assert_eq!(found, actor);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_name_preserves_the_first_registration() {
        let registry = ActorRegistry::new();
        let first = actor_ref("worker");
        let second = actor_ref("worker");
        registry.add(first.clone()).unwrap();

        let err = registry.add(second).unwrap_err();
        assert_eq!(
            err,
            ActorError::NameConflict {
                name: ActorId::from("worker")
            }
        );
        // The first handle is still the one resolved.
        let found = registry.get(&ActorId::from("worker")).unwrap();
        assert!(found.same_actor(&first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_miss_is_none_not_an_error() {
        let registry = ActorRegistry::new();
        assert!(registry.get(&ActorId::from("ghost")).is_none());
    }

    #[test]
    fn remove_absent_name_is_a_no_op() {
        let registry = ActorRegistry::new();
        registry.remove(&ActorId::from("ghost"));
        assert!(registry.is_empty());

        registry.add(actor_ref("worker")).unwrap();
        registry.remove(&ActorId::from("worker"));
        assert!(registry.is_empty());
    }

    #[test]
    fn names_lists_every_registration() {
        let registry = ActorRegistry::new();
        registry.add(actor_ref("a")).unwrap();
        registry.add(actor_ref("b")).unwrap();

        let mut names = registry.names();
        names.sort();
        assert_eq!(names, vec![ActorId::from("a"), ActorId::from("b")]);
    }
}
