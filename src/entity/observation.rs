//! Perception records: what an agent saw, where, and what it was

use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Vec2};

/// Category of a perceived thing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationKind {
    Fruit,
    FruitTree,
    Water,
    Threat,
    Predator,
    Mate,
    Shelter,
    Unknown,
}

impl ObservationKind {
    /// Immediate decision weight before need modulation.
    ///
    /// Dangers are strongly negative: they are remembered, never sought.
    pub fn base_weight(self) -> f32 {
        match self {
            ObservationKind::Fruit => 100.0,
            ObservationKind::FruitTree => 75.0,
            ObservationKind::Water => 120.0,
            ObservationKind::Threat => -500.0,
            ObservationKind::Predator => -800.0,
            ObservationKind::Mate => 50.0,
            ObservationKind::Shelter => 30.0,
            ObservationKind::Unknown => 0.0,
        }
    }
}

/// Anything an agent can see and target
pub trait Perceivable {
    fn id(&self) -> EntityId;

    /// Whether this entity is currently worth acting upon
    /// (a fruit still on the branch, a tree with fruit left, ...)
    fn is_considerable(&self) -> bool;
}

/// Placeholder type behind handles whose entity no longer exists
struct Vanished;

impl Perceivable for Vanished {
    fn id(&self) -> EntityId {
        EntityId::nil()
    }

    fn is_considerable(&self) -> bool {
        false
    }
}

/// Weak reference to a perceived entity plus its identity.
///
/// The handle never keeps the entity alive: once the world drops it, the
/// handle reports it as absent and never eligible.
#[derive(Clone)]
pub struct TargetHandle {
    id: EntityId,
    target: Weak<dyn Perceivable>,
}

impl TargetHandle {
    pub fn new<T: Perceivable + 'static>(target: &Rc<T>) -> Self {
        let weak: Weak<dyn Perceivable> = Rc::downgrade(target) as Weak<dyn Perceivable>;
        Self { id: target.id(), target: weak }
    }

    /// A handle to an entity known only by identity
    pub fn detached(id: EntityId) -> Self {
        let weak: Weak<dyn Perceivable> = Weak::<Vanished>::new();
        Self { id, target: weak }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The entity still exists
    pub fn is_present(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// The entity exists and is currently eligible to be targeted.
    /// Queried fresh on every call.
    pub fn is_considered(&self) -> bool {
        self.target
            .upgrade()
            .map(|target| target.is_considerable())
            .unwrap_or(false)
    }
}

impl fmt::Debug for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetHandle")
            .field("id", &self.id)
            .field("present", &self.is_present())
            .finish()
    }
}

/// A single sighting, not yet committed to memory
#[derive(Debug, Clone)]
pub struct Observation {
    pub target: TargetHandle,
    pub position: Vec2,
    pub kind: ObservationKind,
}

impl Observation {
    pub fn new(target: TargetHandle, position: Vec2, kind: ObservationKind) -> Self {
        Self { target, position, kind }
    }

    pub fn target_id(&self) -> EntityId {
        self.target.id()
    }

    /// Same entity at (approximately) the same place
    pub fn matches(&self, other: &Observation) -> bool {
        self.target.id() == other.target.id() && self.position.approx_eq(&other.position)
    }
}

/// An observation weighed at processing time
#[derive(Debug, Clone)]
pub struct ScoredObservation {
    pub observation: Observation,
    /// Signed desirability for immediate choice
    pub decision_weight: f32,
    /// Strength it would enter long-term memory with (never negative)
    pub candidate_strength: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Berry {
        id: EntityId,
        ripe: Cell<bool>,
    }

    impl Perceivable for Berry {
        fn id(&self) -> EntityId {
            self.id
        }

        fn is_considerable(&self) -> bool {
            self.ripe.get()
        }
    }

    #[test]
    fn test_handle_queries_eligibility_fresh() {
        let berry = Rc::new(Berry { id: EntityId::new(), ripe: Cell::new(true) });
        let handle = TargetHandle::new(&berry);
        assert!(handle.is_considered());

        berry.ripe.set(false);
        assert!(!handle.is_considered());
        assert!(handle.is_present());
    }

    #[test]
    fn test_dropped_target_is_absent() {
        let berry = Rc::new(Berry { id: EntityId::new(), ripe: Cell::new(true) });
        let handle = TargetHandle::new(&berry);
        let id = berry.id;
        drop(berry);

        assert!(!handle.is_present());
        assert!(!handle.is_considered());
        assert_eq!(handle.id(), id);
    }

    #[test]
    fn test_detached_handle_is_never_considered() {
        let handle = TargetHandle::detached(EntityId::new());
        assert!(!handle.is_present());
        assert!(!handle.is_considered());
    }

    #[test]
    fn test_matches_requires_identity_and_position() {
        let id = EntityId::new();
        let a = Observation::new(TargetHandle::detached(id), Vec2::new(10.0, 10.0), ObservationKind::Water);
        let same = Observation::new(TargetHandle::detached(id), Vec2::new(10.0, 10.0), ObservationKind::Water);
        let moved = Observation::new(TargetHandle::detached(id), Vec2::new(30.0, 10.0), ObservationKind::Water);
        let other = Observation::new(TargetHandle::detached(EntityId::new()), Vec2::new(10.0, 10.0), ObservationKind::Water);

        assert!(a.matches(&same));
        assert!(!a.matches(&moved));
        assert!(!a.matches(&other));
    }

    #[test]
    fn test_dangers_weigh_negative() {
        assert!(ObservationKind::Predator.base_weight() < ObservationKind::Threat.base_weight());
        assert!(ObservationKind::Threat.base_weight() < 0.0);
        assert_eq!(ObservationKind::Unknown.base_weight(), 0.0);
    }
}
