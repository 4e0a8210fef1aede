//! Food and water the sandbox creatures live on

use std::cell::Cell;
use std::rc::Rc;

use crate::cognition::collaborators::{Consumable, ConsumeEffect};
use crate::core::types::{EntityId, SimTime, Vec2};
use crate::entity::observation::{ObservationKind, Perceivable, TargetHandle};

/// How much hunger one fruit takes away
pub const FRUIT_NOURISHMENT: f32 = 0.1;
/// How much thirst one drink takes away
pub const WATER_HYDRATION: f32 = 1.0;
/// Distance from the trunk at which fruit hangs and falls
const FRUIT_SPREAD: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FruitState {
    OnTree,
    OnGround,
    Eaten,
}

#[derive(Debug)]
pub struct Fruit {
    id: EntityId,
    position: Vec2,
    state: Cell<FruitState>,
}

impl Fruit {
    pub fn new(position: Vec2, state: FruitState) -> Self {
        Self { id: EntityId::new(), position, state: Cell::new(state) }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn state(&self) -> FruitState {
        self.state.get()
    }
}

impl Perceivable for Fruit {
    fn id(&self) -> EntityId {
        self.id
    }

    fn is_considerable(&self) -> bool {
        self.state.get() == FruitState::OnGround
    }
}

impl Consumable for Fruit {
    fn kind(&self) -> ObservationKind {
        ObservationKind::Fruit
    }

    fn consume(&self) -> ConsumeEffect {
        if self.state.get() != FruitState::OnGround {
            return ConsumeEffect::Nothing;
        }
        self.state.set(FruitState::Eaten);
        ConsumeEffect::Nourish(FRUIT_NOURISHMENT)
    }
}

/// A tree that drops its fruit when shaken and regrows it once all of it is eaten
#[derive(Debug)]
pub struct FruitTree {
    id: EntityId,
    position: Vec2,
    fruits: Vec<Rc<Fruit>>,
    respawn_delay: f32,
    bare_since: Cell<Option<SimTime>>,
}

impl FruitTree {
    pub fn new(position: Vec2, fruit_count: usize, respawn_delay: f32) -> Self {
        let fruits = (0..fruit_count)
            .map(|i| {
                let angle = i as f32 / fruit_count.max(1) as f32 * std::f32::consts::TAU;
                Rc::new(Fruit::new(position + Vec2::from_angle(angle) * FRUIT_SPREAD, FruitState::OnTree))
            })
            .collect();
        Self {
            id: EntityId::new(),
            position,
            fruits,
            respawn_delay,
            bare_since: Cell::new(None),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn fruits(&self) -> &[Rc<Fruit>] {
        &self.fruits
    }

    pub fn hanging(&self) -> usize {
        self.fruits
            .iter()
            .filter(|f| f.state() == FruitState::OnTree)
            .count()
    }

    /// Regrow all fruit `respawn_delay` seconds after the last one was eaten
    pub fn update(&self, now: SimTime) {
        let bare = self.fruits.iter().all(|f| f.state() == FruitState::Eaten);
        if !bare {
            self.bare_since.set(None);
            return;
        }
        match self.bare_since.get() {
            None => self.bare_since.set(Some(now)),
            Some(since) if now - since >= self.respawn_delay => {
                for fruit in &self.fruits {
                    fruit.state.set(FruitState::OnTree);
                }
                self.bare_since.set(None);
                tracing::debug!(tree = %self.id, fruits = self.fruits.len(), "fruit regrown");
            }
            Some(_) => {}
        }
    }
}

impl Perceivable for FruitTree {
    fn id(&self) -> EntityId {
        self.id
    }

    fn is_considerable(&self) -> bool {
        self.hanging() > 0
    }
}

impl Consumable for FruitTree {
    fn kind(&self) -> ObservationKind {
        ObservationKind::FruitTree
    }

    /// Shaking: every hanging fruit falls to the ground
    fn consume(&self) -> ConsumeEffect {
        for fruit in &self.fruits {
            if fruit.state() == FruitState::OnTree {
                fruit.state.set(FruitState::OnGround);
            }
        }
        ConsumeEffect::Nothing
    }
}

#[derive(Debug)]
pub struct WaterSource {
    id: EntityId,
    position: Vec2,
}

impl WaterSource {
    pub fn new(position: Vec2) -> Self {
        Self { id: EntityId::new(), position }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}

impl Perceivable for WaterSource {
    fn id(&self) -> EntityId {
        self.id
    }

    fn is_considerable(&self) -> bool {
        true
    }
}

impl Consumable for WaterSource {
    fn kind(&self) -> ObservationKind {
        ObservationKind::Water
    }

    fn consume(&self) -> ConsumeEffect {
        ConsumeEffect::Hydrate(WATER_HYDRATION)
    }
}

/// Any resource placed in the world
#[derive(Debug, Clone)]
pub enum Resource {
    Fruit(Rc<Fruit>),
    Tree(Rc<FruitTree>),
    Water(Rc<WaterSource>),
}

impl Resource {
    pub fn id(&self) -> EntityId {
        match self {
            Resource::Fruit(f) => f.id(),
            Resource::Tree(t) => t.id(),
            Resource::Water(w) => w.id(),
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Resource::Fruit(f) => f.position(),
            Resource::Tree(t) => t.position(),
            Resource::Water(w) => w.position(),
        }
    }

    pub fn kind(&self) -> ObservationKind {
        match self {
            Resource::Fruit(f) => f.kind(),
            Resource::Tree(t) => t.kind(),
            Resource::Water(w) => w.kind(),
        }
    }

    pub fn is_considerable(&self) -> bool {
        match self {
            Resource::Fruit(f) => f.is_considerable(),
            Resource::Tree(t) => t.is_considerable(),
            Resource::Water(w) => w.is_considerable(),
        }
    }

    pub fn handle(&self) -> TargetHandle {
        match self {
            Resource::Fruit(f) => TargetHandle::new(f),
            Resource::Tree(t) => TargetHandle::new(t),
            Resource::Water(w) => TargetHandle::new(w),
        }
    }

    pub fn as_consumable(&self) -> Rc<dyn Consumable> {
        match self {
            Resource::Fruit(f) => Rc::clone(f) as Rc<dyn Consumable>,
            Resource::Tree(t) => Rc::clone(t) as Rc<dyn Consumable>,
            Resource::Water(w) => Rc::clone(w) as Rc<dyn Consumable>,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shaking_drops_fruit() {
        let tree = FruitTree::new(Vec2::ZERO, 3, 20.0);
        assert!(tree.is_considerable());
        assert!(tree.fruits().iter().all(|f| !f.is_considerable()));

        assert_eq!(tree.consume(), ConsumeEffect::Nothing);
        assert!(!tree.is_considerable());
        assert!(tree.fruits().iter().all(|f| f.is_considerable()));
    }

    #[test]
    fn test_fruit_eaten_once() {
        let fruit = Fruit::new(Vec2::ZERO, FruitState::OnGround);
        assert_eq!(fruit.consume(), ConsumeEffect::Nourish(FRUIT_NOURISHMENT));
        assert_eq!(fruit.consume(), ConsumeEffect::Nothing);
        assert!(!fruit.is_considerable());
    }

    #[test]
    fn test_tree_regrows_after_delay() {
        let tree = FruitTree::new(Vec2::ZERO, 2, 20.0);
        tree.consume();
        for fruit in tree.fruits() {
            fruit.consume();
        }
        tree.update(100.0);
        assert_eq!(tree.hanging(), 0);
        tree.update(119.0);
        assert_eq!(tree.hanging(), 0);
        tree.update(120.0);
        assert_eq!(tree.hanging(), 2);
    }

    #[test]
    fn test_water_always_available() {
        let water = WaterSource::new(Vec2::ZERO);
        assert_eq!(water.consume(), ConsumeEffect::Hydrate(WATER_HYDRATION));
        assert!(water.is_considerable());
    }
}
