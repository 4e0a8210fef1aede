//! Creature Mind - memory, drives and behavior for simulated creatures
//!
//! The cognition core (`cognition`, `behavior`, `entity`) is engine-agnostic:
//! it talks to movement, physiology, perception and other agents only
//! through the traits in [`cognition::collaborators`]. The `world` and
//! `simulation` modules provide a headless sandbox that implements them.

pub mod agent;
pub mod behavior;
pub mod cognition;
pub mod core;
pub mod entity;
pub mod genetics;
pub mod simulation;
pub mod spatial;
pub mod world;
