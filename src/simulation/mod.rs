//! Simulation loop for the sandbox world

pub mod tick;
