//! Agent cognition: memory, target scoring, drives and the brain tying them together

pub mod brain;
pub mod collaborators;
pub mod feelings;
pub mod memory_store;
pub mod scoring;
