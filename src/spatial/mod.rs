//! Spatial indexing for the sandbox world

pub mod sparse_hash;
