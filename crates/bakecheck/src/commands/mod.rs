//! CLI command implementations

pub mod audit;
pub mod bake;
pub mod validate;
pub mod verify;
