//! CLI command implementations

pub mod sweep;

pub use sweep::SweepArgs;
