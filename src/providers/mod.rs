//! Snapshot sources

pub mod replay;

pub use replay::ReplayProvider;
