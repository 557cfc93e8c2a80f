//! Core trait abstractions.

pub mod ai;

pub use ai::Ai;
