//! Specialized data structures used by the crate.

pub mod arena;
pub mod pair_key;

pub use arrayvec::ArrayVec;
