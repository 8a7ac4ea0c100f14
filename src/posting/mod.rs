//! Voucher posting: shape validation, entry derivation, and the engine

pub mod derive;
pub mod engine;

pub use derive::*;
pub use engine::*;
