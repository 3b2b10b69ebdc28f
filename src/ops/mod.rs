// src/ops/mod.rs

//! Operation engine.
//!
//! - [`transforms`] holds the five pure string transforms and `combine`.
//! - [`roster`] decides which operation a machine applies in a given cycle.

pub mod roster;
pub mod transforms;

pub use roster::{roster_for, OperationSchedule, EVEN_ROSTER, ODD_ROSTER};
pub use transforms::{apply, chop, combine, enhance, reverse, split, trim};
