//! Shared helpers used across the formatting modules.

pub mod numeric;

pub use numeric::{finite_or_zero, parse_number, to_fixed};
