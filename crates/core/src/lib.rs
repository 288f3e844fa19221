//! `etims-core`: shared building blocks for the invoice worker.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no storage):
//! decimal money helpers and the value-object marker used by the domain model.

pub mod money;
pub mod value_object;

pub use money::{MONEY_TOLERANCE, Money, format_amount, percent_of, sum, within_tolerance};
pub use value_object::ValueObject;
