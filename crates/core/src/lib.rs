//! `medsupply-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the analytics engine
//! and its callers (no IO, no rendering concerns).

pub mod clock;
pub mod error;
pub mod id;
pub mod value_object;

pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use error::{DomainError, DomainResult};
pub use id::ItemId;
pub use value_object::ValueObject;
