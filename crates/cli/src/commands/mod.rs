//! Subcommand implementations.

mod cast;
mod encounter;
mod prepare;
mod rest;
mod toggle;

pub use cast::{Cast, CastConsumable};
pub use encounter::RunEncounter;
pub use prepare::Prepare;
pub use rest::{Refocus, Rest};
pub use toggle::Toggle;
