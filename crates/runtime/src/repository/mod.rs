//! Repository layer for persisted actor data.
//!
//! The rules core never writes anything itself; every operation returns an
//! [`rules_core::ActorChanges`] which the runtime hands to an
//! [`ActorRepository`].

mod error;
mod memory;
mod traits;

pub use error::RepositoryError;
pub use memory::InMemoryActorRepo;
pub use traits::ActorRepository;
