//! Operations the runtime exposes on top of [`crate::Runtime`].
//!
//! Each operation loads the persisted actor, runs the pure rules-core
//! operation on a fresh preparation pass, persists the returned change
//! request in one write, and re-prepares the actor.

mod actors;
mod effects;
mod encounter;
mod spellcasting;
