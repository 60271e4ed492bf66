//! Actors: persisted sources, preparation passes, and update requests.
//!
//! [`ActorSource`] is what persistence stores. [`ActorPreparer::prepare`]
//! turns it into a [`PreparedActor`] in a single deterministic pass; the
//! actor kind decides which statistics are derived. Anything that changes an
//! actor is expressed as [`ActorChanges`].
mod derived;
mod item;
mod prepare;
mod prepared;
mod source;
mod update;

pub use derived::{ARMOR_CLASS, CLASS_DC, PERCEPTION};
pub use item::{ClassSource, ConsumableKind, ConsumableSource, ItemData, ItemKind, ItemSource};
pub use prepare::ActorPreparer;
pub use prepared::{EffectState, PreparedActor};
pub use source::{
    ActorDetails, ActorKind, ActorSource, CharacterDetails, FocusPool, HazardDetails, HitPoints,
    NpcDetails, VehicleDetails,
};
pub use update::{ActorChanges, ActorPatch};
