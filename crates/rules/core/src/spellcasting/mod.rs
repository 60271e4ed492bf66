//! Spellcasting resources: entries, slot tables, and their state machine.
//!
//! Entries are persisted on the actor and rebuilt into [`PreparedEntry`]
//! values on every preparation pass. Operations never mutate a live entry;
//! they return the new persisted value (wrapped in an
//! [`crate::actor::ActorPatch`] or [`crate::actor::ActorChanges`]) for the
//! caller to persist.
//!
//! Slot levels move between full (`value == max`), partially expended and
//! empty (`value == 0`) only through [`consume`] and [`recharge`]. Prepared
//! entries track an `expended` flag per prepared index instead.
mod cast;
mod consumable;
mod entry;
mod error;
mod manage;
mod prepared;
mod recharge;
mod slots;
mod spell;
mod trick;
mod types;

pub use cast::{CastOptions, CastOutcome, ConsumeFailure, ConsumeOutcome, cast, cast_with_trick, consume};
pub use consumable::{
    ConsumableCast, TRICK_MAGIC_ITEM_FEAT, cast_consumable, cast_consumable_with_trick,
};
pub use entry::{EntryOptions, SpellDc, SpellcastingEntrySource};
pub use error::SpellcastingError;
pub use manage::{
    AddSpell, add_spell, create_entry, delete_all, delete_entry, edit_entry, sort_entry_before,
};
pub use prepared::{
    ActiveSpell, LevelUses, PreparedEntry, SpellLevelView, SpellcastingCollection,
};
pub use recharge::{RechargeUpdates, recharge, refocus};
pub use slots::{SlotTable, SpellPrepData, SpellSlot};
pub use spell::{SpellInstance, SpellMessage, SpellSource, TrickAttachment};
pub use trick::TrickMagicItemEntry;
pub use types::{PreparationType, SpellCategory, Tradition, Uses};
