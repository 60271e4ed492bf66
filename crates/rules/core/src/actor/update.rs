//! Update requests produced by rules operations.
//!
//! Nothing in this crate writes to an actor directly. Operations return an
//! [`ActorChanges`] describing the write; the persistence collaborator
//! applies it (all or nothing) and a new preparation pass follows.
use std::collections::BTreeMap;

use crate::ids::ItemId;
use crate::spellcasting::SpellcastingEntrySource;

use super::item::ItemSource;
use super::source::ActorSource;

/// Field-level update of the actor record itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActorPatch {
    /// New current hit points.
    pub hp: Option<i32>,
    /// New current focus points.
    pub focus: Option<u32>,
    /// Replacement for the whole spellcasting entry list.
    pub spellcasting: Option<Vec<SpellcastingEntrySource>>,
    /// Persisted `all`-domain options; `None` removes the option.
    pub roll_options: BTreeMap<String, Option<bool>>,
}

impl ActorPatch {
    pub fn hit_points(value: i32) -> Self {
        Self {
            hp: Some(value),
            ..Self::default()
        }
    }

    pub fn focus_points(value: u32) -> Self {
        Self {
            focus: Some(value),
            ..Self::default()
        }
    }

    pub fn entries(entries: Vec<SpellcastingEntrySource>) -> Self {
        Self {
            spellcasting: Some(entries),
            ..Self::default()
        }
    }

    /// Entry list of `actor` with `entry` replacing the one sharing its id.
    pub fn with_entry(actor: &ActorSource, entry: SpellcastingEntrySource) -> Self {
        let mut entries = actor.spellcasting.clone();
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => *slot = entry,
            None => entries.push(entry),
        }
        Self::entries(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.hp.is_none()
            && self.focus.is_none()
            && self.spellcasting.is_none()
            && self.roll_options.is_empty()
    }

    /// Folds `other` into `self`; fields set in `other` win.
    pub fn merge(&mut self, other: ActorPatch) {
        if other.hp.is_some() {
            self.hp = other.hp;
        }
        if other.focus.is_some() {
            self.focus = other.focus;
        }
        if other.spellcasting.is_some() {
            self.spellcasting = other.spellcasting;
        }
        self.roll_options.extend(other.roll_options);
    }

    pub fn apply(&self, source: &mut ActorSource) {
        if let Some(hp) = self.hp {
            source.hp.value = hp;
        }
        if let Some(focus) = self.focus {
            if let Some(pool) = source.focus.as_mut() {
                pool.value = focus.min(pool.max);
            }
        }
        if let Some(entries) = &self.spellcasting {
            source.spellcasting = entries.clone();
        }
        for (option, value) in &self.roll_options {
            match value {
                Some(value) => {
                    source.roll_options.insert(option.clone(), *value);
                }
                None => {
                    source.roll_options.remove(option);
                }
            }
        }
    }
}

/// One all-or-nothing write against an actor and its items.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActorChanges {
    pub actor: ActorPatch,
    /// Full replacements of existing items, matched by id.
    pub update_items: Vec<ItemSource>,
    /// New items; an empty id asks the persistence layer to assign one.
    pub create_items: Vec<ItemSource>,
    pub delete_items: Vec<ItemId>,
}

impl ActorChanges {
    pub fn from_patch(actor: ActorPatch) -> Self {
        Self {
            actor,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actor.is_empty()
            && self.update_items.is_empty()
            && self.create_items.is_empty()
            && self.delete_items.is_empty()
    }

    /// Folds `other` into `self`. A later update of the same item wins.
    pub fn merge(&mut self, other: ActorChanges) {
        self.actor.merge(other.actor);
        for item in other.update_items {
            match self.update_items.iter_mut().find(|i| i.id == item.id) {
                Some(slot) => *slot = item,
                None => self.update_items.push(item),
            }
        }
        self.create_items.extend(other.create_items);
        for id in other.delete_items {
            self.update_items.retain(|item| item.id != id);
            if !self.delete_items.contains(&id) {
                self.delete_items.push(id);
            }
        }
    }

    /// Applies the write to an in-memory source. Updates of unknown items are
    /// ignored; created items must already carry their final ids.
    pub fn apply(&self, source: &mut ActorSource) {
        self.actor.apply(source);
        for update in &self.update_items {
            if let Some(item) = source.items.iter_mut().find(|i| i.id == update.id) {
                *item = update.clone();
            }
        }
        source.items.extend(self.create_items.iter().cloned());
        source
            .items
            .retain(|item| !self.delete_items.contains(&item.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorDetails, FocusPool, ItemData};

    fn actor() -> ActorSource {
        let mut actor = ActorSource::new("a", "Ayla", ActorDetails::Loot);
        actor.focus = Some(FocusPool { value: 1, max: 2 });
        actor.items.push(ItemSource::new("i1", "Torch", ItemData::Equipment));
        actor.items.push(ItemSource::new("i2", "Rope", ItemData::Equipment));
        actor
    }

    #[test]
    fn merge_keeps_latest_item_update() {
        let mut first = ActorChanges::from_patch(ActorPatch::focus_points(0));
        let mut renamed = ItemSource::new("i1", "Lit Torch", ItemData::Equipment);
        first.update_items.push(renamed.clone());

        renamed.name = "Burnt Torch".to_owned();
        let mut second = ActorChanges::from_patch(ActorPatch::hit_points(3));
        second.update_items.push(renamed);
        second.delete_items.push(ItemId::new("i2"));
        first.merge(second);

        assert_eq!(first.actor.focus, Some(0));
        assert_eq!(first.actor.hp, Some(3));
        assert_eq!(first.update_items.len(), 1);
        assert_eq!(first.update_items[0].name, "Burnt Torch");
    }

    #[test]
    fn apply_writes_patch_and_items() {
        let mut source = actor();
        let mut patch = ActorPatch::focus_points(5);
        patch.roll_options.insert("hidden".to_owned(), Some(true));
        let mut changes = ActorChanges::from_patch(patch);
        changes.delete_items.push(ItemId::new("i2"));
        changes
            .create_items
            .push(ItemSource::new("i3", "Lantern", ItemData::Equipment));
        changes.apply(&mut source);

        assert_eq!(source.focus.map(|f| f.value), Some(2));
        assert_eq!(source.roll_options.get("hidden"), Some(&true));
        let names: Vec<&str> = source.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Torch", "Lantern"]);

        let mut clear = ActorPatch::default();
        clear.roll_options.insert("hidden".to_owned(), None);
        clear.apply(&mut source);
        assert!(source.roll_options.is_empty());
    }
}
