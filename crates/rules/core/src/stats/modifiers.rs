//! Typed modifiers and the stacking law.
use std::collections::{BTreeMap, BTreeSet};

use strum::{AsRefStr, Display, EnumString};

use crate::ids::ItemId;
use crate::options::Predicate;

/// Modifier categories. Typed modifiers of the same category do not stack.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModifierType {
    #[default]
    Untyped,
    Ability,
    Proficiency,
    Circumstance,
    Status,
    Item,
}

/// A named numeric adjustment to a statistic.
///
/// `ignored` is an input (manually disabled or predicate failed); `enabled` is
/// the output of [`apply_stacking_rules`]. Ignored and stacked-out modifiers
/// stay in the list so breakdowns can show them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub slug: String,
    pub label: String,
    pub value: i32,
    pub kind: ModifierType,
    pub predicate: Predicate,
    pub source: Option<ItemId>,
    pub ignored: bool,
    pub enabled: bool,
}

impl Modifier {
    pub fn new(slug: impl Into<String>, label: impl Into<String>, value: i32, kind: ModifierType) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            value,
            kind,
            predicate: Predicate::default(),
            source: None,
            ignored: false,
            enabled: true,
        }
    }

    pub fn untyped(slug: impl Into<String>, label: impl Into<String>, value: i32) -> Self {
        Self::new(slug, label, value, ModifierType::Untyped)
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: ItemId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self.enabled = false;
        self
    }

    pub fn is_penalty(&self) -> bool {
        self.value < 0
    }

    /// `"Label +2"` / `"Label -1"`
    pub fn signed_label(&self) -> String {
        format!("{} {:+}", self.label, self.value)
    }
}

/// Tests predicates, resolves stacking, and returns the total of enabled modifiers.
///
/// For each typed category only the greatest bonus and the least penalty are
/// enabled (the earlier one wins a tie). Untyped modifiers all stack.
pub fn apply_stacking_rules(modifiers: &mut [Modifier], options: &BTreeSet<String>) -> i32 {
    for modifier in modifiers.iter_mut() {
        if !modifier.ignored && !modifier.predicate.test(options) {
            modifier.ignored = true;
        }
        modifier.enabled = !modifier.ignored;
    }

    // (type, is_penalty) -> index of the modifier currently winning that slot
    let mut best: BTreeMap<(ModifierType, bool), usize> = BTreeMap::new();
    for index in 0..modifiers.len() {
        let modifier = &modifiers[index];
        if modifier.ignored || modifier.kind == ModifierType::Untyped {
            continue;
        }
        let key = (modifier.kind, modifier.is_penalty());
        match best.get(&key).copied() {
            None => {
                best.insert(key, index);
            }
            Some(current) => {
                let replaces = if modifier.is_penalty() {
                    modifier.value < modifiers[current].value
                } else {
                    modifier.value > modifiers[current].value
                };
                if replaces {
                    modifiers[current].enabled = false;
                    best.insert(key, index);
                } else {
                    modifiers[index].enabled = false;
                }
            }
        }
    }

    modifiers
        .iter()
        .filter(|modifier| modifier.enabled)
        .map(|modifier| modifier.value)
        .sum()
}

/// A note attached to rolls in the given selector.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollNote {
    pub selector: String,
    pub text: String,
    pub predicate: Predicate,
    pub source: Option<ItemId>,
}
