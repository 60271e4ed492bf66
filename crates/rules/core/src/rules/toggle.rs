//! Planning of roll option toggles.
//!
//! A toggle never mutates a prepared actor. It produces the persisted change
//! that, once applied and followed by a new pass, flips the option.
use crate::actor::{ActorChanges, ActorPatch, ItemSource, PreparedActor};
use crate::ids::ItemId;
use crate::options::{ALL_DOMAIN, sanitize_domain, sanitize_option};

use super::{RuleValue, ToggleError};

/// Option stored directly on the actor instead of on a rule element.
const FLAT_FOOTED_OPTION: &str = "target:condition:flat-footed";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleRequest {
    pub domain: String,
    pub option: String,
    /// Item authoring the toggle. When absent the first materialized rule
    /// element bound to `(domain, option)` is used.
    pub item: Option<ItemId>,
    /// Desired value, defaulting to the negation of the current one.
    pub value: Option<bool>,
}

impl ToggleRequest {
    pub fn new(domain: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            option: option.into(),
            item: None,
            value: None,
        }
    }

    #[must_use]
    pub fn on_item(mut self, item: impl Into<ItemId>) -> Self {
        self.item = Some(item.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: bool) -> Self {
        self.value = Some(value);
        self
    }
}

/// Persisted change implementing a toggle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TogglePlan {
    /// Flag kept in the actor's own `all` options.
    ActorFlag { option: String, value: bool },
    /// Item whose rule list now carries the new value.
    ItemRules { item: ItemSource, value: bool },
}

impl TogglePlan {
    /// Value the option will have after the change is persisted.
    pub fn value(&self) -> bool {
        match self {
            Self::ActorFlag { value, .. } | Self::ItemRules { value, .. } => *value,
        }
    }

    pub fn into_changes(self) -> ActorChanges {
        match self {
            Self::ActorFlag { option, value } => {
                let mut patch = ActorPatch::default();
                patch.roll_options.insert(option, value.then_some(true));
                ActorChanges::from_patch(patch)
            }
            Self::ItemRules { item, .. } => ActorChanges {
                update_items: vec![item],
                ..ActorChanges::default()
            },
        }
    }
}

/// Resolves `request` against a prepared actor.
///
/// Returns `Ok(None)` when no toggleable rule element matches or the stored
/// value already equals the requested one.
pub fn plan_toggle(
    actor: &PreparedActor,
    request: &ToggleRequest,
) -> Result<Option<TogglePlan>, ToggleError> {
    let domain = sanitize_domain(&request.domain);
    let option = sanitize_option(&request.option);
    let value = request
        .value
        .unwrap_or_else(|| !actor.options.is_set(&domain, &option));

    if domain == ALL_DOMAIN && option == FLAT_FOOTED_OPTION {
        return Ok(Some(TogglePlan::ActorFlag { option, value }));
    }

    let (item_id, index) = match &request.item {
        Some(item) => (item.clone(), None),
        None => {
            let Some(rule) = actor.rules.iter().find(|rule| {
                rule.as_roll_option()
                    .is_some_and(|r| r.domain == domain && r.option == option)
            }) else {
                return Ok(None);
            };
            (rule.base.item.clone(), Some(rule.base.index))
        }
    };

    let item = actor
        .source
        .item(&item_id)
        .ok_or_else(|| ToggleError::ItemNotFound(item_id.clone()))?;

    let target = Some(RuleValue::Bool(value));
    let position = match index {
        Some(index) => item
            .rules
            .get(index)
            .filter(|rule| rule.key == "RollOption" && rule.toggleable == Some(true))
            .filter(|rule| rule.value != target)
            .map(|_| index),
        None => item
            .rules
            .iter()
            .position(|rule| rule.is_toggle_for(&domain, &option) && rule.value != target),
    };

    Ok(position.map(|position| {
        let mut updated = item.clone();
        updated.rules[position].value = target;
        TogglePlan::ItemRules {
            item: updated,
            value,
        }
    }))
}
