//! Persisted, loosely-typed rule element descriptors.
use crate::options::Predicate;

/// A value that may be authored as a literal or as text with injected
/// properties (e.g. `"{actor|level}"`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RuleValue {
    Bool(bool),
    Number(i32),
    Text(String),
}

/// What a disabled toggle forces its option to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisabledValue {
    Value(bool),
    /// Keep whatever value the option had before it was disabled.
    Preserve,
}

/// Rule element as authored on an item.
///
/// Fields are optional because each `key` reads a different subset;
/// constructors validate the subset they need.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuleElementSource {
    pub key: String,
    pub priority: Option<i32>,
    pub label: Option<String>,
    pub slug: Option<String>,
    pub predicate: Option<Predicate>,
    /// Authored opt-out: the element is skipped without a diagnostic.
    pub ignored: bool,

    pub domain: Option<String>,
    pub option: Option<String>,
    pub value: Option<RuleValue>,
    pub toggleable: Option<bool>,
    pub disabled_if: Option<Predicate>,
    pub disabled_value: Option<DisabledValue>,
    pub count: Option<bool>,

    pub selector: Vec<String>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub modifier_type: Option<String>,
    pub text: Option<String>,
}

impl RuleElementSource {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// A `RollOption` element setting `option` in `domain`.
    pub fn roll_option(domain: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            option: Some(option.into()),
            ..Self::new("RollOption")
        }
    }

    /// A `FlatModifier` element adding `value` to `selector`.
    pub fn flat_modifier(selector: impl Into<String>, value: i32) -> Self {
        Self {
            selector: vec![selector.into()],
            value: Some(RuleValue::Number(value)),
            ..Self::new("FlatModifier")
        }
    }

    #[must_use]
    pub fn toggleable(mut self, value: bool) -> Self {
        self.toggleable = Some(true);
        self.value = Some(RuleValue::Bool(value));
        self
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// True for a toggleable `RollOption` bound to `(domain, option)`.
    pub fn is_toggle_for(&self, domain: &str, option: &str) -> bool {
        self.key == "RollOption"
            && self.toggleable == Some(true)
            && self.domain.as_deref() == Some(domain)
            && self.option.as_deref() == Some(option)
    }
}
