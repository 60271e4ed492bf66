//! `RollOption`: sets, counts or exposes as a toggle one option in one domain.
use crate::ids::ItemId;
use crate::options::{Predicate, RollOptionRegistry, sanitize_option};

use super::{
    DisabledValue, InjectionScope, RuleBase, RuleBehavior, RuleElementSource, RuleKind, RulePass,
    RuleValue, ValidationError,
};

/// A user-facing switch produced by a toggleable `RollOption`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollToggle {
    pub item: ItemId,
    pub label: String,
    pub domain: String,
    pub option: String,
    pub checked: bool,
    /// False when the `disabledIf` predicate holds.
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollOptionRule {
    pub domain: String,
    /// Option with injected properties resolved and sanitized.
    pub option: String,
    pub value: bool,
    pub toggleable: bool,
    pub disabled_if: Option<Predicate>,
    pub disabled_value: DisabledValue,
    pub count: bool,
}

fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty()
        && domain
            .chars()
            .all(|c| c == '-' || c.is_ascii_lowercase() || c.is_ascii_digit())
        && domain.chars().any(|c| c.is_ascii_lowercase())
}

fn resolve_bool(text: &str, scope: &InjectionScope<'_>) -> Result<bool, ValidationError> {
    match scope.resolve(text)?.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ValidationError::field("value", "must resolve to true or false")),
    }
}

impl RollOptionRule {
    pub fn construct(
        source: &RuleElementSource,
        scope: &InjectionScope<'_>,
    ) -> Result<RuleKind, ValidationError> {
        let domain = source.domain.as_deref().map(str::trim).unwrap_or_default();
        if !is_valid_domain(domain) {
            return Err(ValidationError::field(
                "domain",
                "must consist of only lowercase letters, numbers, and hyphens",
            ));
        }

        let toggleable = source.toggleable.unwrap_or(false);
        if source.disabled_if.is_some() && !toggleable {
            return Err(ValidationError::field(
                "disabledIf",
                "may only be included if toggleable is true",
            ));
        }
        if let Some(predicate) = &source.disabled_if {
            if !predicate.is_valid() {
                return Err(ValidationError::InvalidPredicate);
            }
        }
        if source.disabled_value.is_some() && (!toggleable || source.disabled_if.is_none()) {
            return Err(ValidationError::field(
                "disabledValue",
                "may only be included if toggleable is true and there is a disabledIf predicate",
            ));
        }
        if source.count.is_some() && toggleable {
            return Err(ValidationError::field(
                "count",
                "may not be included if toggleable is true",
            ));
        }

        let option = source.option.as_deref().unwrap_or_default();
        let option = sanitize_option(scope.resolve(option.trim())?.as_str());
        if option.is_empty() {
            return Err(ValidationError::field(
                "option",
                "must consist of only letters, numbers, colons, and hyphens",
            ));
        }

        let value = match &source.value {
            None => !toggleable,
            Some(RuleValue::Bool(value)) => *value,
            Some(RuleValue::Text(text)) => resolve_bool(text, scope)?,
            Some(RuleValue::Number(_)) => {
                return Err(ValidationError::field(
                    "value",
                    "must be a boolean, string, or otherwise omitted",
                ));
            }
        };

        Ok(RuleKind::RollOption(Self {
            domain: domain.to_owned(),
            option,
            value,
            toggleable,
            disabled_if: source.disabled_if.clone(),
            disabled_value: source.disabled_value.unwrap_or(DisabledValue::Value(false)),
            count: source.count.unwrap_or(false),
        }))
    }
}

impl RuleBehavior for RollOptionRule {
    fn apply_roll_options(&self, base: &RuleBase, pass: &mut RulePass<'_>) {
        if !base.test(&pass.options.option_set(&[self.domain.as_str()])) {
            return;
        }

        if self.count {
            pass.options.increment(&self.domain, &self.option);
            return;
        }

        pass.options.set(&self.domain, self.option.clone(), self.value);
        if !self.toggleable {
            return;
        }

        let mut toggle = RollToggle {
            item: base.item.clone(),
            label: base.label.clone(),
            domain: self.domain.clone(),
            option: self.option.clone(),
            checked: self.value,
            enabled: true,
        };
        if let Some(disabled_if) = &self.disabled_if {
            toggle.enabled = !disabled_if.test(&pass.options.option_set(&[self.domain.as_str()]));
            // A forced value only shows on the toggle; the record drops the
            // option when it is forced off.
            if let (false, DisabledValue::Value(forced)) = (toggle.enabled, self.disabled_value) {
                toggle.checked = forced;
                if !forced {
                    pass.options.remove(&self.domain, &self.option);
                }
            }
        }
        pass.toggles.push(toggle);
    }

    fn before_roll(
        &self,
        base: &RuleBase,
        domains: &[&str],
        roll_options: &mut Vec<String>,
        actor_options: &RollOptionRegistry,
    ) {
        if !domains.contains(&self.domain.as_str()) || !base.test(&actor_options.option_set(&[])) {
            return;
        }
        if self.value {
            if !roll_options.contains(&self.option) {
                roll_options.push(self.option.clone());
            }
        } else {
            roll_options.retain(|option| option != &self.option);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorDetails, ActorSource, ItemData, ItemSource};
    use crate::options::PredicateStatement;
    use crate::rules::{DiagnosticSink, RuleRegistry, Synthetics};

    struct Fixture {
        options: RollOptionRegistry,
        synthetics: Synthetics,
        toggles: Vec<RollToggle>,
        diagnostics: DiagnosticSink,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                options: RollOptionRegistry::new(),
                synthetics: Synthetics::default(),
                toggles: Vec::new(),
                diagnostics: DiagnosticSink::default(),
            }
        }

        fn apply(&mut self, source: &RuleElementSource) -> Result<(), ValidationError> {
            let mut actor = ActorSource::new("a1", "Amiri", ActorDetails::Loot);
            actor.level = 4;
            let item = ItemSource::new("item1", "Effect: Rage", ItemData::Feat);
            let scope = InjectionScope::new(&actor, &item);
            let rule = RuleRegistry::standard().instantiate(source, &scope, 0)?;
            let mut pass = RulePass {
                options: &mut self.options,
                synthetics: &mut self.synthetics,
                toggles: &mut self.toggles,
                diagnostics: &mut self.diagnostics,
            };
            rule.apply_roll_options(&mut pass);
            Ok(())
        }
    }

    #[test]
    fn sets_flag_with_resolved_option() {
        let mut fixture = Fixture::new();
        fixture
            .apply(&RuleElementSource::roll_option("all", "self:{item|slug}:{actor|level}"))
            .unwrap();
        assert!(fixture.options.is_set("all", "self:effect-rage:4"));
        assert!(fixture.toggles.is_empty());
    }

    #[test]
    fn counted_options_increment() {
        let mut fixture = Fixture::new();
        let mut source = RuleElementSource::roll_option("damage", "doubling");
        source.count = Some(true);
        fixture.apply(&source).unwrap();
        fixture.apply(&source).unwrap();
        assert_eq!(fixture.options.count_of("damage", "doubling"), Some(2));
        assert!(!fixture.options.is_set("damage", "doubling:1"));
    }

    #[test]
    fn toggle_defaults_to_unchecked() {
        let mut fixture = Fixture::new();
        let mut source = RuleElementSource::roll_option("all", "raise-a-shield");
        source.toggleable = Some(true);
        fixture.apply(&source).unwrap();

        assert_eq!(fixture.options.value("all", "raise-a-shield"), Some(false));
        assert_eq!(fixture.toggles.len(), 1);
        assert!(!fixture.toggles[0].checked);
        assert!(fixture.toggles[0].enabled);
        assert_eq!(fixture.toggles[0].label, "Effect: Rage");
    }

    #[test]
    fn disabled_toggle_forces_value() {
        let mut fixture = Fixture::new();
        fixture.options.set("all", "self:condition:unconscious", true);
        let mut source = RuleElementSource::roll_option("all", "rage").toggleable(true);
        source.disabled_if = Some(Predicate::all_of(["self:condition:unconscious"]));
        fixture.apply(&source).unwrap();

        assert!(!fixture.toggles[0].enabled);
        assert!(!fixture.toggles[0].checked);
        assert_eq!(fixture.options.value("all", "rage"), None);
    }

    #[test]
    fn disabled_toggle_forced_on_keeps_the_resolved_value() {
        let mut fixture = Fixture::new();
        fixture.options.set("all", "self:condition:unconscious", true);
        let mut source = RuleElementSource::roll_option("all", "rage").toggleable(true);
        source.disabled_if = Some(Predicate::all_of(["self:condition:unconscious"]));
        source.disabled_value = Some(DisabledValue::Value(true));
        fixture.apply(&source).unwrap();

        assert!(!fixture.toggles[0].enabled);
        assert!(fixture.toggles[0].checked);
        assert_eq!(fixture.options.value("all", "rage"), Some(false));
    }

    #[test]
    fn failing_predicate_sets_nothing() {
        let mut fixture = Fixture::new();
        let source = RuleElementSource::roll_option("all", "flanking")
            .with_predicate(Predicate::all_of(["self:participant:own-turn"]));
        fixture.apply(&source).unwrap();
        assert_eq!(fixture.options.value("all", "flanking"), None);
    }

    #[test]
    fn validation_failures() {
        let mut fixture = Fixture::new();
        assert!(fixture.apply(&RuleElementSource::roll_option("Saving Throw", "x")).is_err());
        assert!(fixture.apply(&RuleElementSource::roll_option("123", "x")).is_err());
        assert!(fixture.apply(&RuleElementSource::roll_option("all", "!!")).is_err());

        let mut counted_toggle = RuleElementSource::roll_option("all", "x").toggleable(false);
        counted_toggle.count = Some(true);
        assert!(fixture.apply(&counted_toggle).is_err());

        let mut orphan_disable = RuleElementSource::roll_option("all", "x");
        orphan_disable.disabled_if = Some(Predicate::new(vec![PredicateStatement::atom("y")]));
        assert!(fixture.apply(&orphan_disable).is_err());
    }

    #[test]
    fn before_roll_adds_and_removes() {
        let actor = ActorSource::new("a1", "Amiri", ActorDetails::Loot);
        let item = ItemSource::new("item1", "Rage", ItemData::Feat);
        let scope = InjectionScope::new(&actor, &item);
        let registry = RuleRegistry::standard();
        let on = registry
            .instantiate(&RuleElementSource::roll_option("attack", "raging"), &scope, 0)
            .unwrap();
        let off = registry
            .instantiate(
                &RuleElementSource::roll_option("attack", "raging").toggleable(false),
                &scope,
                1,
            )
            .unwrap();

        let actor_options = RollOptionRegistry::new();
        let mut roll = vec!["all".to_owned()];
        on.before_roll(&["attack", "all"], &mut roll, &actor_options);
        on.before_roll(&["attack", "all"], &mut roll, &actor_options);
        assert_eq!(roll, ["all", "raging"]);

        on.before_roll(&["damage"], &mut roll, &actor_options);
        off.before_roll(&["attack"], &mut roll, &actor_options);
        assert_eq!(roll, ["all"]);
    }
}
