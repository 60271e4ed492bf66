//! `FlatModifier`: a typed numeric modifier added to one or more selectors.
use std::str::FromStr;

use crate::stats::{Modifier, ModifierType};

use super::{
    InjectionScope, RuleBase, RuleBehavior, RuleElementSource, RuleFailure, RuleKind, RulePass,
    RuleValue, ValidationError,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatModifierRule {
    pub selectors: Vec<String>,
    pub slug: String,
    pub kind: ModifierType,
    /// Number, or text with injected properties already resolved.
    pub value: RuleValue,
}

impl FlatModifierRule {
    pub fn construct(
        source: &RuleElementSource,
        scope: &InjectionScope<'_>,
    ) -> Result<RuleKind, ValidationError> {
        let selectors = source
            .selector
            .iter()
            .map(|selector| scope.resolve(selector.trim()))
            .filter(|selector| !matches!(selector, Ok(s) if s.is_empty()))
            .collect::<Result<Vec<_>, _>>()?;
        if selectors.is_empty() {
            return Err(ValidationError::field("selector", "must name at least one domain"));
        }

        let kind = match source.modifier_type.as_deref() {
            None => ModifierType::Untyped,
            Some(kind) => ModifierType::from_str(kind)
                .map_err(|_| ValidationError::field("type", "must be a recognized modifier type"))?,
        };

        let value = match &source.value {
            Some(RuleValue::Number(value)) => RuleValue::Number(*value),
            Some(RuleValue::Text(text)) => RuleValue::Text(scope.resolve(text)?),
            _ => return Err(ValidationError::field("value", "must be a number or a string")),
        };

        Ok(RuleKind::FlatModifier(Self {
            selectors,
            slug: source.slug.clone().unwrap_or_else(|| scope.item.slug()),
            kind,
            value,
        }))
    }

    fn resolved_value(&self) -> Result<i32, RuleFailure> {
        match &self.value {
            RuleValue::Number(value) => Ok(*value),
            RuleValue::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| RuleFailure::NonNumericValue(text.clone())),
            RuleValue::Bool(value) => Err(RuleFailure::NonNumericValue(value.to_string())),
        }
    }
}

impl RuleBehavior for FlatModifierRule {
    fn before_prepare_data(&self, base: &RuleBase, pass: &mut RulePass<'_>) -> Result<(), RuleFailure> {
        let value = self.resolved_value()?;
        if value == 0 {
            return Ok(());
        }
        let modifier = Modifier::new(self.slug.clone(), base.label.clone(), value, self.kind)
            .with_predicate(base.predicate.clone())
            .with_source(base.item.clone());
        for selector in &self.selectors {
            pass.synthetics.add_modifier(selector.clone(), modifier.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorDetails, ActorSource, ItemData, ItemSource};
    use crate::options::RollOptionRegistry;
    use crate::rules::{DiagnosticSink, RuleElement, RuleRegistry, Synthetics};

    fn instantiate(source: &RuleElementSource) -> Result<RuleElement, ValidationError> {
        let mut actor = ActorSource::new("a1", "Valeros", ActorDetails::Loot);
        actor.level = 5;
        let item = ItemSource::new("ring", "Ring of Protection", ItemData::Equipment);
        RuleRegistry::standard().instantiate(source, &InjectionScope::new(&actor, &item), 0)
    }

    fn run(rule: &RuleElement) -> (Synthetics, Result<(), RuleFailure>) {
        let mut options = RollOptionRegistry::new();
        let mut synthetics = Synthetics::default();
        let mut toggles = Vec::new();
        let mut diagnostics = DiagnosticSink::default();
        let result = rule.before_prepare_data(&mut RulePass {
            options: &mut options,
            synthetics: &mut synthetics,
            toggles: &mut toggles,
            diagnostics: &mut diagnostics,
        });
        (synthetics, result)
    }

    #[test]
    fn adds_to_every_selector() {
        let mut source = RuleElementSource::flat_modifier("ac", 1);
        source.selector.push("reflex".to_owned());
        source.modifier_type = Some("item".to_owned());
        let rule = instantiate(&source).unwrap();
        let (synthetics, result) = run(&rule);

        assert!(result.is_ok());
        let modifiers = synthetics.modifiers_for(&["ac", "reflex"]);
        assert_eq!(modifiers.len(), 2);
        assert_eq!(modifiers[0].kind, ModifierType::Item);
        assert_eq!(modifiers[0].slug, "ring-of-protection");
        assert_eq!(modifiers[0].source.as_ref().map(|id| id.as_str()), Some("ring"));
    }

    #[test]
    fn injected_value_resolves() {
        let mut source = RuleElementSource::flat_modifier("perception", 0);
        source.value = Some(RuleValue::Text("{actor|level}".to_owned()));
        let (synthetics, _) = run(&instantiate(&source).unwrap());
        assert_eq!(synthetics.modifiers_for(&["perception"])[0].value, 5);
    }

    #[test]
    fn non_numeric_value_fails_the_callback() {
        let mut source = RuleElementSource::flat_modifier("ac", 0);
        source.value = Some(RuleValue::Text("{item|slug}".to_owned()));
        let (synthetics, result) = run(&instantiate(&source).unwrap());
        assert_eq!(
            result,
            Err(RuleFailure::NonNumericValue("ring-of-protection".to_owned()))
        );
        assert!(synthetics.is_empty());
    }

    #[test]
    fn invalid_type_or_selector_is_rejected() {
        let mut source = RuleElementSource::flat_modifier("ac", 1);
        source.modifier_type = Some("luck".to_owned());
        assert!(instantiate(&source).is_err());

        let mut source = RuleElementSource::flat_modifier("", 1);
        source.selector = vec![String::new()];
        assert!(instantiate(&source).is_err());
    }
}
