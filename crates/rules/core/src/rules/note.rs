//! `Note`: text attached to rolls in a selector.
use crate::stats::RollNote;

use super::{
    InjectionScope, RuleBase, RuleBehavior, RuleElementSource, RuleFailure, RuleKind, RulePass,
    ValidationError,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteRule {
    pub selectors: Vec<String>,
    pub text: String,
}

impl NoteRule {
    pub fn construct(
        source: &RuleElementSource,
        scope: &InjectionScope<'_>,
    ) -> Result<RuleKind, ValidationError> {
        if source.selector.is_empty() {
            return Err(ValidationError::field("selector", "must name at least one domain"));
        }
        let text = match source.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => scope.resolve(text)?,
            _ => return Err(ValidationError::field("text", "must be a non-empty string")),
        };
        let selectors = source
            .selector
            .iter()
            .map(|selector| scope.resolve(selector))
            .collect::<Result<_, _>>()?;
        Ok(RuleKind::Note(Self { selectors, text }))
    }
}

impl RuleBehavior for NoteRule {
    fn before_prepare_data(&self, base: &RuleBase, pass: &mut RulePass<'_>) -> Result<(), RuleFailure> {
        for selector in &self.selectors {
            pass.synthetics.add_note(RollNote {
                selector: selector.clone(),
                text: self.text.clone(),
                predicate: base.predicate.clone(),
                source: Some(base.item.clone()),
            });
        }
        Ok(())
    }
}
