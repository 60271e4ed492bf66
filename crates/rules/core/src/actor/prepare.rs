//! The data-preparation pass.
//!
//! A pass rebuilds every piece of derived state from the persisted source and
//! the [`PrepareContext`]; nothing from a previous pass is reused.
use crate::context::PrepareContext;
use crate::effects::effect_roll_option;
use crate::options::{ALL_DOMAIN, RollOptionRegistry};
use crate::rules::{Diagnostic, DiagnosticSink, InjectionScope, RuleElement, RulePass, RuleRegistry, Synthetics};
use crate::spellcasting::SpellcastingCollection;
use crate::stats::ProficiencyRank;

use super::derived::{derive_statistics, tiebreak_priority};
use super::item::ItemData;
use super::prepared::{EffectState, PreparedActor};
use super::source::{ActorDetails, ActorSource};

/// Runs preparation passes with a fixed rule element registry.
#[derive(Debug)]
pub struct ActorPreparer {
    registry: RuleRegistry,
}

impl ActorPreparer {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Prepares `source`. Validation problems go to `diagnostics`; the caller
    /// flushes it once the pass is over.
    pub fn prepare(
        &self,
        source: &ActorSource,
        ctx: &PrepareContext<'_>,
        diagnostics: &mut DiagnosticSink,
    ) -> PreparedActor {
        let mut source = source.clone();
        let class_options = apply_class_features(&mut source);
        let effects = effect_states(&source, ctx);

        // Phase 0: seed options
        let mut options = RollOptionRegistry::with_all(source.roll_options.clone());
        options.set(ALL_DOMAIN, format!("self:type:{}", source.kind()), true);
        for trait_slug in &source.traits {
            options.set(ALL_DOMAIN, format!("self:trait:{trait_slug}"), true);
        }
        for option in class_options {
            options.set(ALL_DOMAIN, option, true);
        }
        for effect in effects.iter().filter(|e| !e.remaining.expired) {
            options.set(ALL_DOMAIN, effect_roll_option(&effect.slug), true);
        }
        if let Some(combat) = ctx.combat.filter(|c| c.active) {
            for (option, value) in combat.participant_options(&source.id) {
                options.set(ALL_DOMAIN, option, value);
            }
        }

        // Phase 1: collection
        let rules = self.collect_rules(&source, &effects, diagnostics);

        // Phases 2 and 3: roll options, then synthetics
        let mut synthetics = Synthetics::default();
        let mut toggles = Vec::new();
        {
            let mut pass = RulePass {
                options: &mut options,
                synthetics: &mut synthetics,
                toggles: &mut toggles,
                diagnostics,
            };
            for rule in &rules {
                rule.apply_roll_options(&mut pass);
            }
            for rule in &rules {
                if let Err(failure) = rule.before_prepare_data(&mut pass) {
                    pass.diagnostics.report(Diagnostic::for_rule(
                        &rule.base.item,
                        &rule.base.key,
                        failure.to_string(),
                    ));
                }
            }
        }

        // Phase 4: derived data
        let statistics = derive_statistics(&source, &options, &synthetics);
        let spellcasting = if source.kind().is_creature() {
            SpellcastingCollection::prepare(&source, &options, &synthetics)
        } else {
            SpellcastingCollection::default()
        };
        let auras = effects
            .iter()
            .filter(|e| e.from_aura)
            .map(|e| e.item.clone())
            .collect();
        let initiative_tiebreak = tiebreak_priority(&source);

        PreparedActor {
            source,
            options,
            rules,
            synthetics,
            toggles,
            statistics,
            spellcasting,
            effects,
            auras,
            initiative_tiebreak,
        }
    }

    /// Instantiates the rule elements of every item, sorted by priority.
    /// Expired effects contribute nothing.
    fn collect_rules(
        &self,
        source: &ActorSource,
        effects: &[EffectState],
        diagnostics: &mut DiagnosticSink,
    ) -> Vec<RuleElement> {
        let mut rules = Vec::new();
        for item in &source.items {
            let expired = effects
                .iter()
                .any(|e| e.item == item.id && e.remaining.expired);
            if expired {
                continue;
            }
            let scope = InjectionScope::new(source, item);
            for (index, rule) in item.rules.iter().enumerate() {
                if rule.ignored {
                    continue;
                }
                match self.registry.instantiate(rule, &scope, index) {
                    Ok(element) => rules.push(element),
                    Err(error) => {
                        diagnostics.report(Diagnostic::for_rule(&item.id, &rule.key, error.to_string()))
                    }
                }
            }
        }
        rules.sort_by_key(RuleElement::priority);
        rules
    }
}

impl Default for ActorPreparer {
    fn default() -> Self {
        Self::new(RuleRegistry::standard())
    }
}

/// Raises character proficiencies to their class's values.
///
/// Returns the `class:<slug>` options to set.
fn apply_class_features(source: &mut ActorSource) -> Vec<String> {
    let classes: Vec<_> = source
        .items
        .iter()
        .filter_map(|item| match &item.data {
            ItemData::Class(class) => Some((item.slug(), class.clone())),
            _ => None,
        })
        .collect();
    let ActorDetails::Character(details) = &mut source.details else {
        return Vec::new();
    };

    let mut options = Vec::with_capacity(classes.len());
    for (slug, class) in classes {
        details.perception = details.perception.max(class.perception);
        details.class_dc = details.class_dc.max(class.class_dc);
        details.defense = details.defense.max(class.defense);
        for (save, rank) in class.saves {
            let current = details.saves.entry(save).or_default();
            *current = (*current).max(rank);
        }
        for skill in class.trained_skills {
            let current = details.skills.entry(skill).or_default();
            *current = (*current).max(ProficiencyRank::Trained);
        }
        if details.key_ability.is_none() {
            details.key_ability = class.key_ability;
        }
        options.push(format!("class:{slug}"));
    }
    options
}

fn effect_states(source: &ActorSource, ctx: &PrepareContext<'_>) -> Vec<EffectState> {
    source
        .items
        .iter()
        .filter_map(|item| {
            let effect = item.as_effect()?;
            Some(EffectState {
                item: item.id.clone(),
                slug: item.slug(),
                remaining: effect.remaining_duration(ctx.world_time, ctx.combat),
                from_aura: effect.from_aura,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{CharacterDetails, ClassSource, ItemSource};
    use crate::config::RulesConfig;
    use crate::effects::{DurationUnit, EffectDuration, EffectSource, EffectStart};
    use crate::rules::RuleElementSource;
    use crate::stats::Save;

    fn fighter() -> ActorSource {
        let mut source = ActorSource::new(
            "a1",
            "Valeros",
            ActorDetails::Character(CharacterDetails::default()),
        );
        source.traits.push("human".to_owned());
        let mut class = ClassSource {
            perception: ProficiencyRank::Expert,
            ..ClassSource::default()
        };
        class.saves.insert(Save::Fortitude, ProficiencyRank::Expert);
        source
            .items
            .push(ItemSource::new("cls", "Fighter", ItemData::Class(class)));
        source
    }

    fn prepare(source: &ActorSource, world_time: i64) -> (PreparedActor, DiagnosticSink) {
        let settings = RulesConfig::default();
        let ctx = PrepareContext::new(&settings).at(world_time);
        let mut sink = DiagnosticSink::default();
        let actor = ActorPreparer::default().prepare(source, &ctx, &mut sink);
        (actor, sink)
    }

    #[test]
    fn seeds_type_trait_and_class_options() {
        let (actor, _) = prepare(&fighter(), 0);
        let options = actor.roll_options(&[]);
        assert!(options.contains(&"self:type:character".to_owned()));
        assert!(options.contains(&"self:trait:human".to_owned()));
        assert!(options.contains(&"class:fighter".to_owned()));
        let ActorDetails::Character(details) = &actor.source.details else {
            panic!("character expected");
        };
        assert_eq!(details.perception, ProficiencyRank::Expert);
        assert_eq!(details.save_rank(Save::Fortitude), ProficiencyRank::Expert);
    }

    #[test]
    fn expired_effects_contribute_nothing() {
        let mut source = fighter();
        let effect = EffectSource::new(
            EffectDuration::new(1, DurationUnit::Minutes),
            EffectStart::default(),
        );
        source.items.push(
            ItemSource::new("e1", "Effect: Heroism", ItemData::Effect(effect))
                .with_slug("effect-heroism")
                .with_rules(vec![RuleElementSource::flat_modifier("all", 1)]),
        );

        let (active, _) = prepare(&source, 30);
        assert!(active.options.is_set(ALL_DOMAIN, "self:effect:heroism"));
        assert_eq!(active.statistic("will").map(|s| s.total()), Some(1));

        let (expired, _) = prepare(&source, 61);
        assert!(!expired.options.is_set(ALL_DOMAIN, "self:effect:heroism"));
        assert_eq!(expired.statistic("will").map(|s| s.total()), Some(0));
        assert!(expired.rules.is_empty());
    }

    #[test]
    fn invalid_rules_are_reported_once() {
        let mut source = fighter();
        source.items.push(
            ItemSource::new("f1", "Odd Feat", ItemData::Feat).with_rules(vec![
                RuleElementSource::new("Mystery"),
                RuleElementSource::new("Mystery"),
                RuleElementSource::roll_option("all", "odd"),
            ]),
        );
        let (actor, mut sink) = prepare(&source, 0);
        assert_eq!(actor.rules.len(), 1);
        let report = sink.flush();
        assert_eq!(report.diagnostics.len(), 1);
        assert!(actor.options.is_set(ALL_DOMAIN, "odd"));
    }
}
