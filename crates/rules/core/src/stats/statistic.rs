//! Statistic snapshots built from authored data, synthetics and roll options.
use std::collections::BTreeSet;

use crate::config::RulesConfig;
use crate::options::RollOptionRegistry;
use crate::rules::Synthetics;

use super::abilities::{Ability, ProficiencyRank};
use super::modifiers::{Modifier, ModifierType, RollNote, apply_stacking_rules};

/// Extra domains and modifiers that only apply to the check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckConfig {
    pub domains: Vec<String>,
    pub modifiers: Vec<Modifier>,
}

/// Extra domains and modifiers that only apply to the DC, plus an optional
/// authored value that replaces `10 + total`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DcConfig {
    pub domains: Vec<String>,
    pub modifiers: Vec<Modifier>,
    pub value: Option<i32>,
}

/// Input to [`Statistic::build`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatisticData {
    pub slug: String,
    pub label: String,
    pub ability: Option<Ability>,
    pub rank: Option<ProficiencyRank>,
    pub domains: Vec<String>,
    pub modifiers: Vec<Modifier>,
    pub check: CheckConfig,
    pub dc: DcConfig,
}

impl StatisticData {
    pub fn new(slug: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            ability: None,
            rank: None,
            domains: Vec::new(),
            modifiers: Vec::new(),
            check: CheckConfig::default(),
            dc: DcConfig::default(),
        }
    }

    /// Character-style statistic: ability modifier plus proficiency.
    pub fn ranked(
        slug: impl Into<String>,
        label: impl Into<String>,
        ability: Ability,
        ability_modifier: i32,
        rank: ProficiencyRank,
        level: i32,
    ) -> Self {
        Self::new(slug, label)
            .with_ability(ability, ability_modifier)
            .with_rank(rank, level)
    }

    /// NPC-style statistic where only the final modifier was authored.
    ///
    /// The authored value is split into the ability modifier and an untyped
    /// residual so the breakdown has the same shape as a ranked statistic.
    pub fn authored(
        slug: impl Into<String>,
        label: impl Into<String>,
        ability: Option<(Ability, i32)>,
        authored: i32,
    ) -> Self {
        let mut data = Self::new(slug, label);
        let ability_modifier = match ability {
            Some((ability, modifier)) => {
                data = data.with_ability(ability, modifier);
                modifier
            }
            None => 0,
        };
        data.modifiers
            .push(Modifier::untyped("base", "Base", authored - ability_modifier));
        data
    }

    /// NPC-style DC: residual is `dc - 10 - ability`, so `10 + total == dc`.
    pub fn authored_dc(
        slug: impl Into<String>,
        label: impl Into<String>,
        ability: Option<(Ability, i32)>,
        dc: i32,
    ) -> Self {
        Self::authored(slug, label, ability, dc - RulesConfig::DC_BASE)
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Ability, modifier: i32) -> Self {
        self.ability = Some(ability);
        self.modifiers.push(Modifier::new(
            ability.as_ref(),
            ability.as_ref().to_uppercase(),
            modifier,
            ModifierType::Ability,
        ));
        self
    }

    #[must_use]
    pub fn with_rank(mut self, rank: ProficiencyRank, level: i32) -> Self {
        self.rank = Some(rank);
        self.modifiers.push(Modifier::new(
            "proficiency",
            rank.as_ref(),
            rank.modifier(level),
            ModifierType::Proficiency,
        ));
        self
    }

    #[must_use]
    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains.extend(domains.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn with_check(mut self, check: CheckConfig) -> Self {
        self.check = check;
        self
    }

    #[must_use]
    pub fn with_dc(mut self, dc: DcConfig) -> Self {
        self.dc = dc;
        self
    }
}

/// Check side of a statistic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatisticCheck {
    pub domains: Vec<String>,
    pub modifiers: Vec<Modifier>,
    pub total: i32,
    /// Roll options in effect when the check was synthesized.
    pub options: Vec<String>,
}

impl StatisticCheck {
    /// Enabled modifiers as `"Label +N"`, comma separated.
    pub fn breakdown(&self) -> String {
        breakdown(&self.modifiers)
    }
}

/// DC side of a statistic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatisticDifficultyClass {
    pub domains: Vec<String>,
    pub modifiers: Vec<Modifier>,
    pub value: i32,
}

impl StatisticDifficultyClass {
    pub fn breakdown(&self) -> String {
        breakdown(&self.modifiers)
    }
}

/// A synthesized statistic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistic {
    pub slug: String,
    pub label: String,
    pub ability: Option<Ability>,
    pub rank: Option<ProficiencyRank>,
    pub domains: Vec<String>,
    pub check: StatisticCheck,
    pub dc: StatisticDifficultyClass,
    pub notes: Vec<RollNote>,
}

impl Statistic {
    /// Builds the statistic. Pure: identical inputs give identical output.
    pub fn build(data: StatisticData, options: &RollOptionRegistry, synthetics: &Synthetics) -> Self {
        let StatisticData {
            slug,
            label,
            ability,
            rank,
            domains,
            modifiers,
            check,
            dc,
        } = data;

        let check_domains = merge_domains(&domains, &check.domains);
        let check = synthesize(&modifiers, check.modifiers, &check_domains, options, synthetics);

        let dc_domains = merge_domains(&domains, &dc.domains);
        let dc_part = synthesize(&modifiers, dc.modifiers, &dc_domains, options, synthetics);

        let note_options = options.option_set(&as_strs(&check_domains));
        let notes = synthetics
            .notes_for(&as_strs(&domains))
            .into_iter()
            .filter(|note| note.predicate.test(&note_options))
            .collect();

        Self {
            slug,
            label,
            ability,
            rank,
            domains,
            check: StatisticCheck {
                domains: check_domains,
                modifiers: check.modifiers,
                total: check.total,
                options: check.options,
            },
            dc: StatisticDifficultyClass {
                domains: dc_domains,
                modifiers: dc_part.modifiers,
                value: dc.value.unwrap_or(RulesConfig::DC_BASE + dc_part.total),
            },
            notes,
        }
    }

    /// Check modifier total.
    pub fn total(&self) -> i32 {
        self.check.total
    }

    pub fn dc_value(&self) -> i32 {
        self.dc.value
    }
}

struct Synthesized {
    modifiers: Vec<Modifier>,
    total: i32,
    options: Vec<String>,
}

fn synthesize(
    base: &[Modifier],
    extra: Vec<Modifier>,
    domains: &[String],
    options: &RollOptionRegistry,
    synthetics: &Synthetics,
) -> Synthesized {
    let domain_refs = as_strs(domains);
    let mut seen = BTreeSet::new();
    let mut modifiers: Vec<Modifier> = base
        .iter()
        .cloned()
        .chain(extra)
        .chain(synthetics.modifiers_for(&domain_refs))
        .filter(|modifier| seen.insert(modifier.slug.clone()))
        .collect();
    let option_set = options.option_set(&domain_refs);
    let total = apply_stacking_rules(&mut modifiers, &option_set);
    Synthesized {
        modifiers,
        total,
        options: option_set.into_iter().collect(),
    }
}

fn merge_domains(base: &[String], extra: &[String]) -> Vec<String> {
    let mut merged = base.to_vec();
    for domain in extra {
        if !merged.contains(domain) {
            merged.push(domain.clone());
        }
    }
    merged
}

fn as_strs(domains: &[String]) -> Vec<&str> {
    domains.iter().map(String::as_str).collect()
}

fn breakdown(modifiers: &[Modifier]) -> String {
    modifiers
        .iter()
        .filter(|modifier| modifier.enabled)
        .map(Modifier::signed_label)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Predicate, PredicateStatement};

    fn empty() -> (RollOptionRegistry, Synthetics) {
        (RollOptionRegistry::new(), Synthetics::default())
    }

    #[test]
    fn ranked_statistic_totals_and_dc() {
        let (options, synthetics) = empty();
        let data = StatisticData::ranked("will", "Will", Ability::Wis, 3, ProficiencyRank::Expert, 5)
            .with_domains(["will", "saving-throw", "all"]);
        let statistic = Statistic::build(data, &options, &synthetics);

        assert_eq!(statistic.total(), 3 + 9);
        assert_eq!(statistic.dc_value(), 22);
        assert_eq!(statistic.check.breakdown(), "WIS +3, expert +9");
    }

    #[test]
    fn dc_override_wins() {
        let (options, synthetics) = empty();
        let data = StatisticData::new("class-dc", "Class DC").with_dc(DcConfig {
            value: Some(30),
            ..DcConfig::default()
        });
        assert_eq!(Statistic::build(data, &options, &synthetics).dc_value(), 30);
    }

    #[test]
    fn authored_values_round_trip_through_breakdown() {
        let (options, synthetics) = empty();
        let check = StatisticData::authored("perception", "Perception", Some((Ability::Wis, 2)), 11);
        let check = Statistic::build(check, &options, &synthetics);
        assert_eq!(check.total(), 11);
        assert_eq!(check.check.modifiers.len(), 2);

        let dc = StatisticData::authored_dc("spell-dc", "Spell DC", Some((Ability::Cha, 4)), 25);
        let dc = Statistic::build(dc, &options, &synthetics);
        assert_eq!(dc.dc_value(), 25);
        assert_eq!(dc.check.modifiers[1].value, 11);
    }

    #[test]
    fn synthetic_modifiers_join_by_domain() {
        let mut synthetics = Synthetics::default();
        synthetics.add_modifier("saving-throw", Modifier::new("bless", "Bless", 1, ModifierType::Status));
        synthetics.add_modifier("attack", Modifier::new("flank", "Flank", 2, ModifierType::Circumstance));
        synthetics.add_modifier(
            "fortitude",
            Modifier::new("rage", "Rage", 2, ModifierType::Status)
                .with_predicate(Predicate::new(vec![PredicateStatement::atom("rage")])),
        );

        let data = StatisticData::new("fortitude", "Fortitude").with_domains(["fortitude", "saving-throw"]);
        let statistic = Statistic::build(data, &RollOptionRegistry::new(), &synthetics);
        assert_eq!(statistic.total(), 1);
        assert_eq!(statistic.check.modifiers.len(), 2);

        let mut options = RollOptionRegistry::new();
        options.set("all", "rage", true);
        let data = StatisticData::new("fortitude", "Fortitude").with_domains(["fortitude", "saving-throw"]);
        assert_eq!(Statistic::build(data, &options, &synthetics).total(), 2);
    }

    #[test]
    fn duplicate_slugs_count_once() {
        let mut synthetics = Synthetics::default();
        let modifier = Modifier::untyped("feat-bonus", "Feat", 1);
        synthetics.add_modifier("reflex", modifier.clone());
        synthetics.add_modifier("saving-throw", modifier);

        let data = StatisticData::new("reflex", "Reflex").with_domains(["reflex", "saving-throw"]);
        assert_eq!(Statistic::build(data, &RollOptionRegistry::new(), &synthetics).total(), 1);
    }
}
