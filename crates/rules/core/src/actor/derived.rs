//! Per-kind derived statistics.
//!
//! Each actor kind has its own derivation; they all produce the same
//! [`Statistic`] shape so consumers never branch on the kind.
use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use crate::options::RollOptionRegistry;
use crate::rules::Synthetics;
use crate::stats::{Ability, AbilityScores, DcConfig, Save, Skill, Statistic, StatisticData};

use super::source::{
    ActorDetails, ActorSource, CharacterDetails, HazardDetails, NpcDetails, VehicleDetails,
};

pub const PERCEPTION: &str = "perception";
pub const ARMOR_CLASS: &str = "ac";
pub const CLASS_DC: &str = "class-dc";

type Statistics = BTreeMap<String, Statistic>;

/// Domains shared by every ability-based statistic.
fn domains(slug: &str, ability: Option<Ability>, group: Option<&str>) -> Vec<String> {
    let mut domains = vec![slug.to_owned()];
    if let Some(ability) = ability {
        domains.push(format!("{ability}-based"));
    }
    if let Some(group) = group {
        domains.push(group.to_owned());
    }
    domains.push("all".to_owned());
    domains
}

/// Wraps the statistic builder shared by every derivation.
struct Deriver<'a> {
    abilities: &'a AbilityScores,
    options: &'a RollOptionRegistry,
    synthetics: &'a Synthetics,
    statistics: Statistics,
}

impl<'a> Deriver<'a> {
    fn ability(&self, ability: Ability) -> (Ability, i32) {
        (ability, self.abilities.modifier(ability))
    }

    fn add(&mut self, data: StatisticData) {
        let statistic = Statistic::build(data, self.options, self.synthetics);
        self.statistics.insert(statistic.slug.clone(), statistic);
    }

    /// Armor class is a DC-only statistic.
    fn armor_class(ability: (Ability, i32), data: StatisticData) -> StatisticData {
        data.with_domains(domains(ARMOR_CLASS, Some(ability.0), None))
            .with_dc(DcConfig {
                domains: vec![ARMOR_CLASS.to_owned()],
                ..DcConfig::default()
            })
    }
}

pub(crate) fn derive_statistics(
    source: &ActorSource,
    options: &RollOptionRegistry,
    synthetics: &Synthetics,
) -> Statistics {
    let mut deriver = Deriver {
        abilities: &source.abilities,
        options,
        synthetics,
        statistics: Statistics::new(),
    };
    match &source.details {
        ActorDetails::Character(details) => character(&mut deriver, source.level, details),
        ActorDetails::Npc(details) => npc(&mut deriver, details),
        ActorDetails::Hazard(details) => hazard(&mut deriver, details),
        ActorDetails::Vehicle(details) => vehicle(&mut deriver, details),
        ActorDetails::Loot => {}
    }
    deriver.statistics
}

fn character(deriver: &mut Deriver<'_>, level: i32, details: &CharacterDetails) {
    let (wis, wis_mod) = deriver.ability(Ability::Wis);
    deriver.add(
        StatisticData::ranked(PERCEPTION, "Perception", wis, wis_mod, details.perception, level)
            .with_domains(domains(PERCEPTION, Some(wis), None)),
    );

    let dex = deriver.ability(Ability::Dex);
    deriver.add(Deriver::armor_class(
        dex,
        StatisticData::ranked(ARMOR_CLASS, "Armor Class", dex.0, dex.1, details.defense, level),
    ));

    for save in Save::iter() {
        let (ability, modifier) = deriver.ability(save.ability());
        deriver.add(
            StatisticData::ranked(save.as_ref(), save.to_string(), ability, modifier, details.save_rank(save), level)
                .with_domains(domains(save.as_ref(), Some(ability), Some("saving-throw"))),
        );
    }

    for skill in Skill::iter() {
        let (ability, modifier) = deriver.ability(skill.ability());
        deriver.add(
            StatisticData::ranked(skill.slug(), skill.slug(), ability, modifier, details.skill_rank(skill), level)
                .with_domains(domains(skill.slug(), Some(ability), Some("skill-check"))),
        );
    }

    if let Some(key) = details.key_ability {
        let (ability, modifier) = deriver.ability(key);
        deriver.add(
            StatisticData::ranked(CLASS_DC, "Class DC", ability, modifier, details.class_dc, level)
                .with_domains(domains("class", Some(ability), None))
                .with_dc(DcConfig {
                    domains: vec![CLASS_DC.to_owned()],
                    ..DcConfig::default()
                }),
        );
    }
}

fn npc(deriver: &mut Deriver<'_>, details: &NpcDetails) {
    let wis = deriver.ability(Ability::Wis);
    deriver.add(
        StatisticData::authored(PERCEPTION, "Perception", Some(wis), details.perception)
            .with_domains(domains(PERCEPTION, Some(wis.0), None)),
    );

    let dex = deriver.ability(Ability::Dex);
    deriver.add(Deriver::armor_class(
        dex,
        StatisticData::authored_dc(ARMOR_CLASS, "Armor Class", Some(dex), details.ac),
    ));

    for (save, value) in &details.saves {
        let ability = deriver.ability(save.ability());
        deriver.add(
            StatisticData::authored(save.as_ref(), save.to_string(), Some(ability), *value)
                .with_domains(domains(save.as_ref(), Some(ability.0), Some("saving-throw"))),
        );
    }

    for (skill, value) in &details.skills {
        let ability = deriver.ability(skill.ability());
        deriver.add(
            StatisticData::authored(skill.slug(), skill.slug(), Some(ability), *value)
                .with_domains(domains(skill.slug(), Some(ability.0), Some("skill-check"))),
        );
    }
}

/// Hazards have no ability scores; authored values are used as-is.
fn hazard(deriver: &mut Deriver<'_>, details: &HazardDetails) {
    if let Some(ac) = details.ac {
        deriver.add(
            StatisticData::authored_dc(ARMOR_CLASS, "Armor Class", None, ac)
                .with_domains(domains(ARMOR_CLASS, None, None))
                .with_dc(DcConfig {
                    domains: vec![ARMOR_CLASS.to_owned()],
                    ..DcConfig::default()
                }),
        );
    }
    if let Some(stealth) = details.stealth {
        let slug = Skill::Ste.slug();
        deriver.add(
            StatisticData::authored(slug, slug, None, stealth)
                .with_domains(domains(slug, None, Some("skill-check"))),
        );
    }
    for (save, value) in details.saves.iter().filter(|(_, value)| **value != 0) {
        deriver.add(
            StatisticData::authored(save.as_ref(), save.to_string(), None, *value)
                .with_domains(domains(save.as_ref(), None, Some("saving-throw"))),
        );
    }
}

fn vehicle(deriver: &mut Deriver<'_>, details: &VehicleDetails) {
    let save = Save::Fortitude;
    deriver.add(
        StatisticData::authored(save.as_ref(), save.to_string(), None, details.fortitude)
            .with_domains(domains(save.as_ref(), None, Some("saving-throw"))),
    );
    deriver.add(
        StatisticData::authored_dc(ARMOR_CLASS, "Armor Class", None, details.ac)
            .with_domains(domains(ARMOR_CLASS, None, None)),
    );
}

/// Initiative tie priority: player-owned creatures and hazards 2, others 1.
/// Kinds without initiative have none.
pub(crate) fn tiebreak_priority(source: &ActorSource) -> Option<i32> {
    match source.details {
        ActorDetails::Character(_) | ActorDetails::Npc(_) | ActorDetails::Hazard(_) => {
            Some(if source.player_owned { 2 } else { 1 })
        }
        ActorDetails::Vehicle(_) | ActorDetails::Loot => None,
    }
}
