//! Ephemeral entry for activating scrolls and wands with a skill.
use crate::actor::{ActorDetails, PreparedActor};
use crate::stats::{Ability, CheckConfig, DcConfig, Skill, Statistic, StatisticData};

use super::error::SpellcastingError;
use super::types::Tradition;

/// Pseudo entry synthesized from a skill proficiency. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrickMagicItemEntry {
    pub skill: Skill,
    pub tradition: Tradition,
    pub ability: Ability,
    pub statistic: Statistic,
}

impl TrickMagicItemEntry {
    /// Builds the entry for `skill` (arcana, nature, occultism or religion).
    ///
    /// The ability is the best of Int, Wis and Cha; the rank is the skill's.
    pub fn new(actor: &PreparedActor, skill: Skill) -> Result<Self, SpellcastingError> {
        let ActorDetails::Character(details) = &actor.source.details else {
            return Err(SpellcastingError::TrickRequiresCharacter);
        };
        let tradition = skill
            .tradition()
            .ok_or(SpellcastingError::InvalidTrickSkill(skill))?;

        let abilities = &actor.source.abilities;
        let ability = abilities
            .best_of(&[Ability::Int, Ability::Wis, Ability::Cha])
            .unwrap_or(Ability::Int);

        let data = StatisticData::ranked(
            format!("trick-{tradition}"),
            tradition.as_ref(),
            ability,
            abilities.modifier(ability),
            details.skill_rank(skill),
            actor.source.level,
        )
        .with_domains([format!("{ability}-based"), "all".to_owned(), "spell-attack-dc".to_owned()])
        .with_check(CheckConfig {
            domains: super::prepared::attack_selectors(tradition),
            modifiers: Vec::new(),
        })
        .with_dc(DcConfig {
            domains: super::prepared::dc_selectors(tradition),
            ..DcConfig::default()
        });

        Ok(Self {
            skill,
            tradition,
            ability,
            statistic: Statistic::build(data, &actor.options, &actor.synthetics),
        })
    }

    /// `trick-<skill>`
    pub fn id(&self) -> String {
        format!("trick-{}", self.skill)
    }
}
