//! Asynchronous abstraction for decisions a user has to make mid-operation.
//!
//! Casting a scroll or wand without a matching spellcasting entry asks the
//! actor's controller which skill to use for Trick Magic Item. Runtime users
//! plug in a [`TrickSkillProvider`] backed by a prompt, a script or a fixed
//! answer.
use async_trait::async_trait;
use rules_core::PreparedActor;
use rules_core::stats::Skill;

/// Skills Trick Magic Item can use, one per tradition.
pub const TRICK_SKILLS: [Skill; 4] = [Skill::Arc, Skill::Nat, Skill::Occ, Skill::Rel];

#[async_trait]
pub trait TrickSkillProvider: Send + Sync {
    /// Picks one of `skills` for `actor`, or `None` to cancel the cast.
    async fn choose_skill(&self, actor: &PreparedActor, skills: &[Skill]) -> Option<Skill>;
}

/// Provider that always declines. The default.
pub struct DeclineTrick;

#[async_trait]
impl TrickSkillProvider for DeclineTrick {
    async fn choose_skill(&self, _actor: &PreparedActor, _skills: &[Skill]) -> Option<Skill> {
        None
    }
}

/// Provider answering with the highest-ranked offered skill.
pub struct BestTrickSkill;

#[async_trait]
impl TrickSkillProvider for BestTrickSkill {
    async fn choose_skill(&self, actor: &PreparedActor, skills: &[Skill]) -> Option<Skill> {
        let rules_core::ActorDetails::Character(details) = &actor.source.details else {
            return None;
        };
        skills
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(index, skill)| (details.skill_rank(*skill), std::cmp::Reverse(*index)))
            .map(|(_, skill)| skill)
    }
}
