//! Users and the primary-updater election.
//!
//! Several clients observe the same event; only one of them may write the
//! resulting update. Every client computes the same election from the same
//! user list, so exactly one performs the write.
use crate::actor::ActorSource;
use crate::ids::{ActorId, UserId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserInfo {
    pub id: UserId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub active: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_gm: bool,
    /// Actor assigned to this user as their character.
    #[cfg_attr(feature = "serde", serde(default))]
    pub character: Option<ActorId>,
}

impl UserInfo {
    pub fn player(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            active: true,
            is_gm: false,
            character: None,
        }
    }

    pub fn gm(id: impl Into<UserId>) -> Self {
        Self {
            is_gm: true,
            ..Self::player(id)
        }
    }

    #[must_use]
    pub fn with_character(mut self, actor: impl Into<ActorId>) -> Self {
        self.character = Some(actor.into());
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// GMs may update anything; players only the actors they own.
    pub fn can_update(&self, actor: &ActorSource) -> bool {
        self.is_gm || actor.owners.contains(&self.id)
    }
}

/// The single user that should write updates for `actor`.
///
/// The first active GM by id, else the active user whose character is the
/// actor, else the first active user by id permitted to update it.
pub fn primary_updater<'a>(actor: &ActorSource, users: &'a [UserInfo]) -> Option<&'a UserInfo> {
    let mut active: Vec<&UserInfo> = users.iter().filter(|u| u.active).collect();
    active.sort_by(|a, b| a.id.cmp(&b.id));

    if let Some(gm) = active.iter().copied().find(|u| u.is_gm) {
        return Some(gm);
    }
    if let Some(assigned) = active
        .iter()
        .copied()
        .find(|u| u.character.as_ref() == Some(&actor.id))
    {
        return Some(assigned);
    }
    active.into_iter().find(|u| u.can_update(actor))
}

pub fn is_primary_updater(user: &UserId, actor: &ActorSource, users: &[UserInfo]) -> bool {
    primary_updater(actor, users).is_some_and(|u| &u.id == user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorDetails, CharacterDetails};

    fn hero() -> ActorSource {
        let mut actor = ActorSource::new(
            "hero",
            "Valeros",
            ActorDetails::Character(CharacterDetails::default()),
        );
        actor.owners = vec![UserId::new("p2"), UserId::new("p1")];
        actor
    }

    #[test]
    fn first_active_gm_wins() {
        let users = [
            UserInfo::gm("gm-b"),
            UserInfo::gm("gm-a").inactive(),
            UserInfo::gm("gm-c"),
            UserInfo::player("p1").with_character("hero"),
        ];
        assert_eq!(primary_updater(&hero(), &users).map(|u| u.id.as_str()), Some("gm-b"));
    }

    #[test]
    fn assigned_player_before_other_owners() {
        let users = [
            UserInfo::player("p1"),
            UserInfo::player("p2").with_character("hero"),
        ];
        assert_eq!(primary_updater(&hero(), &users).map(|u| u.id.as_str()), Some("p2"));
    }

    #[test]
    fn falls_back_to_first_owner_by_id() {
        let users = [
            UserInfo::player("p3"),
            UserInfo::player("p2"),
            UserInfo::player("p1").inactive(),
        ];
        assert!(is_primary_updater(&UserId::new("p2"), &hero(), &users));
        assert!(primary_updater(&hero(), &[UserInfo::player("p9")]).is_none());
    }
}
