//! Effect durations and remaining-time computation.
use strum::{AsRefStr, Display, EnumString};

use crate::encounter::Encounter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DurationUnit {
    Rounds,
    Minutes,
    Hours,
    Days,
    /// Ends with the encounter. Never time-tracked.
    Encounter,
    Unlimited,
}

impl DurationUnit {
    /// Seconds per unit for time-tracked units.
    pub const fn seconds(self) -> Option<i64> {
        match self {
            Self::Rounds => Some(6),
            Self::Minutes => Some(60),
            Self::Hours => Some(3600),
            Self::Days => Some(86400),
            Self::Encounter | Self::Unlimited => None,
        }
    }

    pub const fn is_time_tracked(self) -> bool {
        self.seconds().is_some()
    }
}

/// Point of a turn at which a timed effect ends.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ExpiryTiming {
    #[default]
    TurnStart,
    TurnEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDuration {
    pub value: i64,
    pub unit: DurationUnit,
    #[cfg_attr(feature = "serde", serde(default))]
    pub expiry: Option<ExpiryTiming>,
}

impl EffectDuration {
    pub const fn new(value: i64, unit: DurationUnit) -> Self {
        Self {
            value,
            unit,
            expiry: None,
        }
    }

    pub const fn unlimited() -> Self {
        Self::new(-1, DurationUnit::Unlimited)
    }

    pub const fn encounter() -> Self {
        Self::new(-1, DurationUnit::Encounter)
    }

    #[must_use]
    pub const fn expiring(mut self, expiry: ExpiryTiming) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Expiry timing: none for event-driven units, turn start by default.
    pub fn timing(&self) -> Option<ExpiryTiming> {
        self.unit
            .is_time_tracked()
            .then(|| self.expiry.unwrap_or_default())
    }

    /// Length in seconds. A length past the range of `i64` never runs out.
    pub fn total(&self) -> Remaining {
        self.unit
            .seconds()
            .and_then(|seconds| self.value.checked_mul(seconds))
            .map_or(Remaining::Infinite, Remaining::Finite)
    }
}

impl Default for EffectDuration {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// World time and initiative when the effect was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectStart {
    pub value: i64,
    pub initiative: Option<i32>,
}

/// Payload of an effect item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectSource {
    pub duration: EffectDuration,
    pub start: EffectStart,
    /// Persisted flag; authoritative only for encounter-length effects.
    pub expired: bool,
    pub from_aura: bool,
}

/// Seconds left, ordered so that `Infinite` sorts last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Remaining {
    Finite(i64),
    Infinite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemainingDuration {
    pub expired: bool,
    pub remaining: Remaining,
}

impl EffectSource {
    pub fn new(duration: EffectDuration, start: EffectStart) -> Self {
        Self {
            duration,
            start,
            ..Self::default()
        }
    }

    /// World time at which a time-tracked effect runs out, if it is reachable.
    pub fn end_time(&self) -> Option<i64> {
        match self.duration.total() {
            Remaining::Finite(total) => self.start.value.checked_add(total),
            Remaining::Infinite => None,
        }
    }

    /// Remaining time at `world_time`.
    ///
    /// At exactly zero remaining during an active turn, the current
    /// combatant's initiative decides: on the effect's own initiative it has
    /// expired unless it lasts to the end of the turn; otherwise it has
    /// expired once initiative passed below the start initiative.
    pub fn remaining_duration(&self, world_time: i64, combat: Option<&Encounter>) -> RemainingDuration {
        if self.duration.unit == DurationUnit::Encounter {
            return RemainingDuration {
                expired: self.expired,
                remaining: if self.expired {
                    Remaining::Finite(0)
                } else {
                    Remaining::Infinite
                },
            };
        }
        let Some(end) = self.end_time() else {
            return RemainingDuration {
                expired: false,
                remaining: Remaining::Infinite,
            };
        };

        let remaining = end.saturating_sub(world_time);
        let mut expired = remaining <= 0;
        if remaining == 0 {
            if let Some(current) = combat.filter(|c| c.active).and_then(Encounter::current) {
                let initiative = current.initiative.unwrap_or(0);
                let start = self.start.initiative;
                expired = if Some(initiative) == start {
                    self.duration.timing() != Some(ExpiryTiming::TurnEnd)
                } else {
                    initiative < start.unwrap_or(0)
                };
            }
        }
        RemainingDuration {
            expired,
            remaining: Remaining::Finite(remaining),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::Combatant;

    fn rounds(value: i64, initiative: Option<i32>) -> EffectSource {
        EffectSource::new(
            EffectDuration::new(value, DurationUnit::Rounds),
            EffectStart {
                value: 100,
                initiative,
            },
        )
    }

    fn combat_on(initiative: i32) -> Encounter {
        let mut encounter = Encounter::new(vec![
            Combatant::new("c1", "a1").with_initiative(initiative),
        ]);
        encounter.start();
        encounter
    }

    #[test]
    fn units_convert_to_seconds() {
        let effect = rounds(2, None);
        assert_eq!(effect.end_time(), Some(112));
        assert_eq!(
            effect.remaining_duration(106, None),
            RemainingDuration {
                expired: false,
                remaining: Remaining::Finite(6)
            }
        );
        assert!(effect.remaining_duration(113, None).expired);
        assert_eq!(EffectDuration::new(1, DurationUnit::Days).total(), Remaining::Finite(86400));
    }

    #[test]
    fn overlong_durations_never_expire() {
        let ages = EffectDuration::new(i64::MAX / 1000, DurationUnit::Days);
        assert_eq!(ages.total(), Remaining::Infinite);

        let late = EffectSource::new(
            EffectDuration::new(1, DurationUnit::Days),
            EffectStart {
                value: i64::MAX - 10,
                initiative: None,
            },
        );
        assert_eq!(late.end_time(), None);
        assert_eq!(
            late.remaining_duration(i64::MAX, None),
            RemainingDuration {
                expired: false,
                remaining: Remaining::Infinite
            }
        );
    }

    #[test]
    fn zero_remaining_out_of_combat_is_expired() {
        assert!(rounds(1, Some(15)).remaining_duration(106, None).expired);
    }

    #[test]
    fn zero_remaining_compares_initiative() {
        let effect = rounds(1, Some(15));
        assert!(!effect.remaining_duration(106, Some(&combat_on(20))).expired);
        assert!(effect.remaining_duration(106, Some(&combat_on(10))).expired);
        assert!(effect.remaining_duration(106, Some(&combat_on(15))).expired);

        let mut until_end = rounds(1, Some(15));
        until_end.duration = until_end.duration.expiring(ExpiryTiming::TurnEnd);
        assert!(!until_end.remaining_duration(106, Some(&combat_on(15))).expired);
    }

    #[test]
    fn encounter_effects_follow_the_flag() {
        let mut effect = EffectSource::new(EffectDuration::encounter(), EffectStart::default());
        assert_eq!(effect.remaining_duration(0, None).remaining, Remaining::Infinite);
        effect.expired = true;
        assert_eq!(
            effect.remaining_duration(0, None),
            RemainingDuration {
                expired: true,
                remaining: Remaining::Finite(0)
            }
        );
        assert_eq!(EffectDuration::encounter().timing(), None);
    }
}
