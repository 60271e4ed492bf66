//! Turn order comparator.
use std::cmp::{Ordering, Reverse};

use super::combatant::Combatant;

/// Orders combatants by descending initiative.
///
/// Combatants that have not rolled go last. Equal rolled initiatives fall
/// back to the tie priority (lower first), and combatant id settles the
/// rest, which makes the order total.
pub fn compare_combatants(a: &Combatant, b: &Combatant) -> Ordering {
    let rank = |c: &Combatant| (c.initiative.is_none(), Reverse(c.initiative));
    rank(a).cmp(&rank(b)).then_with(|| {
        match (a.initiative, b.initiative) {
            (Some(_), Some(_)) => a.tie_priority().cmp(&b.tie_priority()),
            _ => Ordering::Equal,
        }
        .then_with(|| a.id.cmp(&b.id))
    })
}

/// The combatant that acts first, or `None` when both are the same slot.
pub fn higher_initiative<'a>(a: &'a Combatant, b: &'a Combatant) -> Option<&'a Combatant> {
    match compare_combatants(a, b) {
        Ordering::Less => Some(a),
        Ordering::Greater => Some(b),
        Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;

    #[test]
    fn higher_initiative_goes_first() {
        let a = Combatant::new("a", "x").with_initiative(12);
        let b = Combatant::new("b", "y").with_initiative(20);
        assert_eq!(compare_combatants(&a, &b), Ordering::Greater);
        assert_eq!(higher_initiative(&a, &b).map(|c| c.id.as_str()), Some("b"));
    }

    #[test]
    fn ties_use_priority_then_id() {
        let pc = Combatant::new("z", "pc").with_initiative(15).with_tiebreak(2);
        let npc = Combatant::new("a", "npc").with_initiative(15).with_tiebreak(1);
        assert_eq!(higher_initiative(&pc, &npc).map(|c| c.id.as_str()), Some("a"));

        let plain = Combatant::new("b", "v").with_initiative(15);
        assert_eq!(plain.tie_priority(), RulesConfig::DEFAULT_TIEBREAK_PRIORITY);
        assert_eq!(compare_combatants(&pc, &plain), Ordering::Less);

        let same = Combatant::new("c", "w").with_initiative(15).with_tiebreak(2);
        assert_eq!(compare_combatants(&pc, &same), Ordering::Greater);
    }

    #[test]
    fn override_priority_wins_for_its_initiative() {
        let a = Combatant::new("a", "x")
            .with_initiative(15)
            .with_tiebreak(1)
            .with_override(15, 5);
        let b = Combatant::new("b", "y").with_initiative(15).with_tiebreak(2);
        assert_eq!(higher_initiative(&a, &b).map(|c| c.id.as_str()), Some("b"));
    }

    #[test]
    fn unrolled_combatants_sort_last() {
        let rolled = Combatant::new("b", "x").with_initiative(-5);
        let unrolled = Combatant::new("a", "y");
        assert_eq!(compare_combatants(&rolled, &unrolled), Ordering::Less);
        assert_eq!(higher_initiative(&rolled, &rolled), None);
    }
}
