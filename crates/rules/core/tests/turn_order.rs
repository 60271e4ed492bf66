use std::collections::BTreeMap;

use rules_core::actor::{ActorDetails, ActorSource, CharacterDetails, ItemData, ItemSource, NpcDetails};
use rules_core::effects::{DurationUnit, EffectDuration, EffectSource, EffectStart, ExpiryTiming};
use rules_core::encounter::{InitiativeUpdate, compare_combatants, higher_initiative};
use rules_core::{
    ActorId, ActorPreparer, Combatant, DiagnosticSink, EffectTracker, Encounter, PrepareContext,
    RulesConfig,
};

fn tiebreak(source: &ActorSource) -> Option<i32> {
    let settings = RulesConfig::default();
    ActorPreparer::default()
        .prepare(source, &PrepareContext::new(&settings), &mut DiagnosticSink::default())
        .initiative_tiebreak
}

#[test]
fn equal_initiative_favors_the_npc() {
    let mut pc = ActorSource::new("pc", "Kyra", ActorDetails::Character(CharacterDetails::default()));
    pc.player_owned = true;
    let npc = ActorSource::new("npc", "Goblin", ActorDetails::Npc(NpcDetails::default()));

    let mut encounter = Encounter::new(vec![
        Combatant::new("a", "pc").with_initiative(15),
        Combatant::new("b", "npc").with_initiative(15),
    ]);
    // Without tiebreaks both fall back to the default priority, then to id order.
    assert_eq!(encounter.turns()[0].id.as_str(), "a");

    let tiebreaks = BTreeMap::from([
        (ActorId::new("pc"), tiebreak(&pc)),
        (ActorId::new("npc"), tiebreak(&npc)),
    ]);
    encounter.set_tiebreaks(&tiebreaks);
    let order: Vec<&str> = encounter.turns().iter().map(|c| c.actor.as_str()).collect();
    assert_eq!(order, ["npc", "pc"]);

    let [first, second] = encounter.turns() else {
        panic!("two combatants expected");
    };
    assert_eq!(higher_initiative(second, first).map(|c| c.actor.as_str()), Some("npc"));
}

#[test]
fn override_priority_reorders_without_losing_the_turn() {
    let mut encounter = Encounter::new(vec![
        Combatant::new("a", "x").with_initiative(20),
        Combatant::new("b", "y").with_initiative(12).with_tiebreak(1),
        Combatant::new("c", "z").with_initiative(8),
    ]);
    encounter.start();
    encounter.next_turn().unwrap();
    assert_eq!(encounter.current().map(|c| c.id.as_str()), Some("b"));

    encounter
        .set_initiatives(&[InitiativeUpdate::new("c", 12).with_priority(0)])
        .unwrap();
    let order: Vec<&str> = encounter.turns().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, ["a", "c", "b"]);
    assert_eq!(encounter.current().map(|c| c.id.as_str()), Some("b"));
}

#[test]
fn turn_order_is_a_strict_total_order() {
    let combatants: Vec<Combatant> = (0..12)
        .map(|i| {
            let mut combatant = Combatant::new(format!("c{i:02}"), format!("a{i}"));
            if i % 5 != 0 {
                combatant = combatant.with_initiative((i * 7 % 4) as i32 + 10);
            }
            if i % 3 == 0 {
                combatant = combatant.with_tiebreak(i % 2);
            }
            combatant
        })
        .collect();

    for a in &combatants {
        assert_eq!(compare_combatants(a, a), std::cmp::Ordering::Equal);
        for b in &combatants {
            if a.id != b.id {
                assert_ne!(compare_combatants(a, b), std::cmp::Ordering::Equal);
                assert_eq!(compare_combatants(a, b), compare_combatants(b, a).reverse());
            }
        }
    }
}

#[test]
fn very_low_rolls_still_act_before_unrolled_combatants() {
    let low_slow = Combatant::new("a", "x").with_initiative(-9999).with_tiebreak(5);
    let low_fast = Combatant::new("b", "y").with_initiative(-9999).with_tiebreak(1);
    let unrolled = Combatant::new("ab", "z");
    let all = [&low_slow, &low_fast, &unrolled];

    assert_eq!(compare_combatants(&low_fast, &low_slow), std::cmp::Ordering::Less);
    assert_eq!(compare_combatants(&low_slow, &unrolled), std::cmp::Ordering::Less);
    assert_eq!(compare_combatants(&low_fast, &unrolled), std::cmp::Ordering::Less);

    for a in all {
        for b in all {
            for c in all {
                if compare_combatants(a, b).is_lt() && compare_combatants(b, c).is_lt() {
                    assert!(compare_combatants(a, c).is_lt(), "{} < {} < {}", a.id, b.id, c.id);
                }
            }
        }
    }

    let encounter = Encounter::new(vec![unrolled.clone(), low_slow.clone(), low_fast.clone()]);
    let order: Vec<&str> = encounter.turns().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, ["b", "a", "ab"]);
}

fn effect(id: &str, value: i64, unit: DurationUnit, start: i64, initiative: Option<i32>, expiry: ExpiryTiming) -> ItemSource {
    let data = EffectSource::new(
        EffectDuration::new(value, unit).expiring(expiry),
        EffectStart {
            value: start,
            initiative,
        },
    );
    ItemSource::new(id, id, ItemData::Effect(data))
}

#[test]
fn effect_list_stays_sorted() {
    let mut tracker = EffectTracker::new();
    let actors = [ActorId::new("a"), ActorId::new("b"), ActorId::new("c")];
    let units = [DurationUnit::Rounds, DurationUnit::Minutes, DurationUnit::Unlimited];
    let mut seed: u64 = 17;
    let mut next = move |bound: u64| {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) % bound
    };

    for round in 0..60 {
        let actor = &actors[next(3) as usize];
        let id = format!("e{}", next(20));
        let unit = units[next(3) as usize];
        let expiry = if next(2) == 0 {
            ExpiryTiming::TurnStart
        } else {
            ExpiryTiming::TurnEnd
        };
        let initiative = (next(4) > 0).then(|| next(5) as i32 + 10);
        let item = effect(&id, next(4) as i64 + 1, unit, round, initiative, expiry);
        tracker.register(actor, &item, round, None);
        assert!(tracker.is_sorted(), "unsorted after registering {id}");

        if next(6) == 0 {
            tracker.unregister(actor, &item.id);
            assert!(tracker.is_sorted());
        }
        tracker.refresh(round, None);
    }
    assert!(tracker.is_sorted());
}

#[test]
fn refreshing_reports_newly_expired_actors_once() {
    let mut tracker = EffectTracker::new();
    let hero = ActorId::new("hero");
    tracker.register(&hero, &effect("bless", 1, DurationUnit::Minutes, 0, None, ExpiryTiming::TurnStart), 0, None);
    tracker.register(&hero, &effect("haste", 1, DurationUnit::Minutes, 0, None, ExpiryTiming::TurnStart), 0, None);

    assert_eq!(tracker.refresh(61, None), vec![hero.clone()]);
    assert!(tracker.refresh(62, None).is_empty());
    assert_eq!(tracker.expired(Some(&hero), 62, None).len(), 2);
}
