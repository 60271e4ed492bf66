use rules_core::actor::{ActorDetails, ActorSource, CharacterDetails, ItemData, ItemSource};
use rules_core::options::ALL_DOMAIN;
use rules_core::rules::{RuleElementSource, RuleValue, TogglePlan};
use rules_core::{
    ActorPreparer, DiagnosticSink, PrepareContext, PreparedActor, RulesConfig, ToggleRequest,
};

fn champion() -> ActorSource {
    let mut source = ActorSource::new(
        "seelah",
        "Seelah",
        ActorDetails::Character(CharacterDetails::default()),
    );
    source.traits.push("human".to_owned());
    source.items.push(
        ItemSource::new("feat-1", "Power Attack", ItemData::Feat).with_rules(vec![
            RuleElementSource::roll_option("all", "power-attack").toggleable(false),
            RuleElementSource::flat_modifier("fortitude", 2).with_predicate(
                rules_core::Predicate::all_of(["power-attack"]),
            ),
        ]),
    );
    source
}

fn prepare(source: &ActorSource) -> PreparedActor {
    let settings = RulesConfig::default();
    let ctx = PrepareContext::new(&settings).at(600);
    ActorPreparer::default().prepare(source, &ctx, &mut DiagnosticSink::default())
}

#[test]
fn preparation_is_idempotent() {
    let source = champion();
    let first = prepare(&source);
    let second = prepare(&source);
    assert_eq!(first, second);

    // Preparing the prepared source again changes nothing either.
    assert_eq!(prepare(&first.source), first);
}

#[cfg(feature = "serde")]
#[test]
fn fingerprint_is_stable_across_passes() {
    let source = champion();
    let first = hex::encode(prepare(&source).fingerprint());
    let second = hex::encode(prepare(&source).fingerprint());
    assert_eq!(first, second);
    assert_eq!(first.len(), 64);

    let mut toggled = source.clone();
    toggled.items[0].rules[0].value = Some(RuleValue::Bool(true));
    assert_ne!(hex::encode(prepare(&toggled).fingerprint()), first);
}

#[test]
fn toggling_twice_restores_the_source() {
    let original = champion();
    let mut source = original.clone();

    let actor = prepare(&source);
    assert!(!actor.options.is_set(ALL_DOMAIN, "power-attack"));
    assert_eq!(actor.toggles.len(), 1);
    assert_eq!(actor.statistic("fortitude").map(|s| s.total()), Some(0));

    let request = ToggleRequest::new("all", "power-attack");
    let plan = actor.toggle(&request).unwrap().unwrap();
    assert!(plan.value());
    assert!(matches!(plan, TogglePlan::ItemRules { .. }));
    plan.into_changes().apply(&mut source);

    let actor = prepare(&source);
    assert!(actor.options.is_set(ALL_DOMAIN, "power-attack"));
    assert_eq!(actor.statistic("fortitude").map(|s| s.total()), Some(2));

    let plan = actor
        .toggle(&ToggleRequest::new("all", "power-attack").on_item("feat-1"))
        .unwrap()
        .unwrap();
    assert!(!plan.value());
    plan.into_changes().apply(&mut source);
    assert_eq!(source, original);
}

#[test]
fn toggling_to_the_current_value_is_a_no_op() {
    let actor = prepare(&champion());
    let request = ToggleRequest::new("all", "power-attack").with_value(false);
    assert_eq!(actor.toggle(&request), Ok(None));

    let missing = ToggleRequest::new("all", "power-attack").on_item("gone");
    assert!(actor.toggle(&missing).is_err());
}

#[test]
fn flat_footed_toggles_the_actor_flag() {
    let mut source = champion();
    let actor = prepare(&source);
    let request = ToggleRequest::new("all", "target:condition:flat-footed");
    let plan = actor.toggle(&request).unwrap().unwrap();
    plan.into_changes().apply(&mut source);
    assert_eq!(
        source.roll_options.get("target:condition:flat-footed"),
        Some(&true)
    );
    assert!(prepare(&source)
        .options
        .is_set(ALL_DOMAIN, "target:condition:flat-footed"));
}
