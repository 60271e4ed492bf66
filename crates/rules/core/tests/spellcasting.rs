use rules_core::actor::{ActorDetails, ActorSource, CharacterDetails, FocusPool, ItemData, ItemSource};
use rules_core::spellcasting::{
    CastOptions, CastOutcome, ConsumeFailure, PreparationType, SpellCategory, SpellSource,
    SpellcastingEntrySource, SpellcastingError, Tradition, Uses, cast, recharge, refocus,
};
use rules_core::stats::{Ability, ProficiencyRank};
use rules_core::{ActorPreparer, DiagnosticSink, EntryId, ItemId, PrepareContext, PreparedActor, RulesConfig};

fn wizard() -> ActorSource {
    let mut details = CharacterDetails::default();
    details
        .traditions
        .insert(Tradition::Arcane, ProficiencyRank::Trained);
    let mut source = ActorSource::new("ezren", "Ezren", ActorDetails::Character(details));
    source.level = 5;
    source.abilities.int = 18;
    source
}

fn spell(id: &str, level: u8, category: SpellCategory, entry: &str) -> ItemSource {
    ItemSource::new(
        id,
        id,
        ItemData::Spell(
            SpellSource::new(level, category)
                .in_entry(entry)
                .with_traditions([Tradition::Arcane]),
        ),
    )
}

fn prepare(source: &ActorSource) -> PreparedActor {
    let settings = RulesConfig::default();
    let ctx = PrepareContext::new(&settings);
    ActorPreparer::default().prepare(source, &ctx, &mut DiagnosticSink::default())
}

fn cast_once(source: &mut ActorSource, entry: &str, spell: &str) -> CastOutcome {
    cast_with(source, entry, spell, CastOptions::default())
}

fn cast_with(source: &mut ActorSource, entry: &str, spell: &str, options: CastOptions) -> CastOutcome {
    let actor = prepare(source);
    let outcome = cast(&actor, &EntryId::new(entry), &ItemId::new(spell), options).unwrap();
    if let CastOutcome::Cast { changes, .. } = &outcome {
        changes.apply(source);
    }
    outcome
}

#[test]
fn prepared_fireball_expends_its_slot() {
    let mut source = wizard();
    let fireball = spell("fireball", 3, SpellCategory::Standard, "arcane");
    let entry = SpellcastingEntrySource::new("arcane", Tradition::Arcane, PreparationType::Prepared)
        .with_ability(Ability::Int)
        .with_slots(3, 2)
        .prepare_spell(&fireball, 3, 0)
        .unwrap();
    assert!(matches!(
        entry.prepare_spell(&fireball, 2, 0),
        Err(SpellcastingError::LevelTooLow { .. })
    ));
    source.spellcasting.push(entry);
    source.items.push(fireball);

    let CastOutcome::Cast { message, .. } = cast_once(&mut source, "arcane", "fireball") else {
        panic!("first cast should succeed");
    };
    let message = message.unwrap();
    assert_eq!(message.level, 3);
    // 10 + Int 4 + trained (2 + level 5)
    assert_eq!(message.dc, Some(21));

    let slot = source.spellcasting[0].slots.get(3).unwrap();
    assert!(slot.prepared[&0].expended);
    // Prepared casting marks the slot; the level counter is for spontaneous casters.
    assert_eq!(slot.value, 2);

    let outcome = cast_once(&mut source, "arcane", "fireball");
    assert!(matches!(
        outcome,
        CastOutcome::Blocked(ConsumeFailure::SlotNotFound { .. })
    ));

    recharge(&source).into_changes().apply(&mut source);
    assert!(!source.spellcasting[0].slots.get(3).unwrap().prepared[&0].expended);
}

#[test]
fn spontaneous_slots_run_out_and_recharge() {
    let mut source = wizard();
    source.spellcasting.push(
        SpellcastingEntrySource::new("sorc", Tradition::Arcane, PreparationType::Spontaneous)
            .with_ability(Ability::Int)
            .with_slots(1, 2),
    );
    source
        .items
        .push(spell("missile", 1, SpellCategory::Standard, "sorc"));

    for expected in [1, 0] {
        let outcome = cast_once(&mut source, "sorc", "missile");
        assert!(matches!(outcome, CastOutcome::Cast { .. }));
        assert_eq!(source.spellcasting[0].slots.get(1).unwrap().value, expected);
    }

    let outcome = cast_once(&mut source, "sorc", "missile");
    assert_eq!(
        outcome,
        CastOutcome::Blocked(ConsumeFailure::NotEnoughSlots {
            spell: "missile".to_owned(),
            level: 1
        })
    );
    assert_eq!(source.spellcasting[0].slots.get(1).unwrap().value, 0);

    recharge(&source).into_changes().apply(&mut source);
    assert_eq!(source.spellcasting[0].slots.get(1).unwrap().value, 2);
}

#[test]
fn empty_focus_pool_blocks_focus_spells() {
    let mut source = wizard();
    source.focus = Some(FocusPool { value: 0, max: 1 });
    source.spellcasting.push(
        SpellcastingEntrySource::new("focus", Tradition::Arcane, PreparationType::Focus)
            .with_ability(Ability::Int),
    );
    source
        .items
        .push(spell("force-bolt", 1, SpellCategory::Focus, "focus"));

    let outcome = cast_once(&mut source, "focus", "force-bolt");
    assert_eq!(outcome, CastOutcome::Blocked(ConsumeFailure::NotEnoughFocus));

    assert!(matches!(
        refocus(&source, false),
        Err(SpellcastingError::RefocusRequiresAll)
    ));
    refocus(&source, true).unwrap().unwrap().apply(&mut source);
    assert_eq!(source.focus.map(|f| f.value), Some(1));

    let CastOutcome::Cast { message, .. } = cast_once(&mut source, "focus", "force-bolt") else {
        panic!("cast with a focus point should succeed");
    };
    // Focus spells heighten to half the actor level, rounded up.
    assert_eq!(message.map(|m| m.level), Some(3));
    assert_eq!(source.focus.map(|f| f.value), Some(0));
}

#[test]
fn cantrips_never_consume() {
    let mut source = wizard();
    source.spellcasting.push(
        SpellcastingEntrySource::new("sorc", Tradition::Arcane, PreparationType::Spontaneous)
            .with_ability(Ability::Int),
    );
    source
        .items
        .push(spell("shield", 1, SpellCategory::Cantrip, "sorc"));

    let before = source.clone();
    let CastOutcome::Cast { changes, .. } = cast_once(&mut source, "sorc", "shield") else {
        panic!("cantrip should cast");
    };
    assert!(changes.is_empty());
    assert_eq!(source, before);
}

#[test]
fn casting_from_an_expended_slot_is_refused() {
    let mut source = wizard();
    let fireball = spell("fireball", 3, SpellCategory::Standard, "arcane");
    let entry = SpellcastingEntrySource::new("arcane", Tradition::Arcane, PreparationType::Prepared)
        .with_ability(Ability::Int)
        .with_slots(3, 2)
        .prepare_spell(&fireball, 3, 0)
        .unwrap()
        .prepare_spell(&fireball, 3, 1)
        .unwrap();
    source.spellcasting.push(entry);
    source.items.push(fireball);

    let first = cast_with(&mut source, "arcane", "fireball", CastOptions::default().in_slot(0));
    assert!(matches!(first, CastOutcome::Cast { .. }));

    let again = cast_with(&mut source, "arcane", "fireball", CastOptions::default().in_slot(0));
    let CastOutcome::Blocked(failure) = again else {
        panic!("an expended slot cannot be cast from");
    };
    assert_eq!(failure, ConsumeFailure::SlotExpended { spell: "fireball".to_owned() });
    assert_eq!(failure.notice_key(), "spellcasting.slot.expended");

    // Without an explicit slot the next prepared copy is used.
    assert!(matches!(cast_once(&mut source, "arcane", "fireball"), CastOutcome::Cast { .. }));
    let slot = source.spellcasting[0].slots.get(3).unwrap();
    assert!(slot.prepared.values().all(|data| data.expended));
}

#[test]
fn innate_spells_spend_their_own_uses() {
    let mut source = wizard();
    source.spellcasting.push(
        SpellcastingEntrySource::new("innate", Tradition::Arcane, PreparationType::Innate)
            .with_ability(Ability::Int),
    );
    source.items.push(ItemSource::new(
        "darkness",
        "darkness",
        ItemData::Spell(
            SpellSource::new(2, SpellCategory::Standard)
                .in_entry("innate")
                .with_uses(Uses::full(1)),
        ),
    ));
    let uses = |source: &ActorSource| {
        source
            .item(&ItemId::new("darkness"))
            .and_then(|item| item.as_spell())
            .and_then(|spell| spell.uses)
    };

    assert!(matches!(cast_once(&mut source, "innate", "darkness"), CastOutcome::Cast { .. }));
    assert_eq!(uses(&source), Some(Uses::new(0, 1)));

    let outcome = cast_once(&mut source, "innate", "darkness");
    assert_eq!(
        outcome,
        CastOutcome::Blocked(ConsumeFailure::NoUsesRemaining {
            spell: "darkness".to_owned()
        })
    );
    assert_eq!(uses(&source), Some(Uses::new(0, 1)));

    recharge(&source).into_changes().apply(&mut source);
    assert_eq!(uses(&source), Some(Uses::full(1)));
}

#[test]
fn rituals_spend_nothing() {
    let mut source = wizard();
    source.spellcasting.push(
        SpellcastingEntrySource::new("rituals", Tradition::Arcane, PreparationType::Ritual)
            .with_ability(Ability::Int),
    );
    source
        .items
        .push(spell("call-spirit", 5, SpellCategory::Ritual, "rituals"));

    let before = source.clone();
    for _ in 0..2 {
        let CastOutcome::Cast { changes, .. } = cast_once(&mut source, "rituals", "call-spirit") else {
            panic!("rituals are never blocked by resources");
        };
        assert!(changes.is_empty());
    }
    assert_eq!(source, before);
}
