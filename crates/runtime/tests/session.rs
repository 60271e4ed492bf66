use rules_core::actor::{
    ActorDetails, ActorSource, CharacterDetails, FocusPool, HitPoints, ItemData, ItemSource, NpcDetails,
};
use rules_core::effects::{DurationUnit, EffectDuration, EffectSource, EffectStart};
use rules_core::encounter::{Combatant, InitiativeUpdate};
use rules_core::rules::{RuleElementSource, RuleValue};
use rules_core::spellcasting::{
    CastOptions, PreparationType, SpellCategory, SpellSource, SpellcastingEntrySource, Tradition,
};
use rules_core::stats::{Ability, ProficiencyRank};
use rules_core::{ActorId, EntryId, ItemId, RulesConfig, ToggleRequest, UserInfo};
use rules_runtime::{Notification, Runtime, RuntimeError, RuntimeEvent, Topic};

fn wizard() -> ActorSource {
    let mut details = CharacterDetails::default();
    details
        .traditions
        .insert(Tradition::Arcane, ProficiencyRank::Trained);
    let mut source = ActorSource::new("ezren", "Ezren", ActorDetails::Character(details));
    source.level = 5;
    source.abilities.int = 18;
    source.focus = Some(FocusPool { value: 0, max: 1 });

    let fireball = ItemSource::new(
        "fireball",
        "Fireball",
        ItemData::Spell(
            SpellSource::new(3, SpellCategory::Standard)
                .in_entry("arcane")
                .with_traditions([Tradition::Arcane]),
        ),
    );
    let force_bolt = ItemSource::new(
        "force-bolt",
        "Force Bolt",
        ItemData::Spell(SpellSource::new(1, SpellCategory::Focus).in_entry("school")),
    );
    let entry = SpellcastingEntrySource::new("arcane", Tradition::Arcane, PreparationType::Prepared)
        .with_ability(Ability::Int)
        .with_slots(3, 1)
        .prepare_spell(&fireball, 3, 0)
        .unwrap();
    source.spellcasting.push(entry);
    source.spellcasting.push(
        SpellcastingEntrySource::new("school", Tradition::Arcane, PreparationType::Focus)
            .with_ability(Ability::Int),
    );
    source.items.extend([fireball, force_bolt]);
    source
}

fn troll(hp: i32) -> ActorSource {
    let mut source = ActorSource::new("troll", "Troll", ActorDetails::Npc(NpcDetails::default()));
    source.hp = HitPoints { value: hp, max: 30 };
    let regeneration = RuleElementSource {
        value: Some(RuleValue::Number(5)),
        ..RuleElementSource::new("FastHealing")
    };
    source
        .items
        .push(ItemSource::new("regen", "Regeneration", ItemData::Feat).with_rules(vec![regeneration]));
    source
}

fn effect(id: &str, duration: EffectDuration) -> ItemSource {
    ItemSource::new(
        id,
        id,
        ItemData::Effect(EffectSource::new(duration, EffectStart::default())),
    )
}

async fn hp(runtime: &Runtime, id: &str) -> i32 {
    runtime
        .repository()
        .load(&ActorId::from(id))
        .await
        .unwrap()
        .hp
        .value
}

#[tokio::test]
async fn casting_spends_slots_and_rest_restores_them() {
    let runtime = Runtime::builder().build();
    let mut casts = runtime.subscribe(Topic::Spellcasting);
    let mut notices = runtime.subscribe(Topic::Notification);
    runtime.create_actor(wizard()).await.unwrap();
    let actor = ActorId::from("ezren");
    let entry = EntryId::from("arcane");
    let fireball = ItemId::from("fireball");

    assert!(runtime.cast(&actor, &entry, &fireball, CastOptions::default()).await.unwrap());
    let RuntimeEvent::SpellCast(event) = casts.recv().await.unwrap() else {
        panic!("spell cast event expected");
    };
    assert_eq!(event.message.dc, Some(21));

    assert!(!runtime.cast(&actor, &entry, &fireball, CastOptions::default()).await.unwrap());
    let RuntimeEvent::Notification(notice) = notices.recv().await.unwrap() else {
        panic!("notification expected");
    };
    assert_eq!(notice.key, "spellcasting.slot.not-found");
    assert_eq!(notice.subject.as_deref(), Some("Fireball"));

    runtime.rest(&actor).await.unwrap();
    assert!(runtime.cast(&actor, &entry, &fireball, CastOptions::default()).await.unwrap());
}

#[tokio::test]
async fn empty_focus_pool_notifies_instead_of_failing() {
    let runtime = Runtime::builder().build();
    let mut notices = runtime.subscribe(Topic::Notification);
    runtime.create_actor(wizard()).await.unwrap();
    let actor = ActorId::from("ezren");

    let cast = runtime
        .cast(&actor, &EntryId::from("school"), &ItemId::from("force-bolt"), CastOptions::default())
        .await
        .unwrap();
    assert!(!cast);
    assert_eq!(
        notices.recv().await.unwrap(),
        RuntimeEvent::Notification(
            Notification::new("spellcasting.focus.not-enough-points").for_actor(&actor)
        )
    );

    assert!(matches!(
        runtime.refocus(&actor, false).await,
        Err(RuntimeError::Spellcasting(_))
    ));
    let refocused = runtime.refocus(&actor, true).await.unwrap();
    assert_eq!(refocused.source.focus.map(|f| f.value), Some(1));
}

#[tokio::test]
async fn fast_healing_runs_once_per_round() {
    let runtime = Runtime::builder().build();
    let mut turns = runtime.subscribe(Topic::Encounter);
    runtime.create_actor(troll(10)).await.unwrap();
    runtime.create_actor(wizard()).await.unwrap();

    runtime
        .create_encounter(vec![
            Combatant::new("c1", "troll").with_initiative(20),
            Combatant::new("c2", "ezren").with_initiative(10),
        ])
        .await
        .unwrap();

    runtime.start_encounter().await.unwrap();
    assert_eq!(hp(&runtime, "troll").await, 15);
    let RuntimeEvent::TurnStarted(started) = turns.recv().await.unwrap() else {
        panic!("turn start expected");
    };
    assert_eq!(started.actor, ActorId::from("troll"));

    // Re-sorting keeps the current turn and does not re-run turn start.
    runtime
        .set_initiatives(&[InitiativeUpdate::new("c1", 21)])
        .await
        .unwrap();
    runtime.next_turn().await.unwrap();
    assert_eq!(hp(&runtime, "troll").await, 15);

    let change = runtime.next_turn().await.unwrap();
    assert!(change.new_round);
    assert_eq!(hp(&runtime, "troll").await, 20);
}

#[tokio::test]
async fn only_the_primary_updater_runs_turn_start() {
    let users = vec![UserInfo::gm("gm"), UserInfo::player("alice")];
    let runtime = Runtime::builder()
        .current_user("alice")
        .users(users)
        .build();
    runtime.create_actor(troll(10)).await.unwrap();

    runtime
        .create_encounter(vec![Combatant::new("c1", "troll").with_initiative(12)])
        .await
        .unwrap();
    runtime.start_encounter().await.unwrap();

    assert_eq!(hp(&runtime, "troll").await, 10);
}

#[tokio::test]
async fn loot_cannot_join_an_encounter() {
    let runtime = Runtime::builder().build();
    runtime
        .create_actor(ActorSource::new("chest", "Chest", ActorDetails::Loot))
        .await
        .unwrap();

    let err = runtime
        .create_encounter(vec![Combatant::new("c1", "chest")])
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Encounter(_)));
}

#[tokio::test]
async fn timed_effects_expire_as_the_clock_advances() {
    let runtime = Runtime::builder().build();
    let mut expiries = runtime.subscribe(Topic::Effects);
    let mut source = wizard();
    source
        .items
        .push(effect("effect-heroism", EffectDuration::new(1, DurationUnit::Minutes)));
    runtime.create_actor(source).await.unwrap();
    let actor = ActorId::from("ezren");

    assert!(runtime.advance_time(30).await.unwrap().is_empty());
    let prepared = runtime.prepared(&actor).await.unwrap();
    assert!(prepared.options.is_set("all", "self:effect:heroism"));

    assert_eq!(runtime.advance_time(30).await.unwrap(), vec![actor.clone()]);
    let RuntimeEvent::EffectsExpired(event) = expiries.recv().await.unwrap() else {
        panic!("expiry event expected");
    };
    assert!(!event.removed);
    assert_eq!(event.items, vec![ItemId::from("effect-heroism")]);

    let prepared = runtime.prepared(&actor).await.unwrap();
    assert!(!prepared.options.is_set("all", "self:effect:heroism"));
    assert!(prepared.is_expired(&ItemId::from("effect-heroism")));

    // Nothing changes on the next refresh.
    assert!(runtime.refresh_effects().await.unwrap().is_empty());
}

#[tokio::test]
async fn expired_effects_are_deleted_when_automated() {
    let rules = RulesConfig::default().with_remove_expired_effects(true);
    let runtime = Runtime::builder().rules(rules).build();
    let mut source = wizard();
    source
        .items
        .push(effect("effect-bless", EffectDuration::new(1, DurationUnit::Rounds)));
    runtime.create_actor(source).await.unwrap();

    runtime.advance_time(6).await.unwrap();

    let stored = runtime.repository().load(&ActorId::from("ezren")).await.unwrap();
    assert!(stored.item(&ItemId::from("effect-bless")).is_none());
}

#[tokio::test]
async fn expired_aura_effects_are_deleted_too() {
    let rules = RulesConfig::default().with_remove_expired_effects(true);
    let runtime = Runtime::builder().rules(rules).build();
    let mut source = wizard();
    let mut aura = EffectSource::new(EffectDuration::new(1, DurationUnit::Rounds), EffectStart::default());
    aura.from_aura = true;
    source
        .items
        .push(ItemSource::new("effect-frightful", "Frightful Presence", ItemData::Effect(aura)));
    runtime.create_actor(source).await.unwrap();

    runtime.advance_time(6).await.unwrap();

    let stored = runtime.repository().load(&ActorId::from("ezren")).await.unwrap();
    assert!(stored.item(&ItemId::from("effect-frightful")).is_none());
    assert!(runtime.remove_expired(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn ending_the_encounter_expires_encounter_effects() {
    let runtime = Runtime::builder().build();
    let mut source = troll(30);
    source.items.push(effect("effect-rage", EffectDuration::encounter()));
    runtime.create_actor(source).await.unwrap();

    runtime
        .create_encounter(vec![Combatant::new("c1", "troll").with_initiative(5)])
        .await
        .unwrap();
    runtime.start_encounter().await.unwrap();
    runtime.end_encounter().await.unwrap();

    let stored = runtime.repository().load(&ActorId::from("troll")).await.unwrap();
    let rage = stored.item(&ItemId::from("effect-rage")).unwrap();
    assert!(rage.as_effect().unwrap().expired);
    assert!(runtime.encounter().await.is_none());
}

#[tokio::test]
async fn toggles_need_update_permission() {
    let runtime = Runtime::builder()
        .current_user("bob")
        .users(vec![UserInfo::player("bob")])
        .build();
    let mut notices = runtime.subscribe(Topic::Notification);
    runtime.create_actor(wizard()).await.unwrap();

    let request = ToggleRequest::new("all", "target:condition:flat-footed");
    let err = runtime
        .toggle(&ActorId::from("ezren"), &request)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::PermissionDenied { .. }));
    let RuntimeEvent::Notification(notice) = notices.recv().await.unwrap() else {
        panic!("notification expected");
    };
    assert_eq!(notice.key, "runtime.permission.cannot-update");
}

#[tokio::test]
async fn owners_can_toggle_their_actor() {
    let runtime = Runtime::builder()
        .current_user("bob")
        .users(vec![UserInfo::player("bob")])
        .build();
    let mut source = wizard();
    source.owners.push("bob".into());
    runtime.create_actor(source).await.unwrap();
    let actor = ActorId::from("ezren");

    let request = ToggleRequest::new("all", "target:condition:flat-footed");
    assert_eq!(runtime.toggle(&actor, &request).await.unwrap(), Some(true));
    assert_eq!(runtime.toggle(&actor, &request).await.unwrap(), Some(false));
    let stored = runtime.repository().load(&actor).await.unwrap();
    assert!(stored.roll_options.is_empty());
}
