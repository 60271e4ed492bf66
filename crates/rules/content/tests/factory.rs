use std::fs;

use rules_content::ContentFactory;
use rules_core::ActorId;
use tempfile::TempDir;

const WIZARD: &str = r#"(
    id: "ezren",
    name: "Ezren",
    level: 3,
    hp: (value: 20, max: 20),
    details: Character(()),
)"#;

const GOBLIN: &str = r#"(
    id: "goblin",
    name: "Goblin",
    level: 1,
    hp: (value: 6, max: 6),
    details: Npc((perception: 5, ac: 16)),
)"#;

fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("actors.ron"), format!("[{WIZARD}]")).unwrap();
    fs::create_dir(dir.path().join("actors")).unwrap();
    fs::write(dir.path().join("actors").join("goblin.ron"), GOBLIN).unwrap();
    dir
}

#[test]
fn missing_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let factory = ContentFactory::new(dir.path());

    let config = factory.load_config().unwrap();
    assert!(!config.remove_expired_effects);
    assert!(factory.load_actors().unwrap().is_empty());
    assert!(factory.load_encounter().unwrap().is_none());
}

#[test]
fn loads_catalog_and_actor_directory() {
    let dir = data_dir();
    let factory = ContentFactory::new(dir.path());

    let ids: Vec<ActorId> = factory
        .load_actors()
        .unwrap()
        .into_iter()
        .map(|actor| actor.id)
        .collect();
    assert_eq!(ids, vec![ActorId::from("ezren"), ActorId::from("goblin")]);
}

#[test]
fn actor_in_both_places_is_an_error() {
    let dir = data_dir();
    fs::write(dir.path().join("actors").join("ezren.ron"), WIZARD).unwrap();

    let err = ContentFactory::new(dir.path()).load_actors().unwrap_err();
    assert!(err.to_string().contains("ezren"));
}

#[test]
fn loads_rules_and_encounter() {
    let dir = data_dir();
    fs::write(
        dir.path().join("rules.toml"),
        "remove_expired_effects = true\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("encounter.ron"),
        r#"(world_time: 60, combatants: [(id: "c1", actor: "goblin", initiative: Some(12))])"#,
    )
    .unwrap();

    let factory = ContentFactory::new(dir.path());
    assert!(factory.load_config().unwrap().remove_expired_effects);

    let encounter = factory.load_encounter().unwrap().unwrap();
    assert_eq!(encounter.world_time, 60);
    assert_eq!(encounter.combatants()[0].initiative, Some(12));
}

#[test]
fn malformed_encounter_reports_the_file() {
    let dir = data_dir();
    fs::write(dir.path().join("encounter.ron"), "(combatants: [").unwrap();

    let err = ContentFactory::new(dir.path()).load_encounter().unwrap_err();
    assert!(err.to_string().contains("encounter"));
}
