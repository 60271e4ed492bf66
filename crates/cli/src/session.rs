//! Runtime bootstrap from a content directory.
use anyhow::{Context, Result};
use tokio::sync::broadcast;

use rules_content::{ConfigLoader, ContentFactory, EncounterSpec};
use rules_core::UserInfo;
use rules_runtime::{BestTrickSkill, InMemoryActorRepo, Runtime, RuntimeEvent, Topic};

use crate::config::CliConfig;

/// Loaded runtime plus what the subcommands need alongside it.
pub struct Session {
    pub runtime: Runtime,
    pub encounter: Option<EncounterSpec>,
    notices: broadcast::Receiver<RuntimeEvent>,
}

impl Session {
    pub fn load(config: &CliConfig) -> Result<Self> {
        let factory = ContentFactory::new(&config.data_dir);

        let rules = match &config.rules_config {
            Some(path) => ConfigLoader::load(path)?,
            None => factory.load_config()?,
        };
        let actors = factory
            .load_actors()
            .with_context(|| format!("Failed to load actors from {}", config.data_dir.display()))?;
        let encounter = factory.load_encounter()?;
        let world_time = config
            .world_time
            .or_else(|| encounter.as_ref().map(|spec| spec.world_time))
            .unwrap_or(0);

        tracing::info!(
            actors = actors.len(),
            world_time,
            data_dir = %config.data_dir.display(),
            "content loaded"
        );

        let mut builder = Runtime::builder()
            .rules(rules)
            .repository(InMemoryActorRepo::with_actors(actors))
            .trick_provider(BestTrickSkill)
            .world_time(world_time);
        if let Some(user) = &config.user {
            builder = builder
                .current_user(user.clone())
                .users(vec![UserInfo::player(user.clone())]);
        }
        let runtime = builder.build();
        let notices = runtime.subscribe(Topic::Notification);

        Ok(Self {
            runtime,
            encounter,
            notices,
        })
    }

    /// Prints notices published since the last call.
    pub fn print_notices(&mut self) {
        while let Ok(event) = self.notices.try_recv() {
            if let RuntimeEvent::Notification(notice) = event {
                let subject = notice.subject.as_deref().unwrap_or("-");
                println!("notice: {} ({})", notice.key, subject);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rules_core::ActorId;
    use rules_runtime::ActorRepository;

    use super::*;

    #[tokio::test]
    async fn loads_a_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("actors.ron"),
            r#"[(id: "troll", name: "Troll", level: 5, hp: (value: 10, max: 60), details: Npc((perception: 11, ac: 20)))]"#,
        )
        .unwrap();
        fs::write(dir.path().join("rules.toml"), "remove_expired_effects = true\n").unwrap();

        let config = CliConfig {
            data_dir: dir.path().to_path_buf(),
            world_time: Some(120),
            ..CliConfig::default()
        };
        let session = Session::load(&config).unwrap();

        assert!(session.encounter.is_none());
        assert!(session.runtime.config().rules.remove_expired_effects);
        assert_eq!(session.runtime.world_time().await, 120);
        let troll = session.runtime.prepare(&ActorId::from("troll")).await.unwrap();
        assert_eq!(troll.source.hp.value, 10);
    }

    #[tokio::test]
    async fn missing_actor_catalog_yields_an_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            data_dir: dir.path().to_path_buf(),
            ..CliConfig::default()
        };
        let session = Session::load(&config).unwrap();
        assert!(session.runtime.repository().list().await.unwrap().is_empty());
    }
}
