//! High-level runtime orchestrator.
//!
//! The runtime owns the session state (world clock, encounter, users, effect
//! tracker), runs preparation passes against the repository, and persists the
//! change requests the rules core returns. Every public operation locks the
//! session once, so events are handled one at a time in arrival order.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tracing::{debug, warn};

use rules_core::encounter::Encounter;
use rules_core::users::is_primary_updater;
use rules_core::{
    ActorChanges, ActorId, ActorPreparer, ActorSource, DiagnosticSink, EffectTracker, PrepareContext,
    PreparedActor, RulesConfig, UserId, UserInfo,
};

use crate::api::{DeclineTrick, Result, RuntimeError, TrickSkillProvider};
use crate::events::{ActorPreparedEvent, EventBus, Notification, RuntimeEvent, Topic};
use crate::hooks::HookRegistry;
use crate::repository::{ActorRepository, InMemoryActorRepo};

/// Runtime configuration shared across the orchestrator and its services.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub rules: RulesConfig,
    pub event_buffer_size: usize,
    /// User this process acts for. `None` runs as the sole authority and
    /// performs every gated write itself.
    pub current_user: Option<UserId>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            event_buffer_size: 100,
            current_user: None,
        }
    }
}

/// Mutable state behind the session lock.
pub(crate) struct Session {
    pub(crate) world_time: i64,
    pub(crate) encounter: Option<Encounter>,
    pub(crate) users: Vec<UserInfo>,
    pub(crate) tracker: EffectTracker,
    /// Result of the latest pass per actor.
    pub(crate) prepared: BTreeMap<ActorId, PreparedActor>,
}

pub(crate) struct Inner {
    pub(crate) config: RuntimeConfig,
    pub(crate) repository: Arc<dyn ActorRepository>,
    pub(crate) preparer: ActorPreparer,
    pub(crate) hooks: HookRegistry,
    pub(crate) trick: Arc<dyn TrickSkillProvider>,
    pub(crate) events: EventBus,
    pub(crate) session: Mutex<Session>,
}

/// Main runtime that orchestrates preparation passes and persistence.
///
/// Cloning is cheap and shares the same session.
#[derive(Clone)]
pub struct Runtime {
    pub(crate) inner: Arc<Inner>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<RuntimeEvent> {
        self.inner.events.subscribe(topic)
    }

    pub fn repository(&self) -> &Arc<dyn ActorRepository> {
        &self.inner.repository
    }

    pub async fn world_time(&self) -> i64 {
        self.inner.session.lock().await.world_time
    }

    pub async fn set_users(&self, users: Vec<UserInfo>) {
        self.inner.session.lock().await.users = users;
    }

    pub async fn encounter(&self) -> Option<Encounter> {
        self.inner.session.lock().await.encounter.clone()
    }

    /// Result of the latest pass run for `id`, if any.
    pub async fn prepared(&self, id: &ActorId) -> Option<PreparedActor> {
        self.inner.session.lock().await.prepared.get(id).cloned()
    }

    /// Loads and prepares an actor.
    pub async fn prepare(&self, id: &ActorId) -> Result<PreparedActor> {
        let mut session = self.inner.session.lock().await;
        self.prepare_locked(&mut session, id).await
    }

    /// Deletes an actor and forgets everything tracked for it.
    pub async fn delete_actor(&self, id: &ActorId) -> Result<()> {
        let mut session = self.inner.session.lock().await;
        self.inner.repository.delete(id).await?;
        session.tracker.unregister_actor(id);
        session.prepared.remove(id);
        Ok(())
    }

    pub(crate) async fn prepare_locked(&self, session: &mut Session, id: &ActorId) -> Result<PreparedActor> {
        let source = self.inner.repository.load(id).await?;
        Ok(self.prepare_source(session, &source))
    }

    /// Runs one pass and flushes its diagnostics.
    pub(crate) fn prepare_source(&self, session: &mut Session, source: &ActorSource) -> PreparedActor {
        let settings = &self.inner.config.rules;
        let mut ctx = PrepareContext::new(settings)
            .at(session.world_time)
            .with_users(&session.users);
        if let Some(encounter) = &session.encounter {
            ctx = ctx.in_combat(encounter);
        }

        let mut diagnostics = DiagnosticSink::from_config(settings);
        let prepared = self.inner.preparer.prepare(source, &ctx, &mut diagnostics);

        let report = diagnostics.flush();
        for diagnostic in &report.diagnostics {
            warn!(
                target: "rules::prepare",
                actor = %source.id,
                item = ?diagnostic.item,
                key = ?diagnostic.key,
                "{}", diagnostic.message
            );
        }
        if report.dropped > 0 {
            warn!(
                target: "rules::prepare",
                actor = %source.id,
                dropped = report.dropped,
                "further validation warnings suppressed"
            );
        }

        session
            .tracker
            .register_actor(&prepared.source, session.world_time, session.encounter.as_ref());

        let fingerprint = hex::encode(prepared.fingerprint());
        debug!(
            target: "rules::prepare",
            actor = %source.id,
            fingerprint = %fingerprint,
            "actor prepared"
        );
        self.inner.events.publish(RuntimeEvent::ActorPrepared(ActorPreparedEvent {
            actor: source.id.clone(),
            fingerprint,
            warnings: report.diagnostics.len() + report.dropped,
        }));

        session.prepared.insert(source.id.clone(), prepared.clone());
        prepared
    }

    /// Persists `changes` in one write and re-prepares the actor.
    pub(crate) async fn persist(
        &self,
        session: &mut Session,
        id: &ActorId,
        changes: ActorChanges,
    ) -> Result<PreparedActor> {
        if changes.is_empty() {
            return self.prepare_locked(session, id).await;
        }
        let source = self.inner.repository.apply(id, changes).await?;
        Ok(self.prepare_source(session, &source))
    }

    /// Whether this process should perform gated writes for `actor`.
    pub(crate) fn is_primary(&self, session: &Session, actor: &ActorSource) -> bool {
        match &self.inner.config.current_user {
            None => true,
            Some(user) => is_primary_updater(user, actor, &session.users),
        }
    }

    /// Rejects user-initiated writes to actors the current user cannot update.
    pub(crate) fn ensure_can_update(&self, session: &Session, actor: &ActorSource) -> Result<()> {
        let Some(user) = &self.inner.config.current_user else {
            return Ok(());
        };
        let allowed = session
            .users
            .iter()
            .any(|u| &u.id == user && u.can_update(actor));
        if allowed {
            return Ok(());
        }
        self.notify(
            Notification::new("runtime.permission.cannot-update")
                .for_actor(&actor.id)
                .about(actor.name.clone()),
        );
        Err(RuntimeError::PermissionDenied {
            user: user.clone(),
            actor: actor.id.clone(),
        })
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.inner.events.publish(RuntimeEvent::Notification(notification));
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    repository: Option<Arc<dyn ActorRepository>>,
    preparer: Option<ActorPreparer>,
    hooks: Option<HookRegistry>,
    trick: Option<Arc<dyn TrickSkillProvider>>,
    users: Vec<UserInfo>,
    world_time: i64,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            repository: None,
            preparer: None,
            hooks: None,
            trick: None,
            users: Vec::new(),
            world_time: 0,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rules(mut self, rules: RulesConfig) -> Self {
        self.config.rules = rules;
        self
    }

    pub fn current_user(mut self, user: impl Into<UserId>) -> Self {
        self.config.current_user = Some(user.into());
        self
    }

    /// Persistence backend. Defaults to an empty [`InMemoryActorRepo`].
    pub fn repository(mut self, repository: impl ActorRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    pub fn shared_repository(mut self, repository: Arc<dyn ActorRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Preparer with a custom rule element registry.
    pub fn preparer(mut self, preparer: ActorPreparer) -> Self {
        self.preparer = Some(preparer);
        self
    }

    /// Set custom start-of-turn hooks.
    ///
    /// If not provided, [`HookRegistry::default_hooks`] is used.
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Set the Trick Magic Item skill provider (defaults to declining).
    pub fn trick_provider(mut self, provider: impl TrickSkillProvider + 'static) -> Self {
        self.trick = Some(Arc::new(provider));
        self
    }

    pub fn users(mut self, users: Vec<UserInfo>) -> Self {
        self.users = users;
        self
    }

    /// Initial world time in seconds.
    pub fn world_time(mut self, world_time: i64) -> Self {
        self.world_time = world_time;
        self
    }

    /// Build the runtime
    pub fn build(self) -> Runtime {
        let events = EventBus::with_capacity(self.config.event_buffer_size);
        let session = Session {
            world_time: self.world_time,
            encounter: None,
            users: self.users,
            tracker: EffectTracker::new(),
            prepared: BTreeMap::new(),
        };
        Runtime {
            inner: Arc::new(Inner {
                config: self.config,
                repository: self
                    .repository
                    .unwrap_or_else(|| Arc::new(InMemoryActorRepo::new())),
                preparer: self.preparer.unwrap_or_default(),
                hooks: self.hooks.unwrap_or_default(),
                trick: self.trick.unwrap_or_else(|| Arc::new(DeclineTrick)),
                events,
                session: Mutex::new(session),
            }),
        }
    }
}
