//! Runtime orchestration for the rules engine.
//!
//! This crate wires the pure `rules-core` operations to persistence, a
//! session clock and encounter, and an event bus. Consumers embed
//! [`Runtime`] to prepare actors, cast spells, run encounters, and subscribe
//! to events.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the error and provider types clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`hooks`] provides the start-of-turn hook system
//! - [`repository`] defines the persistence contract and an in-memory store
pub mod api;
pub mod events;
pub mod hooks;
pub mod repository;
pub mod runtime;

mod services;

pub use api::{BestTrickSkill, DeclineTrick, Result, RuntimeError, TrickSkillProvider};
pub use events::{EventBus, Notification, RuntimeEvent, Topic};
pub use hooks::{
    ExpiredEffectHook, HookContext, HookCriticality, HookError, HookRegistry, RuleElementHook,
    TurnStartHook,
};
pub use repository::{ActorRepository, InMemoryActorRepo, RepositoryError};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
