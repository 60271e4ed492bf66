//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need.

mod bus;
mod types;

pub use bus::{EventBus, RuntimeEvent, Topic};
pub use types::{ActorPreparedEvent, EffectsExpiredEvent, Notification, SpellCastEvent, TurnEvent};
