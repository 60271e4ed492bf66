//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{ActorPreparedEvent, EffectsExpiredEvent, Notification, SpellCastEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// User-facing notices (resource exhaustion, permission failures)
    Notification,
    /// Spells cast through the runtime
    Spellcasting,
    /// Completed preparation passes
    Actor,
    /// Turn management events
    Encounter,
    /// Effect expiry
    Effects,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Notification,
        Topic::Spellcasting,
        Topic::Actor,
        Topic::Encounter,
        Topic::Effects,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeEvent {
    Notification(Notification),
    SpellCast(SpellCastEvent),
    ActorPrepared(ActorPreparedEvent),
    TurnStarted(TurnEvent),
    TurnEnded(TurnEvent),
    EffectsExpired(EffectsExpiredEvent),
}

impl RuntimeEvent {
    pub fn topic(&self) -> Topic {
        match self {
            RuntimeEvent::Notification(_) => Topic::Notification,
            RuntimeEvent::SpellCast(_) => Topic::Spellcasting,
            RuntimeEvent::ActorPrepared(_) => Topic::Actor,
            RuntimeEvent::TurnStarted(_) | RuntimeEvent::TurnEnded(_) => Topic::Encounter,
            RuntimeEvent::EffectsExpired(_) => Topic::Effects,
        }
    }

    /// JSON rendering for log sinks and external consumers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Cloning shares the underlying channels.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<RuntimeEvent>; Topic::ALL.len()]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Topic::ALL.map(|_| broadcast::channel(capacity).0)),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<RuntimeEvent> {
        &self.channels[topic.index()]
    }

    /// Publish an event to its corresponding topic
    ///
    /// Events are best-effort: publishing without subscribers is not an error.
    pub fn publish(&self, event: RuntimeEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<RuntimeEvent> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<RuntimeEvent>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut notices = bus.subscribe(Topic::Notification);
        let mut effects = bus.subscribe(Topic::Effects);

        bus.publish(RuntimeEvent::Notification(Notification::new(
            "spellcasting.focus.not-enough-points",
        )));

        let event = notices.recv().await.unwrap();
        assert_eq!(event.topic(), Topic::Notification);
        assert!(effects.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(RuntimeEvent::Notification(Notification::new("x")));
    }

    #[test]
    fn events_render_as_json() {
        let event = RuntimeEvent::Notification(Notification::new("spellcasting.slot.expended").about("Fireball"));
        let json = event.to_json().unwrap();
        assert!(json.contains("spellcasting.slot.expended"));
        assert!(json.contains("Fireball"));
    }
}
