//! View sync bus implementation.
//!
//! Synchronous handlers run on the publishing (controlling) thread; async
//! consumers can poll a broadcast receiver instead.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{EventCategory, PlaterEvent};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &PlaterEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Arc<dyn Fn(PlaterEvent) + Send + Sync>;

/// Configuration for the view sync bus
#[derive(Debug, Clone)]
pub struct ViewSyncConfig {
    /// Channel capacity for broadcast receivers.
    pub channel_capacity: usize,
}

impl Default for ViewSyncConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

/// Fan-out of plater notifications to registered views
pub struct ViewSync {
    sender: broadcast::Sender<PlaterEvent>,
    handlers: Arc<RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>>,
    config: ViewSyncConfig,
}

impl ViewSync {
    /// Create a new bus with default configuration
    pub fn new() -> Self {
        Self::with_config(ViewSyncConfig::default())
    }

    /// Create a new bus with custom configuration
    pub fn with_config(config: ViewSyncConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity);
        Self {
            sender,
            handlers: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns how many handlers and receivers saw the event. Publishing
    /// with nobody listening is not an error: views are optional.
    pub fn publish(&self, event: PlaterEvent) -> usize {
        tracing::trace!("{}", event.description());

        // Handlers run without the lock held so they may (un)subscribe.
        let matching: Vec<EventHandler> = self
            .handlers
            .read()
            .values()
            .filter(|(filter, _)| filter.matches(&event))
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in &matching {
            handler(event.clone());
        }

        matching.len() + self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events with a synchronous handler
    ///
    /// The handler is called on the publishing thread, so it should return
    /// quickly. A subscription added or removed from inside a handler takes
    /// effect with the next event.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(PlaterEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, (filter, Arc::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Get a receiver for polling events from an async task
    pub fn receiver(&self) -> broadcast::Receiver<PlaterEvent> {
        self.sender.subscribe()
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Get the current configuration
    pub fn config(&self) -> &ViewSyncConfig {
        &self.config
    }
}

impl Default for ViewSync {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ViewSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewSync")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}
