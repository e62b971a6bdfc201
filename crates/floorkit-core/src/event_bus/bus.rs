//! Synchronous dispatch plus an optional broadcast mirror.

use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::fmt;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{CanvasEvent, EventCategory};

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.0.simple().to_string();
        write!(f, "listener-{}", &id[..8])
    }
}

/// Which events a listener wants.
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    /// Any event whose category is listed.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &CanvasEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type Callback = Box<dyn Fn(CanvasEvent) + Send + Sync>;

struct Listener {
    id: SubscriptionId,
    filter: EventFilter,
    callback: Callback,
}

/// Bus tuning.
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Capacity of the broadcast mirror. Slow receivers lag past this.
    pub channel_capacity: usize,
    /// Keep the last N events for inspection. `None` disables recording.
    pub history_limit: Option<usize>,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventBusError {
    /// Nothing received the event: no listener, receiver or history.
    #[error("Event dropped, nobody is listening")]
    NoSubscribers,
}

/// How far a published event travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// Listeners whose filter matched.
    pub listeners: usize,
    /// Broadcast receivers alive at send time.
    pub receivers: usize,
}

/// Per-canvas event channel.
///
/// Listeners run in subscription order on the publishing call, while the
/// listener table is read-locked, so a callback must not subscribe or
/// unsubscribe on the same bus.
pub struct EventBus {
    sender: broadcast::Sender<CanvasEvent>,
    listeners: RwLock<Vec<Listener>>,
    history: Mutex<VecDeque<CanvasEvent>>,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            listeners: RwLock::new(Vec::new()),
            history: Mutex::new(VecDeque::new()),
            config,
        }
    }

    /// Delivers `event` to matching listeners, then to broadcast receivers.
    pub fn publish(&self, event: CanvasEvent) -> Result<Delivery, EventBusError> {
        tracing::trace!(category = %event.category(), "{}", event.description());

        let recorded = self.record(&event);

        let mut delivery = Delivery::default();
        {
            let listeners = self.listeners.read();
            for listener in listeners.iter().filter(|l| l.filter.matches(&event)) {
                (listener.callback)(event.clone());
                delivery.listeners += 1;
            }
        }
        delivery.receivers = self.sender.send(event).unwrap_or(0);

        if delivery == Delivery::default() && !recorded {
            return Err(EventBusError::NoSubscribers);
        }
        Ok(delivery)
    }

    pub fn subscribe<F>(&self, filter: EventFilter, callback: F) -> SubscriptionId
    where
        F: Fn(CanvasEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.listeners.write().push(Listener {
            id,
            filter,
            callback: Box::new(callback),
        });
        tracing::debug!("{} subscribed", id);
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        let removed = listeners.len() != before;
        if removed {
            tracing::debug!("{} unsubscribed", id);
        }
        removed
    }

    /// A receiver for hosts mirroring events into async code.
    pub fn receiver(&self) -> broadcast::Receiver<CanvasEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Recorded events, oldest first.
    pub fn history(&self) -> Vec<CanvasEvent> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn drain_history(&self) -> Vec<CanvasEvent> {
        self.history.lock().drain(..).collect()
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    fn record(&self, event: &CanvasEvent) -> bool {
        let Some(limit) = self.config.history_limit else {
            return false;
        };
        let mut history = self.history.lock();
        history.push_back(event.clone());
        while history.len() > limit {
            history.pop_front();
        }
        true
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}
