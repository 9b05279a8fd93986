//! Topic-based publish/subscribe.
//!
//! # Guarantees
//!
//! - A handler subscribed to a topic receives each emission on that topic
//!   once; deliveries run as independent tasks, so ordering across topics
//!   is not guaranteed.
//! - Events are in-memory only; durability lives in the job store, not
//!   here.
//! - Subscribers are registered statically before the dispatch loop
//!   starts; there is no runtime subscribe/unsubscribe.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use tdoc_models::{Event, Topic};

use crate::error::{BusError, BusResult};

/// A stage that consumes events from one or more topics.
///
/// Handlers communicate forward progress solely by writing to the job
/// store and emitting their own events; the bus observes no return value.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// Stable name, used for logging.
    fn name(&self) -> &'static str;

    /// Topics this handler consumes.
    fn topics(&self) -> &'static [Topic];

    /// Process one event.
    async fn handle(&self, event: Event);
}

/// Emit handle for publishing events onto the bus.
#[derive(Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventBus {
    /// Create a bus and the registry that will route its events.
    pub fn channel() -> (Self, SubscriberRegistry) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self { tx },
            SubscriberRegistry {
                rx,
                routes: HashMap::new(),
            },
        )
    }

    /// Publish an event.
    ///
    /// Fails only when the dispatch loop has shut down.
    pub fn emit(&self, event: Event) -> BusResult<()> {
        debug!(topic = %event.topic(), job_id = %event.job_id(), "Emitting event");
        self.tx
            .send(event)
            .map_err(|e| BusError::closed(format!("dispatch loop stopped: {}", e)))
    }
}

/// Static topic -> handler routing table plus the dispatch loop.
pub struct SubscriberRegistry {
    rx: mpsc::UnboundedReceiver<Event>,
    routes: HashMap<Topic, Vec<Arc<dyn EventHandler>>>,
}

impl SubscriberRegistry {
    /// Register a handler for every topic it declares.
    pub fn subscribe(&mut self, handler: Arc<dyn EventHandler>) {
        for topic in handler.topics() {
            debug!(handler = handler.name(), topic = %topic, "Subscribing handler");
            self.routes
                .entry(*topic)
                .or_default()
                .push(Arc::clone(&handler));
        }
    }

    /// Run the dispatch loop until every [`EventBus`] handle is dropped.
    ///
    /// Each delivery is spawned as its own task: handlers for the same
    /// emission run concurrently and a slow handler never blocks the loop.
    pub async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            let topic = event.topic();
            match self.routes.get(&topic) {
                Some(handlers) => {
                    for handler in handlers {
                        let handler = Arc::clone(handler);
                        let event = event.clone();
                        tokio::spawn(async move {
                            debug!(
                                handler = handler.name(),
                                topic = %event.topic(),
                                job_id = %event.job_id(),
                                "Delivering event"
                            );
                            handler.handle(event).await;
                        });
                    }
                }
                None => {
                    // Terminal topics (email.sent, error.notified) have no
                    // subscribers; anything else unrouted is worth a warning.
                    if matches!(topic, Topic::EmailSent | Topic::ErrorNotified) {
                        debug!(topic = %topic, "Terminal event, no subscribers");
                    } else {
                        warn!(topic = %topic, "Event emitted with no subscribers");
                    }
                }
            }
        }
        debug!("Event bus dispatch loop stopped");
    }
}
