//! Synchronous publish/subscribe fan-out of events.
//!
//! The [`EventBus`] delivers each published [`Event`] to every subscribed
//! [`EventObserver`] exactly once, in subscription order, before
//! [`publish`](EventBus::publish) returns. The delivery set is snapshotted
//! when `publish` starts, so observers that subscribe or unsubscribe while
//! an event is in flight only affect later events.
//!
//! A failing observer never stops delivery to the others. Its failure is
//! logged and returned in the [`PublishReport`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trivia_types::Event;
use tracing::warn;

/// Error an observer returns when it could not process an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ObserverError {
    /// Description of what went wrong.
    pub message: String,
}

impl ObserverError {
    /// Create an observer error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A subscriber to session events.
pub trait EventObserver {
    /// Short name used when reporting failures.
    fn name(&self) -> &str;

    /// Process one event.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError`] if the event could not be processed. The
    /// bus isolates the failure; it does not affect other observers.
    fn on_event(&mut self, event: &Event) -> Result<(), ObserverError>;
}

/// A shared, interior-mutable observer handle as held by the bus.
pub type SharedObserver = Rc<RefCell<dyn EventObserver>>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// One observer's failure to process one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFailure {
    /// The failing subscription.
    pub subscription: SubscriptionId,
    /// The observer's self-reported name.
    pub observer: String,
    /// What went wrong.
    pub error: ObserverError,
}

/// Outcome of a single [`EventBus::publish`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct PublishReport {
    /// Number of observers that processed the event successfully.
    pub delivered: usize,
    /// Observers that failed, in delivery order.
    pub failures: Vec<ObserverFailure>,
}

impl PublishReport {
    /// Whether every observer processed the event.
    pub const fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Synchronous, single-threaded event fan-out.
///
/// All methods take `&self` so observers that hold a handle to the bus can
/// subscribe or unsubscribe from inside [`EventObserver::on_event`].
#[derive(Default)]
pub struct EventBus {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(SubscriptionId, SharedObserver)>>,
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer at the end of the delivery order.
    pub fn subscribe(&self, observer: SharedObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get().saturating_add(1));
        self.subscribers.borrow_mut().push((id, observer));
        id
    }

    /// Remove an observer. Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sub, _)| *sub != id);
        subscribers.len() != before
    }

    /// Number of current subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Deliver `event` to every current subscriber, in subscription order.
    ///
    /// An observer that is already mid-delivery (a re-entrant publish from
    /// inside its own handler) is reported as failed for the nested event.
    pub fn publish(&self, event: &Event) -> PublishReport {
        let snapshot: Vec<(SubscriptionId, SharedObserver)> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(id, observer)| (*id, Rc::clone(observer)))
            .collect();

        let mut report = PublishReport::default();

        for (subscription, observer) in snapshot {
            let outcome = match observer.try_borrow_mut() {
                Ok(mut handler) => handler
                    .on_event(event)
                    .map_err(|error| (handler.name().to_owned(), error)),
                Err(_busy) => Err((
                    "<busy>".to_owned(),
                    ObserverError::new("observer is already handling an event"),
                )),
            };

            match outcome {
                Ok(()) => report.delivered = report.delivered.saturating_add(1),
                Err((name, error)) => {
                    warn!(
                        observer = name,
                        activity = %event.activity,
                        error = %error,
                        "event observer failed"
                    );
                    report.failures.push(ObserverFailure {
                        subscription,
                        observer: name,
                        error,
                    });
                }
            }
        }

        report
    }
}
