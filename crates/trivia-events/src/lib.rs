//! Event sourcing for the trivia session engine.
//!
//! Every meaningful session transition produces an immutable [`Event`].
//! Events are the source of truth for the session's history: the report is
//! reconstructed by replaying them rather than by reading live state.
//!
//! # Architecture
//!
//! - [`builder`] -- The [`EventBuilder`] for validated event construction.
//! - [`log`] -- The [`EventLog`]: an append-only, order-preserving store that
//!   doubles as a bus observer.
//! - [`bus`] -- The [`EventBus`]: synchronous fan-out to subscribed
//!   [`EventObserver`]s with per-observer failure isolation.
//! - [`sink`] -- The [`CsvEventWriter`] sink, one comma-separated row per event.
//!
//! # Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use trivia_events::{EventBuilder, EventBus, EventLog};
//! use trivia_types::{Activity, SessionId};
//!
//! let bus = EventBus::new();
//! let log = Rc::new(RefCell::new(EventLog::new()));
//! bus.subscribe(log.clone());
//!
//! let event = EventBuilder::new(SessionId::new(), Activity::StartGame).build();
//! if let Ok(event) = event {
//!     let report = bus.publish(&event);
//!     assert!(report.is_clean());
//! }
//! assert_eq!(log.borrow().len(), 1);
//! ```
//!
//! [`Event`]: trivia_types::Event

pub mod builder;
pub mod bus;
pub mod log;
pub mod sink;

// Re-export primary types at crate root.
pub use builder::{EventBuilder, EventField};
pub use bus::{
    EventBus, EventObserver, ObserverError, ObserverFailure, PublishReport, SharedObserver,
    SubscriptionId,
};
pub use log::EventLog;
pub use sink::{CSV_HEADER, CsvEventWriter};

use trivia_types::Activity;

/// Errors that can occur when building or serializing events.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// A field required for the activity was not set on the builder.
    #[error("{activity} event is missing required field: {field}")]
    MissingField {
        /// The activity being built.
        activity: Activity,
        /// The missing field.
        field: EventField,
    },

    /// Writing a CSV row failed.
    #[error("failed to write event CSV: {source}")]
    Csv {
        /// The underlying CSV error.
        #[from]
        source: csv::Error,
    },

    /// Flushing the underlying writer failed.
    #[error("failed to flush event sink: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
