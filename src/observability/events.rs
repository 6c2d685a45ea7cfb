//! Observability events for catalogdb
//!
//! Every line the service logs names one of these events.

use std::fmt;

use super::logger::Severity;

/// Observable events in catalogdb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Backing table initialized by `init`
    TableInitialized,
    /// Server bound and serving
    Serving,
    /// Server stopped accepting requests
    ShutdownComplete,

    // Requests
    /// Product appended
    ProductCreated,
    /// Product fields replaced
    ProductUpdated,
    /// Update addressed an id that does not exist
    ProductUpdateSkipped,
    /// Product removed
    ProductDeleted,
    /// Request refused (validation, duplicate, missing record)
    RequestRejected,

    // Storage
    /// Backing file unreadable, unwritable or corrupt
    StoreFailure,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::TableInitialized => "TABLE_INITIALIZED",
            Event::Serving => "CATALOGDB_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ProductCreated => "PRODUCT_CREATED",
            Event::ProductUpdated => "PRODUCT_UPDATED",
            Event::ProductUpdateSkipped => "PRODUCT_UPDATE_SKIPPED",
            Event::ProductDeleted => "PRODUCT_DELETED",
            Event::RequestRejected => "REQUEST_REJECTED",

            Event::StoreFailure => "STORE_FAILURE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreFailure => Severity::Error,
            Event::RequestRejected | Event::ProductUpdateSkipped => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
