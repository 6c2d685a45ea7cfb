//! Observability for catalogdb
//!
//! Structured JSON logging of typed events.
//!
//! # Usage
//!
//! ```ignore
//! use catalogdb::observability::{Event, Logger};
//!
//! Logger::event(Event::ProductCreated, &[("id", "42")]);
//! ```
//!
//! The record store never logs; the HTTP handlers and the CLI do.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
