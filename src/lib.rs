//! catalogdb - a product catalog served over HTTP from one delimited file
//!
//! The backing file is the only state: every request loads it, applies one
//! operation and, for mutations, rewrites it.

pub mod catalog;
pub mod cli;
pub mod http_server;
pub mod observability;
