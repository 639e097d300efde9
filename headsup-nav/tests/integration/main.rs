//! Integration tests for headsup-nav using the simulated vehicle
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p headsup-nav --test integration -- --nocapture
//! ```

mod harness;
mod missions;
mod scenarios;
