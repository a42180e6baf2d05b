//! ds389 exporter library entry.
//!
//! This crate wires config, the directory client, the scrape orchestrator,
//! the metric registry, and the HTTP exposition router into one exporter. It
//! is consumed by the binary (`main.rs`) and by integration tests.
//!
//! Count gauges read `-1` when the last scrape of that metric failed. Before
//! the first scrape finishes no count series exist at all, and
//! `ldap_389ds_last_scrape_timestamp_seconds` is absent.

pub mod app_state;
pub mod config;
pub mod directory;
pub mod obs;
pub mod router;
pub mod scrape;
