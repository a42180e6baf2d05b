//! ds389 core: directory layout knowledge for FreeIPA / 389 Directory Server.
//!
//! This crate holds the runtime-free parts of the exporter: DN construction,
//! the static table of scrape queries, replication status classification, and
//! the shared error surface. It carries no network or async dependencies so it
//! can be tested in isolation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths must surface as `ExporterError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod dn;
pub mod error;
pub mod query;
pub mod replication;

/// Shared result type.
pub use error::{ErrorKind, ExporterError, Result};
