//! Top-level facade crate for ds389.
//!
//! Re-exports core types and the exporter library so users can depend on a single crate.

pub mod core {
    pub use ds389_core::*;
}

pub mod exporter {
    pub use ds389_exporter::*;
}
