//! Backend registry subsystem.
//!
//! # Data Flow
//! ```text
//! Admin request (register / unregister)
//!     → registry.rs (validate, copy-on-write swap)
//!
//! Relay request
//!     → registry.rs snapshot (lock-free load)
//!     → relay fan-out over the snapshot
//! ```
//!
//! # Design Decisions
//! - The list lives only in memory; restarts reseed it from configuration
//! - Readers never wait on writers
//! - Entries are compared by exact string equality

pub mod registry;

pub use registry::{BackendRegistry, BackendSnapshot};
