//! Request replication subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → capture.rs (buffer body ≤ 25 MiB, keep method/target/headers)
//!     → registry snapshot
//!     → fanout.rs (one attempt per backend)
//!         → outbound.rs (swap scheme+authority, copy the rest)
//!         → reqwest client (timeout, TLS policy)
//!     → AggregateResult (200 "proxied" / 502 "failed to proxy")
//! ```
//!
//! # Design Decisions
//! - Body is fully buffered once and shared read-only by all attempts
//! - Per-backend failures never escape the fan-out; only the verdict does
//! - No retries: one attempt per backend per inbound request

pub mod capture;
pub mod fanout;
pub mod outbound;

pub use capture::{CapturedRequest, MAX_BODY_SIZE};
pub use fanout::{AggregateResult, BackendOutcome, FanoutRelay};
