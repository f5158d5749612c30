//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay and admin paths produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint
//! ```
//!
//! # Design Decisions
//! - Request ID is attached to every per-backend log record
//! - Metrics calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
