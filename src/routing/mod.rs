//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path + query)
//!     → router.rs (walk the dispatch table)
//!     → matcher.rs (evaluate method and prefix conditions)
//!     → Return: the Route variant of the first matching row
//! ```
//!
//! # Design Decisions
//! - Table built at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins; the last row is a catch-all so dispatch is total

pub mod matcher;
pub mod router;

pub use router::{Dispatcher, Route};
