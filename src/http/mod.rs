//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (one task per connection, via axum::serve)
//!     → request.rs (assign x-request-id, open request span)
//!     → server.rs (dispatch table picks a route)
//!         ├─ proxy routes → crate::proxy handlers
//!         ├─ static       → static_files.rs (ServeDir + directory listing)
//!         └─ rejections   → response.rs (405 / 501)
//!     → security layer seals COOP/COEP
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
