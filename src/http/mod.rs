//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TLS connection (lifecycle::server)
//!     → router.rs (request ID, trace span, optional timeout)
//!     → handler.rs (GET → fixed body, anything else → 405)
//!     → Send to client
//! ```

pub mod handler;
pub mod router;

pub use handler::{handler_router, process_request, METHOD_NOT_ALLOWED_BODY, PROCESSED_BODY};
pub use router::{build_router, build_router_with, X_REQUEST_ID};
