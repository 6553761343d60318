//! Local HTTP API for the report wizard.
//!
//! The browser front end drives everything through these routes: open a
//! report session, read stage views, send edits, move between stages,
//! and export or print the finished report. Routes are nested under
//! `/api/`.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::report_api_router;
pub use server::{serve, shutdown_signal};
pub use types::ApiContext;
