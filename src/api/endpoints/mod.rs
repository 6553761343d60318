//! API endpoint handlers, one module per resource.

pub mod export;
pub mod health;
pub mod reports;
pub mod stages;
