//! Domain rules for the property-document app.
//!
//! Everything in this crate is synchronous and side-effect free. Callers
//! fetch DTOs from the backend and pass them in; the functions here decide
//! labels, suggestions, access, and plan limits from that data alone.

pub mod ai_fields;
pub mod error;
pub mod expiry;
pub mod formatting;
pub mod hierarchy;
pub mod models;
pub mod permissions;
pub mod plan_gate;
pub mod plans;
pub mod session;
pub mod suggestions;
pub mod taxonomy;
pub mod types;
pub mod upload;
