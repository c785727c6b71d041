//! REST client for the property-document backend.
//!
//! [`api::PropDocsApi`] speaks HTTP with bearer auth; [`service`] wraps it
//! with the domain rules from `propdocs-core` so that denied actions never
//! reach the network.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod service;
