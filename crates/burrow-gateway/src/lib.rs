//! HTTP gateway for the Burrow tiny-URL service.
//!
//! Serves the outward redirect endpoint (`GET /` with the configured key
//! parameter) and a JSON endpoint for creating mappings.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
