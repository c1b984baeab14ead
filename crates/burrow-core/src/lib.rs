//! Core types and traits for the Burrow tiny-URL service.
//!
//! This crate provides the shared data model, the error taxonomy, and the
//! store and service contracts used by the shortening and resolution
//! services.

pub mod error;
pub mod fingerprint;
pub mod key;
pub mod record;
pub mod resolver;
pub mod shortener;
pub mod store;

pub use error::{StoreError, TinyUrlError};
pub use fingerprint::Fingerprint;
pub use key::UrlKey;
pub use record::{MappingRecord, NewMapping};
pub use resolver::Resolver;
pub use shortener::{ShortenOptions, Shortener};
pub use store::MappingStore;
