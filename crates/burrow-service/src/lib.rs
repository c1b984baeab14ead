//! Shortening, resolution, and formatting services for the Burrow tiny-URL
//! system.
//!
//! [`ShortenerService`] creates mappings, [`ResolverService`] resolves them,
//! and [`UrlFormatter`] renders the outward-facing short URLs in either
//! direct (query-string) or speaking (templated) mode.

pub mod format;
pub mod resolver;
pub mod shortener;

pub use format::{FormatConfig, RequestEnv, UrlFormatter};
pub use resolver::ResolverService;
pub use shortener::ShortenerService;
