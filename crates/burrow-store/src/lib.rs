//! Store backends for the Burrow tiny-URL service.
//!
//! Implements the [`burrow_core::MappingStore`] contract for an in-memory
//! (dashmap) backend and a MySQL (sqlx) backend. The MySQL schema lives
//! under `ddl/mysql/`.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryStore;
pub use mysql::MySqlStore;
