//! Storage backends implementing [`AgencyStore`](crate::core::AgencyStore)
//!
//! - `in_memory` (default feature): RwLock-protected maps for development
//!   and tests
//! - `postgres` (feature flag): sqlx-backed PostgreSQL with embedded
//!   migrations

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
