//! In-process adapters used when no database is configured.
//!
//! [`InMemoryCatalogue`] implements every driven port over a single
//! `RwLock`-guarded store, so the full HTTP surface runs without PostgreSQL.

mod catalogue;

pub use catalogue::InMemoryCatalogue;
