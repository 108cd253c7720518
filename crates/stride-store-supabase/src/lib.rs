//! Supabase backend for the Stride entry store.
//!
//! Talks to the project's PostgREST endpoint (`<url>/rest/v1`) with the
//! service key. Table layout and the unique constraint the upsert relies on
//! are in `schema.sql` next to this crate's manifest.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{SupabaseConfig, SupabaseStore};

#[cfg(test)]
mod tests;
