//! Name Trends core library.
//!
//! Classifies each name's rank history over three horizons, writes the four
//! narrative bullet points and resolves related names, then persists the
//! enriched gender snapshots.
//!
//! ```ignore
//! use nt_core::pipeline::{enrich, LabelTables, NameCollection};
//! use nt_core::snapshot::{load_collection, save_partition};
//!
//! let mut names = load_collection(Some(boys), Some(girls))?;
//! let report = enrich(&mut names, &LabelTables::default(), &config);
//! save_partition(boys, &names, Gender::Boy)?;
//! ```

pub mod classify;
pub mod exit_codes;
pub mod logging;
pub mod narrative;
pub mod pipeline;
pub mod profile;
pub mod related;
pub mod schema;
pub mod slug;
pub mod snapshot;

pub use pipeline::{enrich, EnrichmentReport, LabelTables, NameCollection};
