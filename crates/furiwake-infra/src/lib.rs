//! Infrastructure layer - loaders for the data the core consumes
//!
//! Japanese business CSVs (inspector master, shortage table, production
//! lots) and the externally produced inspector→lots JSON mapping.

pub mod mapping;
pub mod roster;
pub mod tables;

pub use mapping::load_lots_mapping;
pub use roster::load_inspector_names;
pub use tables::{load_production_lots, load_shortage_table};
