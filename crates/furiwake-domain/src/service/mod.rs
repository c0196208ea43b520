//! Domain services

pub mod allocation;
pub mod binder;
pub mod board;
pub mod dates;
pub mod layout;
pub mod split;

pub use allocation::{assign_lots_to_shortage, derive_inspection_time};
pub use binder::attach_lots_to_chart;
pub use board::{BoardController, BoardMode, LotHost};
pub use layout::{attach_placeholder_lots, build_initial_chart, grid_positions, GRID_SIZE};
pub use split::normalize_split_metadata;
