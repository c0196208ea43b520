//! Domain model types

pub mod seating;
pub mod shortage;

pub use seating::{LotAssignment, SeatSlot, SeatingChart};
pub use shortage::{LotAllocation, ProductionLot, ShortageRecord};
