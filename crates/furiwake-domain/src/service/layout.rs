//! Seat layout builder
//!
//! Produces the fixed inspection-floor grid and, for initial bring-up,
//! seeds it with deterministic placeholder lots. Real deployments replace
//! the placeholders through the binder pipeline.

use crate::model::{LotAssignment, SeatSlot, SeatingChart};

/// Number of seats on the fixed grid.
pub const GRID_SIZE: usize = 36;

/// Fixed grid layout: 4 full rows of 8 seats, plus a staggered 5th row of
/// 4 seats sitting between the columns above.
pub fn grid_positions() -> Vec<(f64, f64)> {
    let mut positions = Vec::with_capacity(GRID_SIZE);
    for row in 1..=4 {
        for col in 1..=8 {
            positions.push((row as f64, col as f64));
        }
    }
    for col in [1.5, 3.5, 5.5, 7.5] {
        positions.push((5.0, col));
    }
    positions
}

/// Build the initial chart: one seat per grid position, ids `s1..sN` in
/// grid order, the roster cycled round-robin. An empty roster yields
/// vacant seats. No lots are attached here.
pub fn build_initial_chart(inspector_names: &[String]) -> SeatingChart {
    let seats = grid_positions()
        .into_iter()
        .enumerate()
        .map(|(idx, (row, col))| SeatSlot {
            id: format!("s{}", idx + 1),
            name: if inspector_names.is_empty() {
                String::new()
            } else {
                inspector_names[idx % inspector_names.len()].clone()
            },
            row,
            col,
            lots: Vec::new(),
        })
        .collect();
    SeatingChart {
        seats,
        ..Default::default()
    }
}

const PLACEHOLDER_PRODUCTS: [&str; 6] = ["A-001", "B-145", "C-210", "D-330", "E-512", "F-021"];
const PLACEHOLDER_PROCESSES: [&str; 4] = ["外観検査", "組立検査", "仕上げ検査", "再検査"];
const PLACEHOLDER_QTY: [f64; 6] = [32.0, 48.0, 60.0, 90.0, 120.0, 180.0];
const PLACEHOLDER_SEC: [f64; 5] = [2.5, 3.4, 4.8, 5.2, 6.1];

/// Attach deterministic placeholder lots to every seat (bring-up only).
pub fn attach_placeholder_lots(chart: &mut SeatingChart) {
    let mut counter = 1;
    for (idx, seat) in chart.seats.iter_mut().enumerate() {
        let seat_no = idx + 1;
        let lot_count = 2 + seat_no % 2;
        let mut lots = Vec::with_capacity(lot_count);
        for slot in 0..lot_count {
            let pick = seat_no + slot;
            lots.push(LotAssignment {
                lot_id: format!("L{:02}-{:03}", seat_no, counter),
                product_name: format!("品番{}", PLACEHOLDER_PRODUCTS[pick % 6]),
                process_name: PLACEHOLDER_PROCESSES[pick % 4].to_string(),
                quantity: PLACEHOLDER_QTY[pick % 6],
                sec_per_piece: PLACEHOLDER_SEC[pick % 5],
                ..Default::default()
            });
            counter += 1;
        }
        seat.lots = lots;
    }
}
