//! Interactive board state machine
//!
//! Drag/drop, lot splitting, and seat editing re-expressed as state
//! transitions over one owned chart document. The rendering layer calls
//! these on its events and re-renders from the snapshot; nothing here
//! knows about a UI framework. A transition that references a missing lot
//! or seat, or runs in the wrong mode, returns a `MoveError` and leaves
//! the chart untouched - callers treat that as a no-op, never as fatal.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use furiwake_types::MoveError;

use crate::model::{LotAssignment, SeatingChart};

use super::binder::attach_lots_to_chart;
use super::dates::parse_flexible_date;
use super::split::{create_split_lots, normalize_split_metadata};

/// Where a lot card currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LotHost {
    Seat(String),
    Unassigned,
}

/// Board interaction mode. Lot editing and seat editing are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardMode {
    #[default]
    LotEdit,
    SeatEdit,
}

/// An in-flight lot drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotDrag {
    pub from: LotHost,
    pub lot_id: String,
}

/// Vertical bounds of a rendered lot card, for insert-index math.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardBounds {
    pub top: f64,
    pub height: f64,
}

/// Lots and containers to highlight while hovering a lot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightSet {
    pub lot_ids: BTreeSet<String>,
    pub hosts: Vec<LotHost>,
}

/// Validate a drag start: the source must exist and hold the lot.
pub fn begin_move(chart: &SeatingChart, from: LotHost, lot_id: &str) -> Result<LotDrag, MoveError> {
    let lots = host_lots(chart, &from)?;
    if !lots.iter().any(|lot| lot.lot_id == lot_id) {
        return Err(MoveError::LotNotFound(lot_id.to_string()));
    }
    Ok(LotDrag {
        from,
        lot_id: lot_id.to_string(),
    })
}

/// Insertion index for a drop at `cursor_y`: before the first sibling card
/// whose vertical midpoint lies below the cursor, else at the end.
pub fn compute_insert_index(cursor_y: f64, cards: &[CardBounds]) -> usize {
    for (idx, card) in cards.iter().enumerate() {
        if cursor_y < card.top + card.height / 2.0 {
            return idx;
        }
    }
    cards.len()
}

/// Apply a lot drop.
///
/// Moving onto a seat whose inspector has a source-system column mapping
/// stamps `source_inspector_col`; moving into the unassigned pool clears
/// it. `insert_index` positions the lot within the target list (clamped);
/// `None` appends. A same-host drop without an index is a no-op.
pub fn apply_move(
    chart: &mut SeatingChart,
    drag: &LotDrag,
    to: LotHost,
    insert_index: Option<usize>,
) -> Result<(), MoveError> {
    if drag.from == to && insert_index.is_none() {
        return Ok(());
    }
    let target_seat = match &to {
        LotHost::Seat(seat_id) => Some(
            chart
                .seats
                .iter()
                .position(|seat| seat.id == *seat_id)
                .ok_or_else(|| MoveError::SeatNotFound(seat_id.clone()))?,
        ),
        LotHost::Unassigned => None,
    };

    let mut lot = detach_lot(chart, &drag.from, &drag.lot_id)?;
    match target_seat {
        None => {
            lot.source_inspector_col.clear();
            insert_lot(&mut chart.unassigned_lots, lot, insert_index);
        }
        Some(idx) => {
            let name = chart.seats[idx].name.clone();
            if let Some(column) = chart.inspector_column_map.get(&name) {
                if !column.trim().is_empty() {
                    lot.source_inspector_col = column.clone();
                }
            }
            insert_lot(&mut chart.seats[idx].lots, lot, insert_index);
        }
    }
    Ok(())
}

/// Swap the grid positions of two seats. Names and lots stay put.
pub fn swap_seats(
    chart: &mut SeatingChart,
    first_id: &str,
    second_id: &str,
) -> Result<(), MoveError> {
    let first = seat_index(chart, first_id)?;
    let second = seat_index(chart, second_id)?;
    if first == second {
        return Ok(());
    }
    let (row, col) = (chart.seats[first].row, chart.seats[first].col);
    chart.seats[first].row = chart.seats[second].row;
    chart.seats[first].col = chart.seats[second].col;
    chart.seats[second].row = row;
    chart.seats[second].col = col;
    Ok(())
}

/// Replace one lot in place with its split clones (see
/// [`create_split_lots`] for the clone semantics). `suffix` disambiguates
/// the clone ids; the caller supplies it so splitting stays deterministic
/// under test.
pub fn split_lot(
    chart: &mut SeatingChart,
    host: &LotHost,
    lot_id: &str,
    count: u32,
    suffix: &str,
) -> Result<(), MoveError> {
    let lots = host_lots_mut(chart, host)?;
    let idx = lots
        .iter()
        .position(|lot| lot.lot_id == lot_id)
        .ok_or_else(|| MoveError::LotNotFound(lot_id.to_string()))?;
    let clones = create_split_lots(&lots[idx], count, suffix);
    lots.splice(idx..=idx, clones);
    Ok(())
}

/// Lots (and the containers holding them) to highlight while hovering:
/// every lot sharing the hovered lot's `split_group`, or - when it has no
/// group but its id occurs more than once - every lot with the same id.
pub fn highlight_targets(chart: &SeatingChart, host: &LotHost, lot_id: &str) -> HighlightSet {
    let hovered = match host_lots(chart, host) {
        Ok(lots) => lots.iter().find(|lot| lot.lot_id == lot_id),
        Err(_) => None,
    };
    let Some(hovered) = hovered else {
        return HighlightSet::default();
    };
    let group = hovered
        .split_group
        .as_deref()
        .filter(|group| !group.is_empty());

    let duplicates = all_lots(chart)
        .filter(|lot| lot.lot_id == lot_id)
        .count()
        > 1;
    let matches = |lot: &LotAssignment| match group {
        Some(group) => lot.split_group.as_deref() == Some(group),
        None => duplicates && lot.lot_id == lot_id,
    };

    let mut set = HighlightSet::default();
    for seat in &chart.seats {
        let mut hit = false;
        for lot in seat.lots.iter().filter(|lot| matches(lot)) {
            set.lot_ids.insert(lot.lot_id.clone());
            hit = true;
        }
        if hit {
            set.hosts.push(LotHost::Seat(seat.id.clone()));
        }
    }
    let mut pool_hit = false;
    for lot in chart.unassigned_lots.iter().filter(|lot| matches(lot)) {
        set.lot_ids.insert(lot.lot_id.clone());
        pool_hit = true;
    }
    if pool_hit {
        set.hosts.push(LotHost::Unassigned);
    }
    set
}

/// Same-day-cleaning marker in a shipping-date cell.
pub fn is_same_day_cleaning(value: &str) -> bool {
    value.contains("当日洗浄")
}

/// Pre-inspection marker in a shipping-date cell.
pub fn is_pre_inspection(value: &str) -> bool {
    value.contains("検査前")
}

fn is_urgency_marker(value: &str) -> bool {
    is_same_day_cleaning(value) || is_pre_inspection(value)
}

/// Whether a lot ships today. Marker values never count as today.
pub fn is_shipping_today(value: &str, today: NaiveDate) -> bool {
    !is_same_day_cleaning(value) && parse_flexible_date(value) == Some(today)
}

/// Display order for the unassigned pool: urgency markers first, then
/// parsed shipping date ascending (dateless values last), then lexical lot
/// id. Returns indices into `unassigned_lots`; the stored order is never
/// touched.
pub fn sorted_unassigned_view(chart: &SeatingChart) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..chart.unassigned_lots.len()).collect();
    indices.sort_by_cached_key(|&idx| {
        let lot = &chart.unassigned_lots[idx];
        let marker = u8::from(!is_urgency_marker(&lot.shipping_date));
        let date = match parse_flexible_date(&lot.shipping_date) {
            Some(date) => (0u8, date),
            None => (1, NaiveDate::MAX),
        };
        (marker, date, lot.lot_id.clone())
    });
    indices
}

/// Candidate names for the seat picker: deduplicated, sorted, blanks
/// dropped. The rendering layer prepends its own vacant entry.
pub fn inspector_candidates(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

fn all_lots<'a>(chart: &'a SeatingChart) -> impl Iterator<Item = &'a LotAssignment> {
    chart
        .seats
        .iter()
        .flat_map(|seat| seat.lots.iter())
        .chain(chart.unassigned_lots.iter())
}

fn seat_index(chart: &SeatingChart, seat_id: &str) -> Result<usize, MoveError> {
    chart
        .seats
        .iter()
        .position(|seat| seat.id == seat_id)
        .ok_or_else(|| MoveError::SeatNotFound(seat_id.to_string()))
}

fn host_lots<'a>(
    chart: &'a SeatingChart,
    host: &LotHost,
) -> Result<&'a Vec<LotAssignment>, MoveError> {
    match host {
        LotHost::Unassigned => Ok(&chart.unassigned_lots),
        LotHost::Seat(seat_id) => chart
            .seat(seat_id)
            .map(|seat| &seat.lots)
            .ok_or_else(|| MoveError::SeatNotFound(seat_id.clone())),
    }
}

fn host_lots_mut<'a>(
    chart: &'a mut SeatingChart,
    host: &LotHost,
) -> Result<&'a mut Vec<LotAssignment>, MoveError> {
    match host {
        LotHost::Unassigned => Ok(&mut chart.unassigned_lots),
        LotHost::Seat(seat_id) => chart
            .seat_mut(seat_id)
            .map(|seat| &mut seat.lots)
            .ok_or_else(|| MoveError::SeatNotFound(seat_id.clone())),
    }
}

fn detach_lot(
    chart: &mut SeatingChart,
    host: &LotHost,
    lot_id: &str,
) -> Result<LotAssignment, MoveError> {
    let lots = host_lots_mut(chart, host)?;
    let idx = lots
        .iter()
        .position(|lot| lot.lot_id == lot_id)
        .ok_or_else(|| MoveError::LotNotFound(lot_id.to_string()))?;
    Ok(lots.remove(idx))
}

fn insert_lot(lots: &mut Vec<LotAssignment>, lot: LotAssignment, index: Option<usize>) {
    let idx = index.unwrap_or(lots.len()).min(lots.len());
    lots.insert(idx, lot);
}

/// Owns the chart and gates transitions by the current mode.
#[derive(Debug, Default)]
pub struct BoardController {
    chart: SeatingChart,
    mode: BoardMode,
    selected_seat: Option<String>,
    drag: Option<LotDrag>,
}

impl BoardController {
    pub fn new(chart: SeatingChart) -> Self {
        Self {
            chart,
            mode: BoardMode::default(),
            selected_seat: None,
            drag: None,
        }
    }

    pub fn chart(&self) -> &SeatingChart {
        &self.chart
    }

    /// Declarative snapshot for the rendering surface.
    pub fn snapshot(&self) -> SeatingChart {
        self.chart.clone()
    }

    pub fn into_chart(self) -> SeatingChart {
        self.chart
    }

    pub fn mode(&self) -> BoardMode {
        self.mode
    }

    /// Switch modes. Leaving seat-edit drops the selection; any in-flight
    /// drag is cancelled either way.
    pub fn set_mode(&mut self, mode: BoardMode) {
        self.mode = mode;
        self.drag = None;
        if mode != BoardMode::SeatEdit {
            self.selected_seat = None;
        }
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(match self.mode {
            BoardMode::LotEdit => BoardMode::SeatEdit,
            BoardMode::SeatEdit => BoardMode::LotEdit,
        });
    }

    pub fn selected_seat(&self) -> Option<&str> {
        self.selected_seat.as_deref()
    }

    /// Select a seat for panel editing (seat-edit mode only).
    pub fn select_seat(&mut self, seat_id: &str) -> Result<(), MoveError> {
        if self.mode != BoardMode::SeatEdit {
            return Err(MoveError::WrongMode);
        }
        seat_index(&self.chart, seat_id)?;
        self.selected_seat = Some(seat_id.to_string());
        Ok(())
    }

    /// Start dragging a lot card (lot-edit mode only).
    pub fn begin_lot_drag(&mut self, from: LotHost, lot_id: &str) -> Result<(), MoveError> {
        if self.mode != BoardMode::LotEdit {
            return Err(MoveError::WrongMode);
        }
        self.drag = Some(begin_move(&self.chart, from, lot_id)?);
        Ok(())
    }

    /// Drop the dragged lot. Dropping with no drag in flight is a no-op.
    pub fn drop_lot(&mut self, to: LotHost, insert_index: Option<usize>) -> Result<(), MoveError> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        apply_move(&mut self.chart, &drag, to, insert_index)
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Swap two seat positions (seat-edit mode only).
    pub fn swap_seats(&mut self, first_id: &str, second_id: &str) -> Result<(), MoveError> {
        if self.mode != BoardMode::SeatEdit {
            return Err(MoveError::WrongMode);
        }
        swap_seats(&mut self.chart, first_id, second_id)
    }

    /// Split a lot into `count` clones (not available in seat-edit mode).
    pub fn split_lot(
        &mut self,
        host: &LotHost,
        lot_id: &str,
        count: u32,
        suffix: &str,
    ) -> Result<(), MoveError> {
        if self.mode == BoardMode::SeatEdit {
            return Err(MoveError::WrongMode);
        }
        split_lot(&mut self.chart, host, lot_id, count, suffix)
    }

    /// Apply the side-panel edit to a seat (seat-edit mode only). `row` /
    /// `col` update only when given; the name is trimmed.
    pub fn apply_seat_edit(
        &mut self,
        seat_id: &str,
        name: &str,
        row: Option<f64>,
        col: Option<f64>,
    ) -> Result<(), MoveError> {
        if self.mode != BoardMode::SeatEdit {
            return Err(MoveError::WrongMode);
        }
        let idx = seat_index(&self.chart, seat_id)?;
        let seat = &mut self.chart.seats[idx];
        seat.name = name.trim().to_string();
        if let Some(row) = row {
            seat.row = row;
        }
        if let Some(col) = col {
            seat.col = col;
        }
        Ok(())
    }

    /// Vacate a seat: name and lots are emptied in place (seat-edit mode
    /// only).
    pub fn clear_seat(&mut self, seat_id: &str) -> Result<(), MoveError> {
        if self.mode != BoardMode::SeatEdit {
            return Err(MoveError::WrongMode);
        }
        let idx = seat_index(&self.chart, seat_id)?;
        let seat = &mut self.chart.seats[idx];
        seat.name.clear();
        seat.lots.clear();
        Ok(())
    }

    /// Re-attach an externally computed inspector→lots mapping (see
    /// [`attach_lots_to_chart`]).
    pub fn attach_lots(
        &mut self,
        lots_by_inspector: &std::collections::HashMap<String, Vec<LotAssignment>>,
        preserve_split_lots: bool,
    ) {
        attach_lots_to_chart(&mut self.chart, lots_by_inspector, preserve_split_lots);
    }

    /// Repair split bookkeeping; run before every save.
    pub fn normalize(&mut self) {
        normalize_split_metadata(&mut self.chart);
    }

    pub fn highlight(&self, host: &LotHost, lot_id: &str) -> HighlightSet {
        highlight_targets(&self.chart, host, lot_id)
    }

    pub fn unassigned_view(&self) -> Vec<usize> {
        sorted_unassigned_view(&self.chart)
    }
}
