//! Lot-to-seat binder
//!
//! Reattaches an externally computed inspector→lots mapping to the chart.
//! Keys may be inspector names or seat ids; resolution tries the trimmed
//! seat name, the raw seat name, then the seat id, and the first key with
//! a non-empty list wins.

use std::collections::HashMap;

use crate::model::{LotAssignment, SeatingChart};

use super::split::is_split_member;

/// Replace each seat's lots from the mapping.
///
/// With `preserve_split_lots`, split members already sitting on a seat
/// (explicit `split_group` or `-S<digits>` id suffix) survive a refresh
/// that does not know about them: any such lot whose `lot_id` is absent
/// from the resolved list is re-appended after it. Seats with no match are
/// emptied (or keep only their preserved split lots).
pub fn attach_lots_to_chart(
    chart: &mut SeatingChart,
    lots_by_inspector: &HashMap<String, Vec<LotAssignment>>,
    preserve_split_lots: bool,
) {
    for seat in &mut chart.seats {
        let trimmed = seat.name.trim().to_string();
        let mut resolved: Vec<LotAssignment> = Vec::new();
        for key in [trimmed.as_str(), seat.name.as_str(), seat.id.as_str()] {
            if key.is_empty() {
                continue;
            }
            match lots_by_inspector.get(key) {
                Some(candidate) if !candidate.is_empty() => {
                    resolved = candidate.clone();
                    break;
                }
                _ => {}
            }
        }
        if preserve_split_lots {
            let kept: Vec<LotAssignment> = seat
                .lots
                .iter()
                .filter(|lot| is_split_member(lot))
                .filter(|lot| !resolved.iter().any(|r| r.lot_id == lot.lot_id))
                .cloned()
                .collect();
            resolved.extend(kept);
        }
        seat.lots = resolved;
    }
}
