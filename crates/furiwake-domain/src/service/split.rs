//! Split metadata bookkeeping
//!
//! Lots split on the board carry `split_group` / `split_index` /
//! `split_total`. Documents edited by hand or written by older builds may
//! instead carry only an implicit `-S<digits>` id suffix; normalization
//! rewrites every multi-member group into the explicit form so siblings
//! stay consistent across moves. The suffix sniff is a heuristic carried
//! over from the extraction system: two unrelated lots that happen to end
//! in `-S1` / `-S2` will merge into one group.

use std::collections::HashMap;

use crate::model::{LotAssignment, SeatingChart};

/// Strip a trailing `-S<digits>` suffix, returning the base id.
pub fn strip_split_suffix(lot_id: &str) -> Option<&str> {
    let pos = lot_id.rfind("-S")?;
    let digits = &lot_id[pos + 2..];
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(&lot_id[..pos])
    } else {
        None
    }
}

/// Whether the lot is an explicit split member: it carries a non-empty
/// `split_group`, or its id ends in `-S<digits>`.
pub fn is_split_member(lot: &LotAssignment) -> bool {
    explicit_group(lot).is_some() || strip_split_suffix(&lot.lot_id).is_some()
}

fn explicit_group(lot: &LotAssignment) -> Option<&str> {
    lot.split_group.as_deref().filter(|group| !group.is_empty())
}

fn group_key(lot: &LotAssignment) -> Option<String> {
    if let Some(group) = explicit_group(lot) {
        return Some(group.to_string());
    }
    strip_split_suffix(&lot.lot_id).map(str::to_string)
}

#[derive(Clone, Copy)]
enum Loc {
    Seat(usize, usize),
    Pool(usize),
}

fn lot_mut(chart: &mut SeatingChart, loc: Loc) -> &mut LotAssignment {
    match loc {
        Loc::Seat(seat_idx, lot_idx) => &mut chart.seats[seat_idx].lots[lot_idx],
        Loc::Pool(lot_idx) => &mut chart.unassigned_lots[lot_idx],
    }
}

/// Repair split bookkeeping across the whole document.
///
/// Groups are keyed by `split_group` when present, else by the id with the
/// `-S<digits>` suffix stripped. Members are numbered in encounter order:
/// seats in document order, each seat's lots in order, then the unassigned
/// pool. Groups with a single member are left untouched. Idempotent.
pub fn normalize_split_metadata(chart: &mut SeatingChart) {
    // key, canonical group id (first explicit value seen), member locations
    let mut groups: Vec<(String, Option<String>, Vec<Loc>)> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();

    {
        let mut visit = |loc: Loc, lot: &LotAssignment| {
            let Some(key) = group_key(lot) else { return };
            let slot = *index_of.entry(key.clone()).or_insert_with(|| {
                groups.push((key, None, Vec::new()));
                groups.len() - 1
            });
            let entry = &mut groups[slot];
            if entry.1.is_none() {
                if let Some(group) = explicit_group(lot) {
                    entry.1 = Some(group.to_string());
                }
            }
            entry.2.push(loc);
        };
        for (seat_idx, seat) in chart.seats.iter().enumerate() {
            for (lot_idx, lot) in seat.lots.iter().enumerate() {
                visit(Loc::Seat(seat_idx, lot_idx), lot);
            }
        }
        for (lot_idx, lot) in chart.unassigned_lots.iter().enumerate() {
            visit(Loc::Pool(lot_idx), lot);
        }
    }

    for (key, canonical, members) in groups {
        if members.len() < 2 {
            continue;
        }
        let canonical = canonical.unwrap_or(key);
        let total = members.len() as u32;
        for (idx, loc) in members.into_iter().enumerate() {
            let lot = lot_mut(chart, loc);
            lot.split_group = Some(canonical.clone());
            lot.split_total = Some(total);
            lot.split_index = Some(idx as u32 + 1);
        }
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Split `total` hours into `segments` parts rounded to 4 decimals, the
/// fractional remainder landing on the last part so the parts sum back to
/// the original.
pub fn distribute_hours(total: f64, segments: usize) -> Vec<f64> {
    distribute_float(total, segments, 4)
}

fn distribute_float(total: f64, segments: usize, decimals: u32) -> Vec<f64> {
    if segments == 0 || !total.is_finite() {
        return vec![0.0; segments];
    }
    let base = round_to(total / segments as f64, decimals);
    let mut values = vec![base; segments];
    values[segments - 1] = round_to(total - base * (segments - 1) as f64, decimals);
    values
}

/// Split an integer quantity as evenly as possible, the first parts taking
/// the extra units.
pub fn distribute_integer(total: i64, segments: usize) -> Vec<i64> {
    if segments == 0 {
        return Vec::new();
    }
    let base = total.div_euclid(segments as i64);
    let remainder = total - base * segments as i64;
    (0..segments as i64)
        .map(|idx| if idx < remainder { base + 1 } else { base })
        .collect()
}

/// Produce the clones that replace one lot when it is split `count` ways.
///
/// Each clone gets a fresh id `<sanitized base>-<suffix>-S<n>`, the shared
/// `lot_key` of the original, and group metadata consistent with
/// [`normalize_split_metadata`]. A positive inspection time is apportioned
/// across the clones; quantities are distributed whole-units-first when
/// integral, to 3 decimals otherwise. Counts below 2 are clamped to 2.
pub fn create_split_lots(lot: &LotAssignment, count: u32, suffix: &str) -> Vec<LotAssignment> {
    let count = count.max(2) as usize;
    let group_label = match explicit_group(lot) {
        Some(group) => group.to_string(),
        None => lot.lot_id.clone(),
    };
    let id_base = sanitize_id(&format!("{}-{}", group_label, suffix));
    let lot_key = lot.effective_lot_key().to_string();

    let inspection_parts = match lot.inspection_time {
        Some(hours) if hours > 0.0 => Some(distribute_hours(hours, count)),
        _ => None,
    };
    let quantity_parts = if lot.quantity > 0.0 {
        Some(if lot.quantity.fract() == 0.0 {
            distribute_integer(lot.quantity as i64, count)
                .into_iter()
                .map(|q| q as f64)
                .collect()
        } else {
            distribute_float(lot.quantity, count, 3)
        })
    } else {
        None
    };

    (0..count)
        .map(|idx| {
            let mut clone = lot.clone();
            clone.lot_id = format!("{}-S{}", id_base, idx + 1);
            clone.lot_key = Some(lot_key.clone());
            clone.split_group = Some(group_label.clone());
            clone.split_index = Some(idx as u32 + 1);
            clone.split_total = Some(count as u32);
            if let Some(parts) = &inspection_parts {
                clone.inspection_time = Some(parts[idx]);
            }
            if let Some(parts) = &quantity_parts {
                clone.quantity = parts[idx];
            }
            clone
        })
        .collect()
}

fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SeatSlot;

    fn lot(id: &str) -> LotAssignment {
        LotAssignment {
            lot_id: id.to_string(),
            ..Default::default()
        }
    }

    fn chart_with_pool(lots: Vec<LotAssignment>) -> SeatingChart {
        SeatingChart {
            unassigned_lots: lots,
            ..Default::default()
        }
    }

    #[test]
    fn strips_split_suffix() {
        assert_eq!(strip_split_suffix("L1-S1"), Some("L1"));
        assert_eq!(strip_split_suffix("L1-S12"), Some("L1"));
        assert_eq!(strip_split_suffix("L1-S"), None);
        assert_eq!(strip_split_suffix("L1-Sx"), None);
        assert_eq!(strip_split_suffix("L1"), None);
    }

    #[test]
    fn implicit_members_gain_explicit_group() {
        let mut chart = chart_with_pool(vec![lot("L1-S1"), lot("L1-S2")]);
        normalize_split_metadata(&mut chart);
        for (idx, member) in chart.unassigned_lots.iter().enumerate() {
            assert_eq!(member.split_group.as_deref(), Some("L1"));
            assert_eq!(member.split_total, Some(2));
            assert_eq!(member.split_index, Some(idx as u32 + 1));
        }
    }

    #[test]
    fn singleton_groups_are_untouched() {
        let mut chart = chart_with_pool(vec![lot("L1-S1"), lot("L2")]);
        normalize_split_metadata(&mut chart);
        assert_eq!(chart.unassigned_lots[0].split_group, None);
        assert_eq!(chart.unassigned_lots[0].split_total, None);
    }

    #[test]
    fn canonical_id_prefers_existing_group() {
        let mut first = lot("renamed-S1");
        first.split_group = Some("G7".to_string());
        let mut second = lot("G7-S2");
        second.split_group = None;
        let mut chart = chart_with_pool(vec![first, second]);
        normalize_split_metadata(&mut chart);
        assert!(chart
            .unassigned_lots
            .iter()
            .all(|member| member.split_group.as_deref() == Some("G7")));
    }

    #[test]
    fn encounter_order_spans_seats_then_pool() {
        let mut chart = SeatingChart {
            seats: vec![
                SeatSlot {
                    id: "s1".to_string(),
                    name: "佐藤".to_string(),
                    row: 1.0,
                    col: 1.0,
                    lots: vec![lot("X-S2")],
                },
                SeatSlot {
                    id: "s2".to_string(),
                    name: "鈴木".to_string(),
                    row: 1.0,
                    col: 2.0,
                    lots: vec![lot("X-S1")],
                },
            ],
            unassigned_lots: vec![lot("X-S3")],
            ..Default::default()
        };
        normalize_split_metadata(&mut chart);
        // indices follow encounter order, not the suffix numbers
        assert_eq!(chart.seats[0].lots[0].split_index, Some(1));
        assert_eq!(chart.seats[1].lots[0].split_index, Some(2));
        assert_eq!(chart.unassigned_lots[0].split_index, Some(3));
        assert!(chart.seats[0].lots[0].split_total == Some(3));
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut chart = chart_with_pool(vec![lot("L1-S1"), lot("L1-S2"), lot("L2")]);
        normalize_split_metadata(&mut chart);
        let once = chart.clone();
        normalize_split_metadata(&mut chart);
        assert_eq!(chart, once);
    }

    #[test]
    fn distributes_hours_with_remainder_on_last() {
        assert_eq!(distribute_hours(3.0, 3), vec![1.0, 1.0, 1.0]);
        let parts = distribute_hours(1.0, 3);
        assert_eq!(parts.len(), 3);
        let sum: f64 = parts.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(parts.iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn distributes_integers_extra_units_first() {
        assert_eq!(distribute_integer(10, 3), vec![4, 3, 3]);
        assert_eq!(distribute_integer(9, 3), vec![3, 3, 3]);
        assert_eq!(distribute_integer(1, 2), vec![1, 0]);
    }

    #[test]
    fn split_clones_share_key_and_group() {
        let original = LotAssignment {
            lot_id: "L01-001".to_string(),
            quantity: 90.0,
            inspection_time: Some(3.0),
            ..Default::default()
        };
        let clones = create_split_lots(&original, 3, "a1b2c3");
        assert_eq!(clones.len(), 3);
        for (idx, clone) in clones.iter().enumerate() {
            assert_eq!(clone.lot_id, format!("L01-001-a1b2c3-S{}", idx + 1));
            assert_eq!(clone.lot_key.as_deref(), Some("L01-001"));
            assert_eq!(clone.split_group.as_deref(), Some("L01-001"));
            assert_eq!(clone.split_index, Some(idx as u32 + 1));
            assert_eq!(clone.split_total, Some(3));
            assert_eq!(clone.inspection_time, Some(1.0));
            assert_eq!(clone.quantity, 30.0);
        }
    }

    #[test]
    fn split_without_inspection_time_leaves_it_unset() {
        let original = lot("L1");
        let clones = create_split_lots(&original, 2, "zz");
        assert!(clones.iter().all(|c| c.inspection_time.is_none()));
        assert!(clones.iter().all(|c| c.quantity == 0.0));
    }

    #[test]
    fn split_count_is_clamped_to_two() {
        let clones = create_split_lots(&lot("L1"), 1, "zz");
        assert_eq!(clones.len(), 2);
    }

    #[test]
    fn split_then_normalize_is_a_fixpoint() {
        let original = LotAssignment {
            lot_id: "L01-001".to_string(),
            quantity: 50.0,
            ..Default::default()
        };
        let mut chart = chart_with_pool(create_split_lots(&original, 2, "a1b2c3"));
        let before = chart.clone();
        normalize_split_metadata(&mut chart);
        assert_eq!(chart, before);
    }

    #[test]
    fn japanese_ids_are_sanitized_in_clone_ids() {
        let clones = create_split_lots(&lot("ロットA"), 2, "zz");
        assert_eq!(clones[0].lot_id, "---A-zz-S1");
        assert_eq!(clones[0].split_group.as_deref(), Some("ロットA"));
    }
}
