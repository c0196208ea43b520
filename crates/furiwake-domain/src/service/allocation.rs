//! Shortage allocation engine
//!
//! Assigns candidate production lots against per-product shortages in a
//! fully deterministic order. Each emitted row reports the remaining
//! shortage *before* its lot is applied - the downstream report has always
//! shown the running deficit that way, so the engine reproduces it.

use chrono::NaiveDate;

use crate::model::{LotAllocation, ProductionLot, ShortageRecord};

use super::dates::parse_flexible_date;

/// Greedily assign production lots to products with a negative shortage.
///
/// Products are processed in first-encounter order; per-product fields are
/// taken from the product's first shortage row. Candidates are consumed in
/// ascending instruction-date order until the running shortage reaches
/// zero. A product with no candidates yields no rows; exhausting the
/// candidates before covering the deficit yields a silent partial result.
pub fn assign_lots_to_shortage(
    shortage: &[ShortageRecord],
    lots: &[ProductionLot],
) -> Vec<LotAllocation> {
    let mut results = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for record in shortage.iter().filter(|r| r.shortage_qty < 0) {
        if seen.contains(&record.product_code.as_str()) {
            continue;
        }
        seen.push(&record.product_code);

        let mut candidates: Vec<&ProductionLot> = lots
            .iter()
            .filter(|lot| lot.product_code == record.product_code)
            .collect();
        if candidates.is_empty() {
            continue;
        }
        candidates.sort_by_key(|lot| lot.instruction_date);

        let mut remaining = record.shortage_qty;
        for lot in candidates {
            if remaining >= 0 {
                break;
            }
            results.push(LotAllocation {
                shipping_date: record.shipping_date.clone(),
                product_code: record.product_code.clone(),
                product_name: record.product_name.clone(),
                customer: record.customer.clone(),
                shipment_qty: record.shipment_qty,
                stock_qty: record.stock_qty,
                packaging_qty: record.packaging_qty,
                shortage_qty: remaining,
                production_lot_id: lot.production_lot_id.clone(),
                lot_quantity: lot.quantity,
                instruction_date: lot.instruction_date,
                machine_no: lot.machine_no.clone(),
                current_process: lot.current_process.clone(),
                current_process_sub: lot.current_process_sub.clone(),
            });
            remaining += lot.quantity;
        }
    }

    sort_allocations(&mut results);
    results
}

/// Hard output contract: shipping date ascending (unparseable values after
/// all dates, lexically among themselves), then product code, then
/// instruction date.
pub fn sort_allocations(rows: &mut Vec<LotAllocation>) {
    rows.sort_by_cached_key(|row| {
        (
            shipping_sort_key(&row.shipping_date),
            row.product_code.clone(),
            row.instruction_date,
        )
    });
}

fn shipping_sort_key(value: &str) -> (u8, NaiveDate, String) {
    match parse_flexible_date(value) {
        Some(date) => (0, date, String::new()),
        None => (1, NaiveDate::MAX, value.to_string()),
    }
}

/// Inspection time in hours for a lot: seconds-per-piece from the product
/// master times the lot quantity, rounded to 1 decimal.
pub fn derive_inspection_time(sec_per_piece: f64, quantity: i64) -> f64 {
    let hours = sec_per_piece * quantity as f64 / 3600.0;
    (hours * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn shortage(code: &str, shipping: &str, qty: i64) -> ShortageRecord {
        ShortageRecord {
            product_code: code.to_string(),
            product_name: format!("品名{}", code),
            customer: "客先A".to_string(),
            shipping_date: shipping.to_string(),
            shipment_qty: 100,
            stock_qty: 30,
            packaging_qty: 20,
            shortage_qty: qty,
        }
    }

    fn production_lot(code: &str, id: &str, qty: i64, instruction: NaiveDate) -> ProductionLot {
        ProductionLot {
            product_code: code.to_string(),
            quantity: qty,
            instruction_date: instruction,
            machine_no: "3号機".to_string(),
            current_process: "成形".to_string(),
            current_process_sub: String::new(),
            production_lot_id: id.to_string(),
        }
    }

    #[test]
    fn reports_pre_consumption_shortage_per_row() {
        let shortage = vec![shortage("P1", "2024/01/10", -50)];
        let lots = vec![
            production_lot("P1", "L2", 40, date(2024, 1, 2)),
            production_lot("P1", "L1", 20, date(2024, 1, 1)),
            production_lot("P1", "L3", 99, date(2024, 1, 3)),
        ];
        let rows = assign_lots_to_shortage(&shortage, &lots);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].production_lot_id, "L1");
        assert_eq!(rows[0].shortage_qty, -50);
        assert_eq!(rows[0].lot_quantity, 20);
        assert_eq!(rows[1].production_lot_id, "L2");
        assert_eq!(rows[1].shortage_qty, -30);
        // remaining reached +10, so L3 is never consumed
    }

    #[test]
    fn product_without_candidates_is_silently_skipped() {
        let shortage = vec![shortage("P1", "2024/01/10", -50)];
        let rows = assign_lots_to_shortage(&shortage, &[]);
        assert!(rows.is_empty());
    }

    #[test]
    fn exhausted_candidates_give_partial_result() {
        let shortage = vec![shortage("P1", "2024/01/10", -100)];
        let lots = vec![production_lot("P1", "L1", 30, date(2024, 1, 1))];
        let rows = assign_lots_to_shortage(&shortage, &lots);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].shortage_qty, -100);
    }

    #[test]
    fn non_negative_shortage_rows_are_ignored() {
        let shortage = vec![shortage("P1", "2024/01/10", 5)];
        let lots = vec![production_lot("P1", "L1", 30, date(2024, 1, 1))];
        assert!(assign_lots_to_shortage(&shortage, &lots).is_empty());
    }

    #[test]
    fn duplicate_shortage_rows_use_the_first() {
        let mut second = shortage("P1", "2024/01/10", -10);
        second.stock_qty = 999;
        let shortage = vec![shortage("P1", "2024/01/10", -50), second];
        let lots = vec![production_lot("P1", "L1", 60, date(2024, 1, 1))];
        let rows = assign_lots_to_shortage(&shortage, &lots);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].shortage_qty, -50);
        assert_eq!(rows[0].stock_qty, 30);
    }

    #[test]
    fn output_sorted_by_shipping_date_first() {
        let shortage = vec![
            shortage("P1", "2024-01-05", -10),
            shortage("P2", "2024-01-02", -10),
        ];
        let lots = vec![
            production_lot("P1", "A", 20, date(2024, 1, 1)),
            production_lot("P2", "B", 20, date(2024, 1, 1)),
        ];
        let rows = assign_lots_to_shortage(&shortage, &lots);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_code, "P2");
        assert_eq!(rows[1].product_code, "P1");
    }

    #[test]
    fn rows_of_one_product_follow_instruction_date() {
        let shortage = vec![shortage("P1", "2024/01/10", -100)];
        let lots = vec![
            production_lot("P1", "LATE", 30, date(2024, 2, 1)),
            production_lot("P1", "EARLY", 30, date(2024, 1, 1)),
        ];
        let rows = assign_lots_to_shortage(&shortage, &lots);
        assert_eq!(rows[0].production_lot_id, "EARLY");
        assert_eq!(rows[1].production_lot_id, "LATE");
    }

    #[test]
    fn unparseable_shipping_dates_sort_after_dates() {
        let shortage = vec![
            shortage("P1", "当日洗浄", -10),
            shortage("P2", "2024-06-01", -10),
        ];
        let lots = vec![
            production_lot("P1", "A", 20, date(2024, 1, 1)),
            production_lot("P2", "B", 20, date(2024, 1, 1)),
        ];
        let rows = assign_lots_to_shortage(&shortage, &lots);
        assert_eq!(rows[0].product_code, "P2");
    }

    #[test]
    fn derives_inspection_hours_rounded_to_one_decimal() {
        assert_eq!(derive_inspection_time(2.5, 1440), 1.0);
        assert_eq!(derive_inspection_time(4.8, 90), 0.1);
        assert_eq!(derive_inspection_time(0.0, 100), 0.0);
    }
}
