//! Output formatting module

use furiwake_domain::model::{LotAllocation, SeatingChart};
use furiwake_types::OutputFormat;
use furiwake_types::Result;

pub fn output_chart(output_format: OutputFormat, chart: &SeatingChart) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(chart)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\n座席表 / Seating Chart");
    println!("======================");
    println!(
        "{:<6} {:>4} {:>4}  {:<12} {:>5} {:>8}",
        "seat", "row", "col", "担当", "lots", "workload"
    );
    println!("{}", "-".repeat(48));
    for seat in &chart.seats {
        let name = if seat.is_vacant() { "(空席)" } else { &seat.name };
        println!(
            "{:<6} {:>4} {:>4}  {:<12} {:>5} {:>7.1}H",
            seat.id,
            seat.row,
            seat.col,
            name,
            seat.lots.len(),
            seat.total_seconds() / 3600.0
        );
    }
    println!();
    if chart.unassigned_lots.is_empty() {
        println!("未割当ロットはありません");
    } else {
        println!("未割当ロット: {}件", chart.unassigned_lots.len());
        for lot in &chart.unassigned_lots {
            println!("  {} {}", lot.lot_id, lot.product_name);
        }
    }

    Ok(())
}

pub fn output_allocations(output_format: OutputFormat, rows: &[LotAllocation]) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(rows)?;
        println!("{}", content);
        return Ok(());
    }

    if rows.is_empty() {
        println!("ロット割り当て結果がありません");
        return Ok(());
    }

    println!("\nロット割り当て / Lot Allocation");
    println!("===============================");
    println!(
        "{:<12} {:<10} {:>8} {:<12} {:>6} {:<12}",
        "出荷予定日", "品番", "不足数", "生産ロットID", "数量", "指示日"
    );
    println!("{}", "-".repeat(70));
    for row in rows {
        println!(
            "{:<12} {:<10} {:>8} {:<12} {:>6} {:<12}",
            row.shipping_date,
            row.product_code,
            row.shortage_qty,
            row.production_lot_id,
            row.lot_quantity,
            row.instruction_date.format("%Y/%m/%d")
        );
    }
    println!();
    println!("ロット割り当て完了: {}件", rows.len());

    Ok(())
}
