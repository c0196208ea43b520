//! Shortage / production-lot table loaders
//!
//! The extraction layer hands these over as CSV with the source system's
//! Japanese column names. Numeric cells tolerate thousands separators;
//! blank or unparseable numbers count as 0. Production lots without a
//! parseable instruction date are unusable downstream and are skipped
//! here.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use encoding_rs::SHIFT_JIS;
use furiwake_domain::model::{ProductionLot, ShortageRecord};
use furiwake_domain::service::dates::parse_flexible_date;
use furiwake_types::{Error, Result};

const SHORTAGE_COLUMNS: [&str; 8] = [
    "品番",
    "品名",
    "客先",
    "出荷予定日",
    "出荷数",
    "在庫数",
    "梱包・完了",
    "不足数",
];

const LOT_COLUMNS: [&str; 3] = ["品番", "数量", "指示日"];

/// Load the per-product shortage table.
pub fn load_shortage_table<P: AsRef<Path>>(path: P) -> Result<Vec<ShortageRecord>> {
    let (headers, records) = read_table(path.as_ref())?;
    let columns = column_index(&headers, &SHORTAGE_COLUMNS)?;

    let mut rows = Vec::new();
    for record in records {
        let cell = |name: &str| cell_value(&record, &columns, name);
        rows.push(ShortageRecord {
            product_code: cell("品番"),
            product_name: cell("品名"),
            customer: cell("客先"),
            shipping_date: cell("出荷予定日"),
            shipment_qty: parse_i64(&cell("出荷数")),
            stock_qty: parse_i64(&cell("在庫数")),
            packaging_qty: parse_i64(&cell("梱包・完了")),
            shortage_qty: parse_i64(&cell("不足数")),
        });
    }
    Ok(rows)
}

/// Load the candidate production lots. Rows with an unparseable 指示日 are
/// dropped.
pub fn load_production_lots<P: AsRef<Path>>(path: P) -> Result<Vec<ProductionLot>> {
    let (headers, records) = read_table(path.as_ref())?;
    let columns = column_index(&headers, &LOT_COLUMNS)?;

    let mut lots = Vec::new();
    for record in records {
        let cell = |name: &str| cell_value(&record, &columns, name);
        let Some(instruction_date) = parse_flexible_date(&cell("指示日")) else {
            continue;
        };
        lots.push(ProductionLot {
            product_code: cell("品番"),
            quantity: parse_i64(&cell("数量")),
            instruction_date,
            machine_no: cell("号機"),
            current_process: cell("現在工程名"),
            current_process_sub: cell("現在工程二次処理"),
            production_lot_id: cell("生産ロットID"),
        });
    }
    Ok(lots)
}

fn read_table(path: &Path) -> Result<(csv::StringRecord, Vec<csv::StringRecord>)> {
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    let bytes = fs::read(path)?;
    let decoded = match std::str::from_utf8(&bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = SHIFT_JIS.decode(&bytes);
            text.into_owned()
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(decoded.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::CsvLoader(e.to_string()))?
        .clone();
    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record.map_err(|e| Error::CsvLoader(e.to_string()))?);
    }
    Ok((headers, records))
}

fn column_index(
    headers: &csv::StringRecord,
    required: &[&str],
) -> Result<HashMap<String, usize>> {
    let index: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_string(), idx))
        .collect();
    for column in required {
        if !index.contains_key(*column) {
            return Err(Error::Validation(format!("必須列がありません: {}", column)));
        }
    }
    Ok(index)
}

fn cell_value(
    record: &csv::StringRecord,
    columns: &HashMap<String, usize>,
    name: &str,
) -> String {
    columns
        .get(name)
        .and_then(|&idx| record.get(idx))
        .unwrap_or("")
        .to_string()
}

fn parse_i64(s: &str) -> i64 {
    let cleaned = s.trim().replace(',', "");
    cleaned.parse().unwrap_or(0)
}
