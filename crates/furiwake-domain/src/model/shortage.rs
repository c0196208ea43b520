//! Shortage and production lot records
//!
//! Transient inputs and outputs of the allocation engine. Both tables are
//! produced by the external extraction layer; nothing here is persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-product shortage aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortageRecord {
    pub product_code: String,  // 品番
    pub product_name: String,  // 品名
    pub customer: String,      // 客先
    pub shipping_date: String, // 出荷予定日
    pub shipment_qty: i64,     // 出荷数
    pub stock_qty: i64,        // 在庫数
    pub packaging_qty: i64,    // 梱包・完了
    pub shortage_qty: i64,     // 不足数 = 在庫数 + 梱包・完了 - 出荷数（マイナスで不足）
}

/// Candidate production lot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionLot {
    pub product_code: String,       // 品番
    pub quantity: i64,              // 数量
    pub instruction_date: NaiveDate, // 指示日
    pub machine_no: String,         // 号機
    pub current_process: String,    // 現在工程名
    pub current_process_sub: String, // 現在工程二次処理
    pub production_lot_id: String,  // 生産ロットID
}

/// One allocation result row
///
/// `shortage_qty` carries the remaining shortage *before* this lot is
/// applied - the extraction report has always shown the running deficit
/// that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotAllocation {
    pub shipping_date: String,
    pub product_code: String,
    pub product_name: String,
    pub customer: String,
    pub shipment_qty: i64,
    pub stock_qty: i64,
    pub packaging_qty: i64,
    pub shortage_qty: i64,
    pub production_lot_id: String,
    pub lot_quantity: i64,
    pub instruction_date: NaiveDate,
    pub machine_no: String,
    pub current_process: String,
    pub current_process_sub: String,
}
