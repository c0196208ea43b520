//! Seating chart document model
//!
//! The chart is a plain serde document: seats with positions and lot
//! cards, an unassigned-lot pool, and the inspector-to-source-column map
//! used when lots move between seats.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// One lot card on the board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LotAssignment {
    pub lot_id: String, // ロットID（分割で増殖する）
    /// Stable identity surviving splits; equals the pre-split lot id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_key: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub product_code: String, // 品番
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub product_name: String, // 品名
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub process_name: String, // 工程名
    #[serde(default, skip_serializing_if = "is_zero")]
    pub quantity: f64, // 数量（分割後は端数になり得る）
    #[serde(default, skip_serializing_if = "is_zero")]
    pub sec_per_piece: f64, // 秒/個
    /// Inspection time in hours, when derived from the product master.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspection_time: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shipping_date: String, // 出荷予定日（日付または「当日洗浄」等のマーカー文字列）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_index: Option<u32>, // 1-based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_total: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_inspector_col: String, // 抽出元システムの検査員列キー
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

impl LotAssignment {
    /// Identity that survives splitting: `lot_key` when set, else `lot_id`.
    pub fn effective_lot_key(&self) -> &str {
        self.lot_key.as_deref().unwrap_or(&self.lot_id)
    }
}

/// One seat slot on the grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatSlot {
    pub id: String, // "s1".."s36"
    #[serde(default)]
    pub name: String, // 検査員名（"" = 空席）
    pub row: f64,
    pub col: f64, // 5段目は 1.5, 3.5, ... の半端な列に置く
    #[serde(default, deserialize_with = "lots_or_empty")]
    pub lots: Vec<LotAssignment>,
}

impl SeatSlot {
    pub fn is_vacant(&self) -> bool {
        self.name.is_empty()
    }

    /// Total workload of the seat in seconds.
    ///
    /// A lot with a positive inspection time wins over the
    /// quantity × sec-per-piece fallback.
    pub fn total_seconds(&self) -> f64 {
        self.lots
            .iter()
            .map(|lot| match lot.inspection_time {
                Some(hours) if hours > 0.0 => hours * 3600.0,
                _ => lot.quantity * lot.sec_per_piece,
            })
            .sum()
    }
}

/// The persisted seating chart document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatingChart {
    pub seats: Vec<SeatSlot>,
    #[serde(default)]
    pub unassigned_lots: Vec<LotAssignment>,
    #[serde(default)]
    pub inspector_column_map: BTreeMap<String, String>,
}

impl SeatingChart {
    pub fn seat(&self, seat_id: &str) -> Option<&SeatSlot> {
        self.seats.iter().find(|seat| seat.id == seat_id)
    }

    pub fn seat_mut(&mut self, seat_id: &str) -> Option<&mut SeatSlot> {
        self.seats.iter_mut().find(|seat| seat.id == seat_id)
    }
}

/// Accept anything in the `lots` slot: a missing or non-array value
/// becomes an empty list, and elements that do not parse as lots are
/// skipped rather than failing the whole document.
fn lots_or_empty<'de, D>(deserializer: D) -> Result<Vec<LotAssignment>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(lots_from_value(value))
}

pub(crate) fn lots_from_value(value: serde_json::Value) -> Vec<LotAssignment> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}
