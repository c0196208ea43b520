//! Inspector→lots mapping loader
//!
//! The shortage extraction pipeline emits a JSON object keyed by
//! inspector name or seat id, each value a list of lot assignments.
//! Malformed entries are skipped, not fatal - a half-broken mapping still
//! binds what it can.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use furiwake_domain::model::LotAssignment;
use furiwake_types::{Error, Result};

/// Load the mapping consumed by the lot-to-seat binder.
pub fn load_lots_mapping<P: AsRef<Path>>(path: P) -> Result<HashMap<String, Vec<LotAssignment>>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let serde_json::Value::Object(entries) = value else {
        return Err(Error::Validation(
            "ロット割当マッピングはオブジェクトである必要があります".to_string(),
        ));
    };

    let mut mapping = HashMap::new();
    for (key, lots) in entries {
        let lots = match lots {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<LotAssignment>(item).ok())
                .collect(),
            _ => Vec::new(),
        };
        mapping.insert(key, lots);
    }
    Ok(mapping)
}
