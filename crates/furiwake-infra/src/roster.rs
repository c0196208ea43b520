//! Inspector master CSV loader
//!
//! The master is maintained in a spreadsheet and exported either as UTF-8
//! or as CP932 (Shift-JIS), the usual encoding of Japanese business
//! systems. The first two rows are headers; names sit in the second
//! column.

use std::fs;
use std::path::Path;

use encoding_rs::SHIFT_JIS;
use furiwake_types::{Error, Result};

/// Load the inspector roster, in file order, blanks skipped.
pub fn load_inspector_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
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
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(decoded.as_bytes());

    let mut names = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::CsvLoader(e.to_string()))?;
        // rows 1 and 2 are header rows
        if idx < 2 {
            continue;
        }
        if let Some(name) = record.get(1) {
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }

    if names.is_empty() {
        return Err(Error::Validation(format!(
            "検査員マスタから名前を読み込めません: {}",
            path.display()
        )));
    }
    Ok(names)
}
