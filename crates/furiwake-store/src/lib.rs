//! Persistent store for the seating chart document
//!
//! One JSON file holds the whole chart. Loading is lenient about lot
//! lists (see the domain model); anything worse - unreadable file,
//! malformed JSON, fewer seats than the grid - makes `ensure_exists`
//! rebuild the document from the roster instead of failing.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use furiwake_domain::model::SeatingChart;
use furiwake_domain::service::{attach_placeholder_lots, build_initial_chart, GRID_SIZE};
use furiwake_types::Result;

/// Chart document store bound to one file path.
pub struct ChartStore {
    path: PathBuf,
}

impl ChartStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the chart. Fails with a decode error on malformed JSON and an
    /// IO error when the file is unreadable.
    pub fn load(&self) -> Result<SeatingChart> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let chart = serde_json::from_reader(reader)?;
        Ok(chart)
    }

    /// Save the chart, creating the parent directory if needed. Japanese
    /// text is written as-is (UTF-8, not escaped).
    pub fn save(&self, chart: &SeatingChart) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, chart)?;
        Ok(())
    }

    /// Return the stored chart when it loads and covers the full grid;
    /// otherwise rebuild from the roster, seed placeholder lots, persist,
    /// and return the rebuilt chart. Corrupt or undersized documents
    /// trigger a full rebuild, never a partial repair.
    pub fn ensure_exists(&self, inspector_names: &[String]) -> Result<SeatingChart> {
        if self.path.exists() {
            if let Ok(chart) = self.load() {
                if chart.seats.len() >= GRID_SIZE {
                    return Ok(chart);
                }
            }
        }
        let mut chart = build_initial_chart(inspector_names);
        attach_placeholder_lots(&mut chart);
        self.save(&chart)?;
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furiwake_domain::model::LotAssignment;
    use tempfile::tempdir;

    fn roster() -> Vec<String> {
        ["佐藤", "鈴木", "高橋"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = ChartStore::new(dir.path().join("seating_chart.json"));

        let mut chart = build_initial_chart(&roster());
        attach_placeholder_lots(&mut chart);
        chart.unassigned_lots.push(LotAssignment {
            lot_id: "U-001".to_string(),
            product_name: "品番X-999".to_string(),
            shipping_date: "2024/06/01".to_string(),
            inspection_time: Some(1.5),
            ..Default::default()
        });
        chart
            .inspector_column_map
            .insert("佐藤".to_string(), "W03".to_string());

        store.save(&chart).expect("Failed to save chart");
        let loaded = store.load().expect("Failed to load chart");
        assert_eq!(loaded, chart);
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = ChartStore::new(dir.path().join("nested").join("chart.json"));
        store.save(&build_initial_chart(&roster())).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("chart.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(ChartStore::new(&path).load().is_err());
    }

    #[test]
    fn ensure_exists_builds_when_missing() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = ChartStore::new(dir.path().join("chart.json"));
        let chart = store.ensure_exists(&roster()).unwrap();
        assert_eq!(chart.seats.len(), GRID_SIZE);
        assert!(chart.seats.iter().all(|seat| !seat.lots.is_empty()));
        assert!(store.path().exists());
    }

    #[test]
    fn ensure_exists_returns_existing_full_chart() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = ChartStore::new(dir.path().join("chart.json"));
        let mut chart = build_initial_chart(&roster());
        chart.seats[0].name = "編集済み".to_string();
        store.save(&chart).unwrap();
        let loaded = store.ensure_exists(&roster()).unwrap();
        assert_eq!(loaded.seats[0].name, "編集済み");
        assert!(loaded.seats[0].lots.is_empty()); // no placeholder reseeding
    }

    #[test]
    fn ensure_exists_rebuilds_on_corrupt_document() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("chart.json");
        std::fs::write(&path, "not json at all").unwrap();
        let chart = ChartStore::new(&path).ensure_exists(&roster()).unwrap();
        assert_eq!(chart.seats.len(), GRID_SIZE);
    }

    #[test]
    fn ensure_exists_rebuilds_on_undersized_chart() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = ChartStore::new(dir.path().join("chart.json"));
        let mut small = build_initial_chart(&roster());
        small.seats.truncate(GRID_SIZE - 1);
        store.save(&small).unwrap();
        let chart = store.ensure_exists(&roster()).unwrap();
        assert_eq!(chart.seats.len(), GRID_SIZE);
    }

    #[test]
    fn seats_without_lots_field_load_as_empty() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("chart.json");
        std::fs::write(
            &path,
            r#"{"seats":[{"id":"s1","name":"佐藤","row":1,"col":1}]}"#,
        )
        .unwrap();
        let chart = ChartStore::new(&path).load().unwrap();
        assert!(chart.seats[0].lots.is_empty());
        assert!(chart.unassigned_lots.is_empty());
    }
}
