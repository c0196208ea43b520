//! Board service - chart lifecycle orchestration
//!
//! Ties the chart store to the board controller: ensure-on-open, the
//! rebind pipeline, and normalize-before-save. A failed save leaves the
//! in-memory chart intact so the caller can retry.

use std::collections::HashMap;
use std::path::PathBuf;

use furiwake_domain::model::{LotAssignment, SeatingChart};
use furiwake_domain::service::{BoardController, LotHost};
use furiwake_store::ChartStore;
use furiwake_types::{MoveError, Result};
use uuid::Uuid;

pub struct BoardService {
    store: ChartStore,
    board: BoardController,
}

impl BoardService {
    /// Open the chart at `path`, rebuilding it from the roster when
    /// missing, corrupt, or undersized.
    pub fn open(path: impl Into<PathBuf>, inspector_names: &[String]) -> Result<Self> {
        let store = ChartStore::new(path);
        let chart = store.ensure_exists(inspector_names)?;
        Ok(Self {
            store,
            board: BoardController::new(chart),
        })
    }

    pub fn board(&self) -> &BoardController {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut BoardController {
        &mut self.board
    }

    pub fn chart(&self) -> &SeatingChart {
        self.board.chart()
    }

    /// Re-attach an externally computed inspector→lots mapping, then
    /// persist - the binder pipeline always saves.
    pub fn rebind(
        &mut self,
        lots_by_inspector: &HashMap<String, Vec<LotAssignment>>,
        preserve_split_lots: bool,
    ) -> Result<()> {
        self.board.attach_lots(lots_by_inspector, preserve_split_lots);
        self.save()
    }

    /// Normalize split bookkeeping, then persist the chart.
    pub fn save(&mut self) -> Result<()> {
        self.board.normalize();
        self.store.save(self.board.chart())
    }

    /// Split a lot, generating the disambiguating id suffix.
    pub fn split_lot(
        &mut self,
        host: &LotHost,
        lot_id: &str,
        count: u32,
    ) -> std::result::Result<(), MoveError> {
        let suffix = new_split_suffix();
        self.board.split_lot(host, lot_id, count, &suffix)
    }
}

/// Short random suffix keeping split clone ids unique across sessions.
pub fn new_split_suffix() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use furiwake_domain::service::GRID_SIZE;
    use tempfile::tempdir;

    fn roster() -> Vec<String> {
        ["佐藤", "鈴木"].iter().map(|s| s.to_string()).collect()
    }

    fn lot(id: &str) -> LotAssignment {
        LotAssignment {
            lot_id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn open_builds_and_persists_a_missing_chart() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("chart.json");
        let service = BoardService::open(&path, &roster()).unwrap();
        assert_eq!(service.chart().seats.len(), GRID_SIZE);
        assert!(path.exists());
    }

    #[test]
    fn save_normalizes_implicit_split_ids() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("chart.json");
        let mut service = BoardService::open(&path, &roster()).unwrap();

        let mut mapping = HashMap::new();
        mapping.insert("佐藤".to_string(), vec![lot("L9-S1"), lot("L9-S2")]);
        service.rebind(&mapping, false).unwrap();

        let reloaded = ChartStore::new(&path).load().unwrap();
        let seat = reloaded
            .seats
            .iter()
            .find(|seat| seat.name == "佐藤")
            .unwrap();
        assert!(seat
            .lots
            .iter()
            .all(|l| l.split_group.as_deref() == Some("L9")));
    }

    #[test]
    fn split_generates_unique_clone_ids() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut service = BoardService::open(dir.path().join("chart.json"), &roster()).unwrap();
        let first_lot_id = service.chart().seats[0].lots[0].lot_id.clone();
        let host = LotHost::Seat("s1".to_string());
        service.split_lot(&host, &first_lot_id, 2).unwrap();
        let seat = service.chart().seat("s1").unwrap();
        let mut ids: Vec<_> = seat.lots.iter().map(|l| l.lot_id.clone()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
        assert!(seat
            .lots
            .iter()
            .filter(|l| l.split_group.is_some())
            .all(|l| l.lot_key.as_deref() == Some(first_lot_id.as_str())));
    }
}
