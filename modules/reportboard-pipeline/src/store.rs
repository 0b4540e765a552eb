use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use reportboard_common::{reference_reports, Report, ReportBoardError, Result};

/// Read-only snapshot of every report for the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Report>,
    /// Array elements that were not report objects.
    skipped: usize,
}

/// Per-snapshot counts of records the pipeline will only partly use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotAnomalies {
    pub malformed_timestamps: usize,
    pub unknown_categories: usize,
    pub unknown_statuses: usize,
    pub unknown_locations: usize,
    pub missing_ids: usize,
    pub duplicate_ids: usize,
    pub skipped_records: usize,
}

impl SnapshotAnomalies {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl RecordStore {
    pub fn new(records: Vec<Report>) -> Self {
        Self::with_skipped(records, 0)
    }

    fn with_skipped(records: Vec<Report>, skipped: usize) -> Self {
        let store = Self { records, skipped };
        let anomalies = store.anomalies();
        if !anomalies.is_clean() {
            warn!(
                records = store.len(),
                malformed_timestamps = anomalies.malformed_timestamps,
                unknown_categories = anomalies.unknown_categories,
                unknown_statuses = anomalies.unknown_statuses,
                unknown_locations = anomalies.unknown_locations,
                missing_ids = anomalies.missing_ids,
                duplicate_ids = anomalies.duplicate_ids,
                skipped_records = anomalies.skipped_records,
                "Records snapshot has partially usable records"
            );
        }
        store
    }

    /// The built-in reference dataset.
    pub fn reference() -> Self {
        Self::new(reference_reports())
    }

    /// Parse a JSON array of report objects.
    ///
    /// Records are decoded one at a time: an element that is not a report
    /// object is skipped and counted, the rest of the snapshot still loads.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| ReportBoardError::Load(format!("invalid JSON: {e}")))?;
        let serde_json::Value::Array(items) = value else {
            return Err(ReportBoardError::Load(
                "records snapshot must be a JSON array".to_string(),
            ));
        };

        let mut records = Vec::with_capacity(items.len());
        let mut skipped = 0;
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Report>(item) {
                Ok(report) => records.push(report),
                Err(e) => {
                    debug!(index, error = %e, "Skipping snapshot element");
                    skipped += 1;
                }
            }
        }
        Ok(Self::with_skipped(records, skipped))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReportBoardError::Load(format!("{}: {e}", path.display())))?;
        let store = Self::from_json_str(&content)?;
        info!(path = %path.display(), records = store.len(), "Records snapshot loaded");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Report> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Report] {
        &self.records
    }

    /// First record with this id.
    pub fn get(&self, id: &str) -> Option<&Report> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn anomalies(&self) -> SnapshotAnomalies {
        let mut seen = HashSet::new();
        let start = SnapshotAnomalies {
            skipped_records: self.skipped,
            ..SnapshotAnomalies::default()
        };
        self.records.iter().fold(start, |mut acc, r| {
            acc.malformed_timestamps += usize::from(r.parsed_timestamp().is_none());
            acc.unknown_categories += usize::from(r.category_tag().is_none());
            acc.unknown_statuses += usize::from(r.status_tag().is_none());
            acc.unknown_locations += usize::from(r.location_tag().is_none());
            if r.id.is_empty() {
                acc.missing_ids += 1;
            } else {
                acc.duplicate_ids += usize::from(!seen.insert(r.id.as_str()));
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_store_is_clean() {
        let store = RecordStore::reference();
        assert_eq!(store.len(), 8);
        assert!(store.anomalies().is_clean());
        assert_eq!(store.get("004").map(|r| r.location.as_str()), Some("North Sector"));
        assert!(store.get("999").is_none());
    }

    #[test]
    fn test_from_json_str() {
        let store = RecordStore::from_json_str(
            r#"[
                {"id": "a", "category": "Rape", "location": "Uptown", "timestamp": "2025-05-14T09:30:00", "status": "Completed"},
                {"id": "b", "category": "Theft", "timestamp": "soon"}
            ]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        let anomalies = store.anomalies();
        assert_eq!(anomalies.malformed_timestamps, 1);
        assert_eq!(anomalies.unknown_categories, 1);
        assert_eq!(anomalies.unknown_statuses, 1);
        assert_eq!(anomalies.unknown_locations, 1);
        assert_eq!(anomalies.duplicate_ids, 0);
    }

    #[test]
    fn test_from_json_str_record_without_id_loads() {
        let store = RecordStore::from_json_str(
            r#"[
                {"category": "Rape", "location": "Uptown", "timestamp": "2025-05-14T09:30:00", "status": "Pending"},
                {"id": "", "category": "Rape", "location": "Uptown", "timestamp": "2025-05-14T09:30:00", "status": "Pending"}
            ]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].id, "");
        let anomalies = store.anomalies();
        assert_eq!(anomalies.missing_ids, 2);
        // Two missing ids are not a duplicate.
        assert_eq!(anomalies.duplicate_ids, 0);
    }

    #[test]
    fn test_from_json_str_bad_field_values_do_not_block_load() {
        let store = RecordStore::from_json_str(
            r#"[
                {"id": "a", "category": "Rape", "location": "Uptown", "timestamp": "2025-05-14T09:30:00", "status": "Completed"},
                {"id": "b", "category": null, "location": "Uptown", "timestamp": 1747390980000, "status": "Pending"}
            ]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get("a").is_some_and(|r| r.is_well_formed()));
        let b = store.get("b").unwrap();
        assert_eq!(b.category, "");
        assert_eq!(b.timestamp, "1747390980000");
        let anomalies = store.anomalies();
        assert_eq!(anomalies.unknown_categories, 1);
        assert_eq!(anomalies.malformed_timestamps, 1);
        assert_eq!(anomalies.skipped_records, 0);
    }

    #[test]
    fn test_from_json_str_skips_non_object_elements() {
        let store = RecordStore::from_json_str(
            r#"[
                42,
                {"id": "a", "category": "Rape", "location": "Uptown", "timestamp": "2025-05-14T09:30:00", "status": "Completed"},
                "loose text"
            ]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.anomalies().skipped_records, 2);
        assert!(!store.anomalies().is_clean());
    }

    #[test]
    fn test_from_json_str_rejects_non_array() {
        let err = RecordStore::from_json_str(r#"{"id": "a"}"#).unwrap_err();
        assert!(matches!(err, ReportBoardError::Load(_)));
        let err = RecordStore::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ReportBoardError::Load(_)));
    }

    #[test]
    fn test_duplicate_ids_counted() {
        let store = RecordStore::new(vec![
            Report::new("a", "Rape", "Uptown", "2025-05-14T09:30:00", "Completed"),
            Report::new("a", "Rape", "Uptown", "2025-05-14T09:30:00", "Completed"),
        ]);
        assert_eq!(store.anomalies().duplicate_ids, 1);
    }
}
