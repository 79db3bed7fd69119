//! End-to-end pipeline: load snapshots from a source, build the matrix,
//! apply the view, and export CSV.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use ttperf_analysis::config::LoaderConfig;
use ttperf_analysis::export::{export_view, ExportScope, TimeUnit};
use ttperf_analysis::loader::{Manifest, ManifestEntry, SnapshotLoader, SnapshotSource};
use ttperf_analysis::matrix::PerformanceMatrix;
use ttperf_analysis::view::{SortMode, ViewState};
use ttperf_analysis::{Measurement, Result, Snapshot, SnapshotMetadata};

struct FixtureSource {
    manifest: Manifest,
    snapshots: HashMap<String, Snapshot>,
}

impl FixtureSource {
    fn new(days: &[(&str, &str, &[(&str, f64)])]) -> Self {
        let mut files = Vec::new();
        let mut snapshots = HashMap::new();
        for (date, commit, ops) in days {
            let filename = format!("{date}.json");
            files.push(ManifestEntry {
                path: format!("data/daily/{filename}"),
                filename: filename.clone(),
                measurement_date: date.to_string(),
            });
            snapshots.insert(filename, make_snapshot(date, commit, ops));
        }
        Self {
            manifest: Manifest { files },
            snapshots,
        }
    }
}

fn make_snapshot(date: &str, commit: &str, ops: &[(&str, f64)]) -> Snapshot {
    Snapshot {
        metadata: SnapshotMetadata {
            measurement_date: date.to_string(),
            git_commit_id: commit.to_string(),
            total_tests: ops.len() as u64,
            successful_tests: ops.len() as u64,
            failed_tests: 0,
        },
        results: ops
            .iter()
            .map(|(name, duration)| Measurement {
                operation_name: name.to_string(),
                test_name: format!("test_{name}"),
                average_duration_ns: *duration,
                min_duration_ns: *duration,
                max_duration_ns: *duration,
                std_deviation_ns: 0.0,
                successful_runs: 5,
                timestamp: date.to_string(),
            })
            .collect(),
    }
}

#[async_trait]
impl SnapshotSource for FixtureSource {
    async fn fetch_manifest(&self) -> Result<Manifest> {
        Ok(self.manifest.clone())
    }

    async fn fetch_latest(&self) -> Result<Snapshot> {
        let last = &self.manifest.files[self.manifest.files.len() - 1];
        Ok(self.snapshots[&last.filename].clone())
    }

    async fn fetch_snapshot(&self, entry: &ManifestEntry) -> Result<Snapshot> {
        Ok(self.snapshots[&entry.filename].clone())
    }
}

#[tokio::test]
async fn load_build_filter_and_export() {
    let source = FixtureSource::new(&[
        (
            "2024-03-01",
            "aaaa1111bbbb",
            &[("add", 100.0), ("relu", 200.0), ("argmax", 9_999.0)],
        ),
        (
            "2024-03-02",
            "cccc2222dddd",
            &[("add", 101.0), ("relu", 201.0)],
        ),
        (
            "2024-03-03",
            "eeee3333ffff",
            &[("add", 150.0), ("relu", 140.0)],
        ),
    ]);

    let loader = SnapshotLoader::new(source, LoaderConfig::default());
    let data = loader.initial_load(10).await.unwrap();
    assert_eq!(data.currently_loaded, 3);
    assert_eq!(data.total_available, 3);

    let matrix = PerformanceMatrix::build(&data.daily);
    assert_eq!(matrix.columns.len(), 3);
    // The retired operation never reaches the matrix.
    assert!(matrix.rows.iter().all(|row| row.name != "argmax"));

    // Day 2 moved nothing past the thresholds, so it is filtered out.
    let view = ViewState {
        sort: SortMode::MostDegraded,
        ..ViewState::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    let (file_name, csv) = export_view(
        &matrix,
        &view,
        ExportScope::CurrentView,
        TimeUnit::Nanoseconds,
        today,
    )
    .unwrap();

    assert_eq!(file_name, "ttnn-performance-current-view-2024-03-04.csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Operation,Category,2024-03-01 (aaaa1111),2024-03-03 (eeee3333)"
    );
    // add regressed +50%, relu improved -30%.
    assert_eq!(lines[1], "add,Binary Arithmetic,100ns,150ns");
    assert_eq!(lines[2], "relu,Unary,200ns,140ns");
    assert_eq!(lines.len(), 3);
}
