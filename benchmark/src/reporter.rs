// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! JSON persistence for benchmark results.
//!
//! The results file is written once per sweep: serialized into a temporary
//! file in the destination directory, then renamed over the target.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::metrics::BenchmarkReport;

/// Errors that can occur while saving or loading results.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Results file not found: {0}")]
    NotFound(PathBuf),
}

impl ReporterError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// JSON reporter bound to one results file.
pub struct JsonReporter {
    path: PathBuf,
}

impl JsonReporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save a report, replacing any previous results file atomically.
    ///
    /// Returns the path written.
    pub fn save(&self, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| ReporterError::io(&dir, e))?;

        let tmp = NamedTempFile::new_in(&dir).map_err(|e| ReporterError::io(&dir, e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, report)?;
            writer
                .flush()
                .map_err(|e| ReporterError::io(tmp.path(), e))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| ReporterError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| ReporterError::io(&self.path, e.error))?;

        tracing::info!(path = %self.path.display(), cases = report.results.len(), "Results saved");
        Ok(self.path.clone())
    }

    /// Load the results file this reporter is bound to.
    pub fn load_results(&self) -> Result<BenchmarkReport, ReporterError> {
        Self::load(&self.path)
    }

    /// Load an existing benchmark report from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<BenchmarkReport, ReporterError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReporterError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| ReporterError::io(path, e))?;
        let report = serde_json::from_reader(BufReader::new(file))?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{CaseResult, RunMetadata, Speedup, TimingStats};
    use ffibench_core::Category;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_report() -> BenchmarkReport {
        let linked = TimingStats::from_samples(vec![100, 200, 300], false);
        let dynamic = TimingStats::from_samples(vec![300, 400, 500], true);
        let mut report = BenchmarkReport::new(RunMetadata {
            iterations: 3,
            warmup: 0,
            seed: 42,
            ..RunMetadata::default()
        });
        report.add_result(CaseResult {
            name: "noop(42)".to_string(),
            category: Category::CallOverhead,
            params: BTreeMap::new(),
            iterations: 3,
            warmup: 0,
            input_crc32: 0xDEAD_BEEF,
            speedup: Speedup::between(&linked, &dynamic),
            linked,
            dynamic,
        });
        report
    }

    #[test]
    fn test_reporter_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path().join("nested/results.json"));

        let report = sample_report();
        let path = reporter.save(&report).unwrap();
        assert!(path.exists());

        let loaded = reporter.load_results().unwrap();
        assert_eq!(loaded.run_id, report.run_id);
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.results[0].name, "noop(42)");
        assert_eq!(loaded.results[0].dynamic.samples, Some(vec![300, 400, 500]));
        assert!((loaded.results[0].speedup.unwrap().ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_save_replaces_previous_file_and_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("results.json");
        fs::write(&target, "stale").unwrap();

        JsonReporter::new(&target).save(&sample_report()).unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(JsonReporter::load(&target).is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = JsonReporter::load(temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ReporterError::NotFound(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonReporter::load(&path),
            Err(ReporterError::Serialization(_))
        ));
    }
}
