// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict validation.
//!
//! Every section is optional; missing fields take the defaults of the
//! reference sweep (1000 timed calls after 50 warmup calls). Any invalid
//! field results in a HardValidationError that prevents the run.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{FfiBenchError, FfiBenchResult, HardValidationError};

/// Upper bound on timed iterations per case and binding.
const MAX_ITERATIONS: u64 = 10_000_000;
/// Upper bound on warmup iterations per case and binding.
const MAX_WARMUP: u64 = 1_000_000;

/// Configuration file looked up when none is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "ffibench.yaml";

/// Raw harness section as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHarnessConfig {
    #[serde(default = "default_iterations")]
    iterations: u64,
    #[serde(default = "default_warmup")]
    warmup: u64,
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default)]
    pin_cpu: Option<usize>,
    #[serde(default)]
    keep_samples: bool,
}

fn default_iterations() -> u64 {
    1000
}

fn default_warmup() -> u64 {
    50
}

fn default_seed() -> u64 {
    42
}

impl Default for RawHarnessConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            warmup: default_warmup(),
            seed: default_seed(),
            pin_cpu: None,
            keep_samples: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLibraryConfig {
    #[serde(default)]
    path: Option<String>,
    #[serde(default = "default_build_dir")]
    build_dir: String,
}

fn default_build_dir() -> String {
    "build".to_string()
}

impl Default for RawLibraryConfig {
    fn default() -> Self {
        Self {
            path: None,
            build_dir: default_build_dir(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutputConfig {
    #[serde(default = "default_results_file")]
    results_file: String,
    #[serde(default = "default_report_file")]
    report_file: String,
    #[serde(default = "default_plots_dir")]
    plots_dir: String,
}

fn default_results_file() -> String {
    "benchmark_results.json".to_string()
}

fn default_report_file() -> String {
    "benchmark_report.md".to_string()
}

fn default_plots_dir() -> String {
    "plots".to_string()
}

impl Default for RawOutputConfig {
    fn default() -> Self {
        Self {
            results_file: default_results_file(),
            report_file: default_report_file(),
            plots_dir: default_plots_dir(),
        }
    }
}

/// Raw root configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    harness: RawHarnessConfig,
    #[serde(default)]
    library: RawLibraryConfig,
    #[serde(default)]
    output: RawOutputConfig,
}

/// Validated timing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub iterations: u64,
    pub warmup: u64,
    /// Seed for generated inputs, so both bindings and repeated runs see the
    /// same data.
    pub seed: u64,
    /// Core to pin the benchmarking thread to, if any.
    pub pin_cpu: Option<usize>,
    /// Keep raw samples in the results file.
    pub keep_samples: bool,
}

/// Validated shared-library location settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Explicit shared object for the dynamic binding.
    pub path: Option<PathBuf>,
    /// Directory `ffibench build` stages the shared object into.
    pub build_dir: PathBuf,
}

/// Validated output locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub results_file: PathBuf,
    pub report_file: PathBuf,
    pub plots_dir: PathBuf,
}

/// Complete validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub harness: HarnessConfig,
    pub library: LibraryConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            harness: HarnessConfig {
                iterations: default_iterations(),
                warmup: default_warmup(),
                seed: default_seed(),
                pin_cpu: None,
                keep_samples: false,
            },
            library: LibraryConfig {
                path: None,
                build_dir: PathBuf::from(default_build_dir()),
            },
            output: OutputConfig {
                results_file: PathBuf::from(default_results_file()),
                report_file: PathBuf::from(default_report_file()),
                plots_dir: PathBuf::from(default_plots_dir()),
            },
        }
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a CLI invocation.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used when present and the built-in defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> FfiBenchResult<Config> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load_file(fallback)
                } else {
                    tracing::debug!("No configuration file found, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }

    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> FfiBenchResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(FfiBenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| FfiBenchError::Io {
            context: "reading config file",
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> FfiBenchResult<Config> {
        // An empty document is a valid "all defaults" config.
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| FfiBenchError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?
        };

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> FfiBenchResult<Config> {
        Ok(Config {
            harness: Self::validate_harness(raw.harness)?,
            library: Self::validate_library(raw.library)?,
            output: Self::validate_output(raw.output)?,
        })
    }

    fn validate_harness(raw: RawHarnessConfig) -> Result<HarnessConfig, HardValidationError> {
        if raw.iterations == 0 || raw.iterations > MAX_ITERATIONS {
            return Err(HardValidationError::InvalidFieldValue {
                field: "harness.iterations",
                value: raw.iterations.to_string(),
                reason: format!("Must be between 1 and {}", MAX_ITERATIONS),
            });
        }

        if raw.warmup > MAX_WARMUP {
            return Err(HardValidationError::InvalidFieldValue {
                field: "harness.warmup",
                value: raw.warmup.to_string(),
                reason: format!("Must not exceed {}", MAX_WARMUP),
            });
        }

        Ok(HarnessConfig {
            iterations: raw.iterations,
            warmup: raw.warmup,
            seed: raw.seed,
            pin_cpu: raw.pin_cpu,
            keep_samples: raw.keep_samples,
        })
    }

    fn validate_library(raw: RawLibraryConfig) -> Result<LibraryConfig, HardValidationError> {
        if raw.build_dir.trim().is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "library.build_dir",
                value: raw.build_dir,
                reason: "Build directory cannot be empty".to_string(),
            });
        }

        let path = match raw.path {
            Some(p) if p.trim().is_empty() => {
                return Err(HardValidationError::InvalidFieldValue {
                    field: "library.path",
                    value: p,
                    reason: "Library path cannot be empty; omit it to use the default".to_string(),
                })
            }
            Some(p) => Some(PathBuf::from(p)),
            None => None,
        };

        Ok(LibraryConfig {
            path,
            build_dir: PathBuf::from(raw.build_dir),
        })
    }

    fn validate_output(raw: RawOutputConfig) -> Result<OutputConfig, HardValidationError> {
        for (field, value) in [
            ("output.results_file", &raw.results_file),
            ("output.report_file", &raw.report_file),
            ("output.plots_dir", &raw.plots_dir),
        ] {
            if value.trim().is_empty() {
                return Err(HardValidationError::InvalidFieldValue {
                    field,
                    value: value.clone(),
                    reason: "Output path cannot be empty".to_string(),
                });
            }
        }

        if raw.results_file == raw.report_file {
            return Err(HardValidationError::SchemaValidation {
                message: format!(
                    "results_file and report_file must differ (both '{}')",
                    raw.results_file
                ),
            });
        }

        Ok(OutputConfig {
            results_file: PathBuf::from(raw.results_file),
            report_file: PathBuf::from(raw.report_file),
            plots_dir: PathBuf::from(raw.plots_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
harness:
  iterations: 500
  warmup: 20
  seed: 7
  pin_cpu: 0
  keep_samples: true

library:
  path: /opt/ffibench/libffibench.so
  build_dir: target/native

output:
  results_file: out/results.json
  report_file: out/report.md
  plots_dir: out/plots
"#;

    #[test]
    fn test_valid_config() {
        let config = ConfigLoader::load_string(VALID_CONFIG).unwrap();
        assert_eq!(config.harness.iterations, 500);
        assert_eq!(config.harness.warmup, 20);
        assert_eq!(config.harness.seed, 7);
        assert_eq!(config.harness.pin_cpu, Some(0));
        assert!(config.harness.keep_samples);
        assert_eq!(
            config.library.path.as_deref(),
            Some(Path::new("/opt/ffibench/libffibench.so"))
        );
        assert_eq!(config.output.plots_dir, PathBuf::from("out/plots"));
    }

    #[test]
    fn test_defaults_applied() {
        let config = ConfigLoader::load_string("harness:\n  iterations: 10\n").unwrap();
        assert_eq!(config.harness.iterations, 10);
        assert_eq!(config.harness.warmup, 50);
        assert_eq!(config.library.build_dir, PathBuf::from("build"));
        assert_eq!(
            config.output.results_file,
            PathBuf::from("benchmark_results.json")
        );
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = ConfigLoader::load_string("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = ConfigLoader::load_string("harness:\n  iterations: 0\n");
        assert!(matches!(result, Err(FfiBenchError::HardValidation(_))));
    }

    #[test]
    fn test_warmup_too_high() {
        let result = ConfigLoader::load_string("harness:\n  warmup: 2000000\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ConfigLoader::load_string("harness:\n  iteration: 10\n");
        assert!(matches!(result, Err(FfiBenchError::ConfigParse { .. })));
    }

    #[test]
    fn test_same_results_and_report_rejected() {
        let yaml = r#"
output:
  results_file: out.txt
  report_file: out.txt
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = ConfigLoader::resolve(Some(Path::new("/nonexistent/ffibench.yaml")));
        assert!(matches!(result, Err(FfiBenchError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_file_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ffibench.yaml");
        std::fs::write(&path, VALID_CONFIG).unwrap();
        let config = ConfigLoader::load_file(&path).unwrap();
        assert_eq!(config.harness.iterations, 500);
    }
}
