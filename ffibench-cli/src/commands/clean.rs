// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `ffibench clean` command - Remove generated artifacts.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use ffibench_core::Config;

pub fn execute(config: &Config) -> anyhow::Result<()> {
    let targets = [
        config.output.results_file.as_path(),
        config.output.report_file.as_path(),
        config.output.plots_dir.as_path(),
        config.library.build_dir.as_path(),
    ];

    let mut removed = 0;
    for target in targets {
        if remove(target)? {
            println!("✓ Removed {}", target.display());
            removed += 1;
        }
    }

    if removed == 0 {
        println!("Nothing to clean.");
    }
    Ok(())
}

/// Remove a file or directory tree. Returns false if it did not exist.
fn remove(path: &Path) -> anyhow::Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).with_context(|| format!("Failed to stat {}", path.display())),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.with_context(|| format!("Failed to remove {}", path.display()))?;

    tracing::debug!(path = %path.display(), "Removed");
    Ok(true)
}
