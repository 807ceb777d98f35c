// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `ffibench build` command - Stage the shared library and smoke-test it.
//!
//! The native code itself is compiled by cargo; this command checks that the
//! shared object loads, copies it into the build directory and makes one call
//! through each binding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use ffibench_core::binding::platform_library_name;
use ffibench_core::{Binding, Config, DynamicBinding, LinkedBinding, NATIVE_SYMBOLS};

pub fn execute(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Loading dynamic binding");

    let dynamic = DynamicBinding::load_from(config.library.path.as_deref())
        .context("Failed to load the native library")?;
    let linked = LinkedBinding::new();

    let staged = stage_library(dynamic.path(), &config.library.build_dir)?;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    RESOLVED NATIVE SYMBOLS                   ║");
    println!("╠════════════════════════════╦═════════════════════════════════╣");
    println!("║ Symbol                     ║ Address                         ║");
    println!("╠════════════════════════════╬═════════════════════════════════╣");

    for name in NATIVE_SYMBOLS {
        let address = dynamic.symbol_address(name)?;
        println!("║ {:<26} ║ {:<31} ║", name, format!("{:#018x}", address));
    }

    println!("╚════════════════════════════╩═════════════════════════════════╝");
    println!();
    println!("Loaded from: {}", dynamic.path().display());
    println!("Staged at:   {}", staged.display());
    println!("Symbols:     {}", dynamic.symbol_count());
    println!();

    smoke_test(&linked, &dynamic)?;
    println!("✓ Both bindings answered the smoke test");

    Ok(())
}

/// Copy the shared object into `build_dir` under its platform file name.
fn stage_library(source: &Path, build_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(build_dir)
        .with_context(|| format!("Failed to create {}", build_dir.display()))?;

    let target = build_dir.join(platform_library_name());
    let same_file = match (fs::canonicalize(source), fs::canonicalize(&target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };

    if same_file {
        tracing::debug!(path = %target.display(), "Library already staged");
    } else {
        fs::copy(source, &target).with_context(|| {
            format!("Failed to copy {} to {}", source.display(), target.display())
        })?;
        tracing::info!(from = %source.display(), to = %target.display(), "Library staged");
    }

    Ok(target)
}

fn smoke_test(linked: &dyn Binding, dynamic: &dyn Binding) -> anyhow::Result<()> {
    for binding in [linked, dynamic] {
        let sum = binding.add_numbers(2, 3);
        if sum != 5 {
            bail!("{} binding: add_numbers(2, 3) returned {}", binding.kind(), sum);
        }

        let total = binding.sum_array(&[1.0, 2.0, 3.0])?;
        if (total - 6.0).abs() > 1e-9 {
            bail!("{} binding: sum_array([1, 2, 3]) returned {}", binding.kind(), total);
        }

        let joined = binding.string_concat("ffi", "bench")?;
        if joined != "ffibench" {
            bail!("{} binding: string_concat returned {:?}", binding.kind(), joined);
        }

        tracing::debug!(binding = %binding.kind(), "Smoke test passed");
    }
    Ok(())
}
