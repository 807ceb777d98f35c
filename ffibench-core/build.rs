// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Builds the native workload library twice: a static archive for the
//! linked binding and a shared object for the dynamic binding.

use std::env;
use std::path::{Path, PathBuf};

use cc::Build;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let native_dir = manifest_dir.join("native");
    let source = native_dir.join("ffibench.c");

    println!("cargo:rerun-if-changed={}", source.display());
    println!(
        "cargo:rerun-if-changed={}",
        native_dir.join("ffibench.h").display()
    );

    let mut cfg = Build::new();
    cfg.include(&native_dir)
        .file(&source)
        .opt_level(3)
        .warnings(true);

    build_shared_object(&cfg, &native_dir, &source);

    cfg.compile("ffibench_native");

    let target = env::var("TARGET").unwrap();
    if !target.contains("windows") {
        println!("cargo:rustc-link-lib=m");
    }
}

/// Compile the same source into a shared object in `OUT_DIR` and export its
/// path to the crate as `FFIBENCH_NATIVE_DYLIB`.
fn build_shared_object(cfg: &Build, native_dir: &Path, source: &Path) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let target = env::var("TARGET").unwrap();
    let compiler = cfg.get_compiler();

    if compiler.is_like_msvc() {
        println!(
            "cargo:warning=shared object not built for MSVC targets; set FFIBENCH_LIBRARY to a prebuilt ffibench.dll"
        );
        return;
    }

    let file_name = if target.contains("apple") {
        "libffibench.dylib"
    } else if target.contains("windows") {
        "ffibench.dll"
    } else {
        "libffibench.so"
    };
    let output = out_dir.join(file_name);

    let mut cmd = compiler.to_command();
    cmd.arg("-shared")
        .arg("-fPIC")
        .arg("-O3")
        .arg("-I")
        .arg(native_dir)
        .arg(source)
        .arg("-o")
        .arg(&output);

    // Keep intra-library calls bound to the shared object's own copies.
    if !target.contains("apple") && !target.contains("windows") {
        cmd.arg("-Wl,-Bsymbolic").arg("-lm");
    }

    let status = cmd
        .status()
        .unwrap_or_else(|e| panic!("failed to run C compiler for shared object: {}", e));
    if !status.success() {
        panic!("C compiler failed to build {} ({})", output.display(), status);
    }

    println!("cargo:rustc-env=FFIBENCH_NATIVE_DYLIB={}", output.display());
}
