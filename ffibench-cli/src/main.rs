// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! FFIBench CLI
//!
//! Builds, verifies, runs and analyzes the linked-versus-dynamic binding
//! benchmarks.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ffibench_core::{Category, ConfigLoader};

mod commands;
mod cpu_affinity;

/// FFIBench - Compare build-time linked and run-time loaded native bindings
#[derive(Parser)]
#[command(name = "ffibench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ./ffibench.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the shared library, stage it and smoke-test both bindings
    Build,

    /// Check that both bindings agree on every input
    Test,

    /// Run the benchmark sweep and save the results file
    #[command(alias = "run-benchmarks")]
    Run {
        /// 10 timed iterations after 1 warmup call per case
        #[arg(short, long)]
        quick: bool,

        /// Restrict the sweep to a category (repeatable)
        #[arg(long = "category", value_name = "CATEGORY")]
        categories: Vec<Category>,
    },

    /// Write the Markdown report and charts from the results file
    Analyze,

    /// Remove results, report, charts and the staged library
    Clean,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    // Fail fast on invalid config
    let config = ConfigLoader::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Build => commands::build::execute(&config),
        Commands::Test => commands::test::execute(&config),
        Commands::Run { quick, categories } => commands::run::execute(&config, quick, &categories),
        Commands::Analyze => commands::analyze::execute(&config),
        Commands::Clean => commands::clean::execute(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_alias_and_filters() {
        let cli = Cli::try_parse_from([
            "ffibench",
            "run-benchmarks",
            "--quick",
            "--category",
            "memory",
            "--category",
            "pointer-chasing",
        ])
        .unwrap();

        match cli.command {
            Commands::Run { quick, categories } => {
                assert!(quick);
                assert_eq!(categories, vec![Category::Memory, Category::PointerChasing]);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result = Cli::try_parse_from(["ffibench", "run", "--category", "gpu"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["ffibench", "-v", "-c", "bench.yaml", "clean"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("bench.yaml")));
        assert!(matches!(cli.command, Commands::Clean));
    }
}
