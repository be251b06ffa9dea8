// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: CLI entry point for dataset generation, playback and verification.
// Author: Lukas Bower

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use torus_telemetry::collab::CollaboratorRegistry;
use torus_telemetry::player::TerminalRenderer;
use torus_telemetry::{generator, TelemetryConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Dataset path, overriding config and environment.
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Generate the dataset file
    Generate {
        /// Write coordinates in exact round-trip form
        #[arg(long)]
        exact: bool,
    },
    /// Play the dataset as a looping animation
    ///
    /// Without --max-ticks playback loops until the process is interrupted;
    /// an interrupt terminates immediately rather than stopping the session.
    Play {
        /// Stop cleanly after this many ticks
        #[arg(long)]
        max_ticks: Option<u64>,
        /// Milliseconds between ticks
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Render grid width
        #[arg(long, default_value_t = 100)]
        cols: usize,
        /// Render grid height
        #[arg(long, default_value_t = 36)]
        rows: usize,
    },
    /// Recompute frame signatures from the dataset file
    Verify,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = TelemetryConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.dataset {
        cfg.dataset_path = path;
    }

    match cli.cmd {
        Cmd::Generate { exact } => {
            cfg.generator.exact_coordinates |= exact;
            let summary = generator::generate(&cfg, &CollaboratorRegistry::with_builtins())?;
            println!(
                "{} frames x {} entities written to {} (avg smoothness {:.2}%)",
                summary.frames,
                summary.entities,
                summary.path.display(),
                summary.avg_smoothness_pct
            );
        }
        Cmd::Play {
            max_ticks,
            interval_ms,
            cols,
            rows,
        } => {
            if max_ticks.is_some() {
                cfg.playback.max_ticks = max_ticks;
            }
            if let Some(ms) = interval_ms {
                cfg.playback.interval_ms = ms;
            }
            let mut renderer = TerminalRenderer::new(io::stdout().lock(), cols, rows);
            torus_telemetry::play(&cfg, &mut renderer)?;
        }
        Cmd::Verify => {
            let report = torus_telemetry::verify(&cfg)?;
            if !report.is_clean() {
                bail!(
                    "{} of {} frames fail signature verification (first: frame {})",
                    report.mismatched.len(),
                    report.checked,
                    report.mismatched[0]
                );
            }
            println!("{} frames verified", report.checked);
        }
    }
    Ok(())
}
