// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! `slideshow` command-line front end.
//!
//! Reads a photo list, builds the slide set, runs the multi-start local search
//! and writes the resulting slideshow next to the input (or to `--output`).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use slideshow_ls::meta::MetaheuristicKind;
use slideshow_model::{generator::PairingStrategy, loading::CatalogLoader, report::SolutionReport};
use slideshow_solver::{config::SolverConfig, solver::Solver};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MetaheuristicArg {
    /// Accept strictly improving moves only.
    Greedy,
    /// Also accept moves that keep the best score.
    Plateau,
}

impl From<MetaheuristicArg> for MetaheuristicKind {
    fn from(arg: MetaheuristicArg) -> Self {
        match arg {
            MetaheuristicArg::Greedy => MetaheuristicKind::GreedyAscent,
            MetaheuristicArg::Plateau => MetaheuristicKind::PlateauAscent,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "slideshow", version, about = "Build a high-scoring slideshow from a photo list")]
struct Cli {
    /// Input photo list.
    input: PathBuf,

    /// Output path (defaults to the input path with extension `.out`, or with
    /// `.out` appended when the input already has that extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Wall-clock budget in seconds.
    #[arg(long, default_value_t = 10.0)]
    time_limit: f64,

    /// Maximum number of improvement iterations per worker.
    #[arg(long)]
    iteration_limit: Option<u64>,

    /// Iterations without improvement after which a worker stops.
    #[arg(long, default_value_t = 200_000)]
    stagnation_limit: u64,

    /// Number of parallel workers.
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Base random seed; worker `i` uses `seed + i`.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of later vertical photos each vertical photo is paired with.
    #[arg(long, default_value_t = slideshow_model::generator::DEFAULT_PAIRING_WINDOW)]
    pairing_window: usize,

    /// Pair every two vertical photos, ignoring `--pairing-window`.
    #[arg(long)]
    exhaustive_pairing: bool,

    /// Acceptance rule of the local search.
    #[arg(long, value_enum, default_value_t = MetaheuristicArg::Greedy)]
    metaheuristic: MetaheuristicArg,

    /// Interval in seconds between progress log lines of each worker.
    #[arg(long)]
    log_interval: Option<f64>,
}

impl Cli {
    fn config(&self) -> Result<SolverConfig> {
        let pairing = if self.exhaustive_pairing {
            PairingStrategy::Exhaustive
        } else {
            PairingStrategy::Windowed {
                window: self.pairing_window,
            }
        };

        let mut config = SolverConfig::new()
            .with_time_limit_secs(self.time_limit)
            .with_stagnation_limit(self.stagnation_limit)
            .with_workers(self.workers)
            .with_seed(self.seed)
            .with_pairing(pairing)
            .with_metaheuristic(self.metaheuristic.into());
        if let Some(limit) = self.iteration_limit {
            config = config.with_iteration_limit(limit);
        }
        if let Some(secs) = self.log_interval {
            let interval = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("invalid log interval: {secs}"))?;
            config = config.with_log_interval(interval);
        }
        Ok(config)
    }

    fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let derived = self.input.with_extension("out");
        if derived != self.input {
            return derived;
        }
        let mut name = self.input.clone().into_os_string();
        name.push(".out");
        PathBuf::from(name)
    }
}

fn run(cli: &Cli) -> Result<PathBuf> {
    let solver = Solver::new(cli.config()?).context("invalid solver configuration")?;
    let output = cli.output_path();
    anyhow::ensure!(
        output != cli.input,
        "output path {} would overwrite the input",
        output.display()
    );

    let catalog = CatalogLoader::new()
        .from_path(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    tracing::info!(photos = catalog.len(), input = %cli.input.display(), "loaded catalog");

    let slides = solver.generate_slides(&catalog);
    let outcome = solver
        .solve_slides(&catalog, &slides)
        .context("failed to solve")?;

    let report = SolutionReport::new(outcome.sequence(), &slides);
    write_report(&report, &output)?;

    let stats = outcome.statistics();
    tracing::info!(
        score = report.total_score(),
        slides = report.len(),
        reason = %outcome.reason(),
        iterations = stats.total_iterations,
        confidence = stats.confidence,
        output = %output.display(),
        "wrote slideshow"
    );
    Ok(output)
}

fn write_report(report: &SolutionReport, path: &Path) -> Result<()> {
    std::fs::write(path, report.render())
        .with_context(|| format!("failed to write {}", path.display()))
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
