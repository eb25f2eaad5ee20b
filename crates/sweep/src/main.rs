#![forbid(unsafe_code)]

mod case;
mod plan;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use plan::{Param, SweepPlan};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sr_storage::StoreConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// One-parameter-at-a-time sensitivity sweep over minting, assignment and
/// transfer throughput.
#[derive(Parser, Debug)]
#[command(name = "sr-sweep")]
struct Cli {
    /// Store directory; its database is deleted before every case.
    #[arg(long, env = "STOCKROOM_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,
    /// Directory for sweep_*.csv and sweep_summary.json.
    #[arg(long, default_value = "sweep-results")]
    out_dir: PathBuf,
    /// Small sweep values for a fast run.
    #[arg(long)]
    quick: bool,
    /// Benchmark-only pragmas (synchronous=OFF, in-memory journal).
    #[arg(long)]
    fast_pragma: bool,
    /// Sweep only these parameters.
    #[arg(long, value_enum, num_args = 1..)]
    only: Vec<Param>,
    #[arg(long)]
    seed: Option<u64>,
    /// YAML file overriding baseline and sweep values.
    #[arg(long)]
    plan: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let env_config = StoreConfig::from_env();
    let store_config = StoreConfig::new(cli.storage_dir.unwrap_or(env_config.storage_dir))
        .with_fast_pragmas(cli.fast_pragma || env_config.fast_pragmas);

    let mut sweep_plan = if cli.quick {
        SweepPlan::quick()
    } else {
        SweepPlan::full()
    };
    if let Some(path) = &cli.plan {
        sweep_plan = sweep_plan.load_overlay(path)?;
    }
    let params = if cli.only.is_empty() {
        Param::ALL.to_vec()
    } else {
        cli.only.clone()
    };

    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create {}", cli.out_dir.display()))?;
    info!(
        storage_dir = %store_config.storage_dir.display(),
        out_dir = %cli.out_dir.display(),
        seed,
        quick = cli.quick,
        fast_pragmas = store_config.fast_pragmas,
        "sweep starting"
    );

    let mut all_rows = Vec::new();
    for param in params {
        info!(
            param = param.as_str(),
            values = ?sweep_plan.values(param),
            baseline = ?sweep_plan.baseline,
            "sweep"
        );
        let mut rows = Vec::new();
        for case in sweep_plan.cases(param) {
            let result = case::run_case(&store_config, param, case, &mut rng)
                .with_context(|| format!("case {}={}", param.as_str(), case.get(param)))?;
            rows.push(result);
        }
        let path = report::write_csv(&cli.out_dir, param, &rows)?;
        info!(param = param.as_str(), path = %path.display(), "csv written");
        all_rows.extend(rows);
    }

    let path = report::write_summary(
        &cli.out_dir,
        seed,
        cli.quick,
        store_config.fast_pragmas,
        &all_rows,
    )?;
    info!(path = %path.display(), cases = all_rows.len(), "summary written");
    Ok(())
}

fn init_tracing() {
    // per-operation store events drown the case timings at info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sr_storage=warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
