// Infrastructure: command line front end
// Reads an epoch request document, solves it and prints the report

use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

use crate::application::{close_epoch, EpochRequest};
use crate::domain::{models::SolverConfig, value_objects::SolverBackend};
use crate::epoch::EpochSolver;

#[derive(Debug, Parser)]
#[command(name = "epoch-solver")]
#[command(about = "Decide which pending tranche orders execute at epoch close", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Epoch request JSON (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// LP engine: auto, microlp, coin-cbc or highs
    #[arg(short, long, default_value = "auto")]
    pub backend: SolverBackend,

    /// Engine time limit in seconds
    #[arg(long)]
    pub time_limit: Option<f64>,

    /// Declare order variables as integers
    #[arg(long)]
    pub integer: bool,

    /// Also report the investment capacity of this tranche
    #[arg(long, value_name = "INDEX")]
    pub capacity_for: Option<usize>,

    /// Print the LP model instead of solving it
    #[arg(long)]
    pub emit_lp: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn solver_config(&self) -> SolverConfig {
        let mut config = SolverConfig::default()
            .with_backend(self.backend)
            .with_integer_variables(self.integer)
            .with_verbose(self.verbose);
        if let Some(limit) = self.time_limit {
            config = config.with_time_limit(limit);
        }
        config
    }
}

pub fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let raw = match &cli.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let request: EpochRequest = serde_json::from_str(&raw)?;

    let solver = EpochSolver::with_config(cli.solver_config())?;
    tracing::info!(
        engine = solver.engine_name(),
        tranches = request.state.tranches.len(),
        "closing epoch"
    );

    if cli.emit_lp {
        let model = solver.build_model(
            &request.state,
            &request.orders,
            &request.effective_weights()?,
            cli.capacity_for,
        )?;
        print!("{}", crate::solver::to_lp_string(&model));
        return Ok(());
    }

    let capacity_for = cli.capacity_for;
    let report = tokio::task::spawn_blocking(move || close_epoch(&solver, &request, capacity_for))
        .await??;

    if !report.is_feasible {
        tracing::warn!("no orders can be executed this epoch");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_solver_config() {
        let cli = Cli::parse_from([
            "epoch-solver",
            "--backend",
            "microlp",
            "--time-limit",
            "2.5",
            "--integer",
            "--capacity-for",
            "1",
        ]);

        let config = cli.solver_config();
        assert_eq!(config.backend, SolverBackend::MicroLp);
        assert_eq!(config.time_limit, Some(2.5));
        assert!(config.integer_variables);
        assert_eq!(cli.capacity_for, Some(1));
        assert!(cli.input.is_none());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["epoch-solver", "--backend", "glpk"]).is_err());
    }
}
