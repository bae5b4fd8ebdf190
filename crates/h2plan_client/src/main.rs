//! `h2plan`: drive the optimization worker from the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use h2plan_client::orchestrator::DEFAULT_POLL_INTERVAL;
use h2plan_client::{GridSearchOrchestrator, HttpWorkerClient, SensitivityExplorer, SweepSpec};
use h2plan_core::catalog::VariableCatalog;
use h2plan_core::config::BaseInput;
use h2plan_core::model::{TargetKpi, VariableRange};
use h2plan_core::projection::{ColorScale, locate_optimum};

#[derive(Parser)]
#[command(name = "h2plan", version, about = "Explore the parameter space of a hydrogen production project")]
struct Cli {
    /// Base URL of the optimization worker
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    worker_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the explorable variables and their bounds
    Variables,

    /// Submit a grid sweep and poll it to completion
    Sweep {
        /// JSON file with the base configuration (defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Range to sweep, as name=min:max:step (repeatable)
        #[arg(long = "vary", required = true)]
        vary: Vec<String>,

        /// Target KPI: npv_p50, irr_p50 or lcoh
        #[arg(long, default_value = "npv_p50", value_parser = parse_target)]
        target: TargetKpi,

        /// Monte Carlo iterations per combination
        #[arg(long, default_value_t = 1000)]
        iterations: u32,

        /// Client-side ceiling on the combination count
        #[arg(long, default_value_t = 1000)]
        max_combinations: u64,
    },

    /// Run a sensitivity exploration (optionally over two chosen variables)
    Explore {
        /// JSON file with the base configuration (defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Variable to explore (repeat for a two-variable contour)
        #[arg(long = "var")]
        variables: Vec<String>,

        #[arg(long, default_value_t = 20)]
        resolution: u32,

        /// Target KPI: npv_p50, irr_p50 or lcoh
        #[arg(long, default_value = "npv_p50", value_parser = parse_target)]
        target: TargetKpi,
    },
}

fn parse_target(raw: &str) -> Result<TargetKpi, String> {
    raw.parse().map_err(|err| format!("{err}"))
}

/// "capex=10e9:30e9:5e9" -> VariableRange, display metadata from the catalog.
fn parse_range(raw: &str, catalog: &VariableCatalog) -> Result<VariableRange, String> {
    let (name, bounds) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=min:max:step, got '{raw}'"))?;
    let parts: Vec<&str> = bounds.split(':').collect();
    let [min, max, step] = parts.as_slice() else {
        return Err(format!("expected name=min:max:step, got '{raw}'"));
    };

    let parse = |field: &str, value: &str| {
        value
            .parse::<f64>()
            .map_err(|_| format!("invalid {field} '{value}' in '{raw}'"))
    };

    let variable = catalog
        .get(name)
        .ok_or_else(|| format!("unknown variable '{name}'"))?;
    VariableRange::new(
        variable.name.clone(),
        variable.display_name.clone(),
        parse("min", min)?,
        parse("max", max)?,
        parse("step", step)?,
        variable.unit.clone(),
    )
    .map_err(|err| err.to_string())
}

fn load_base_input(path: Option<&PathBuf>) -> Result<BaseInput, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(BaseInput::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let worker = Arc::new(HttpWorkerClient::new(&cli.worker_url));
    let catalog = Arc::new(VariableCatalog::standard());

    match cli.command {
        Command::Variables => {
            for variable in catalog.variables() {
                println!(
                    "{:<26} {:<10} {:>12} .. {:<12} step {:<10} default {} {}",
                    variable.name,
                    format!("[{:?}]", variable.category).to_lowercase(),
                    variable.min_value,
                    variable.max_value,
                    variable.step,
                    variable.default_value,
                    variable.unit,
                );
            }
        }

        Command::Sweep {
            config,
            vary,
            target,
            iterations,
            max_combinations,
        } => {
            let base_input = load_base_input(config.as_ref())?;
            let ranges = vary
                .iter()
                .map(|raw| parse_range(raw, &catalog))
                .collect::<Result<Vec<_>, _>>()?;

            let orchestrator = GridSearchOrchestrator::new(Arc::clone(&worker), Arc::clone(&catalog));
            let mut handle = orchestrator
                .start(SweepSpec {
                    base_input,
                    ranges,
                    target_kpi: target,
                    monte_carlo_iterations: iterations,
                    max_combinations,
                })
                .await?;

            println!("job {} submitted", handle.job_id());
            handle.wait(DEFAULT_POLL_INTERVAL).await;
            let snapshot = handle.require_completed()?;

            println!(
                "completed {}/{} combinations",
                snapshot.completed_combinations, snapshot.total_combinations
            );
            if let Some(best) = &snapshot.best_result {
                println!(
                    "best (rank {}): NPV P50 {:.3e}, IRR P50 {:.2}%, LCOH {:.0}",
                    best.rank, best.npv_p50, best.irr_p50, best.lcoh
                );
                for (name, value) in &best.combination {
                    println!("  {name} = {value}");
                }
            }
            if let Some(grid) = &snapshot.heatmap_data {
                let scale = ColorScale::new(&grid.z_matrix, target.is_minimized());
                println!(
                    "heatmap: {} x {} over ({}, {})",
                    grid.x_values.len(),
                    grid.y_values.len(),
                    grid.x_variable,
                    grid.y_variable
                );
                if let Some(marker) = locate_optimum(grid) {
                    let color = scale.color_for(Some(marker.z));
                    println!(
                        "optimum at cell ({}, {}) -> ({:.2}, {:.2}), {}",
                        marker.col,
                        marker.row,
                        marker.x_norm,
                        marker.y_norm,
                        color.to_hex()
                    );
                }
            }
        }

        Command::Explore {
            config,
            variables,
            resolution,
            target,
        } => {
            let base_input = load_base_input(config.as_ref())?;
            let selection = (!variables.is_empty()).then_some(variables);

            let explorer = SensitivityExplorer::new(Arc::clone(&worker), Arc::clone(&catalog));
            let outcome = explorer
                .explore(base_input, selection, resolution, target)
                .await?;

            println!("sensitivity ranking:");
            for rank in &outcome.ranking {
                println!(
                    "  {:<26} impact {:>6.1}%  swing {:.3e}  ({:+.1}% / {:+.1}%)",
                    rank.variable,
                    rank.impact_score,
                    rank.npv_swing,
                    rank.low_case_pct,
                    rank.high_case_pct
                );
            }
            println!("explored: {}", outcome.selected_variables.join(", "));

            if let Some(grid) = &outcome.contour {
                println!(
                    "contour: {} x {} over ({}, {})",
                    grid.x_values.len(),
                    grid.y_values.len(),
                    grid.x_variable,
                    grid.y_variable
                );
                if let Some(marker) = locate_optimum(grid) {
                    println!(
                        "optimum near {} = {:.4}, {} = {:.4}",
                        grid.x_variable,
                        grid.x_values[marker.col],
                        grid.y_variable,
                        grid.y_values[marker.row]
                    );
                }
            }
            for line in &outcome.recommendations {
                println!("note: {line}");
            }
        }
    }

    Ok(())
}
