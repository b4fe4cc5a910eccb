use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use zd_project::{ProjectResult, compile_case, load_case, validate_case};
use zd_reactor::ConstPressureMoleReactor;
use zd_solver::{
    SimRecord, finite_difference_jacobian, max_abs_deviation, run_sim, sparse_to_dense,
};

#[derive(Parser)]
#[command(name = "zd-cli")]
#[command(about = "Zero-dimensional constant-pressure reactor tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a case file
    Validate {
        /// Path to the case file (YAML or JSON)
        case_path: PathBuf,
    },
    /// List the state components of a case in index order
    Components {
        /// Path to the case file (YAML or JSON)
        case_path: PathBuf,
    },
    /// Assemble the Jacobian at the initial state and compare with finite differences
    Jacobian {
        /// Path to the case file (YAML or JSON)
        case_path: PathBuf,
        /// Relative finite-difference step
        #[arg(long, default_value_t = 1e-7)]
        epsilon: f64,
    },
    /// Integrate a case with backward Euler
    Run {
        /// Path to the case file (YAML or JSON)
        case_path: PathBuf,
        /// Time step in seconds (overrides the case file)
        #[arg(long)]
        dt: Option<f64>,
        /// End time in seconds (overrides the case file)
        #[arg(long)]
        t_end: Option<f64>,
        /// Output file, `.csv` or `.json` (optional, prints the final state otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ProjectResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Components { case_path } => cmd_components(&case_path),
        Commands::Jacobian { case_path, epsilon } => cmd_jacobian(&case_path, epsilon),
        Commands::Run {
            case_path,
            dt,
            t_end,
            output,
        } => cmd_run(&case_path, dt, t_end, output.as_deref()),
    }
}

fn cmd_validate(case_path: &Path) -> ProjectResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = load_case(case_path)?;
    validate_case(&case)?;
    // catches mechanism errors that only show up when equations are parsed
    compile_case(&case)?;
    println!("✓ Case is valid");
    Ok(())
}

fn initialized_reactor(case_path: &Path) -> ProjectResult<ConstPressureMoleReactor> {
    let case = load_case(case_path)?;
    let mut reactor = compile_case(&case)?.reactor;
    reactor.initialize(0.0)?;
    Ok(reactor)
}

fn cmd_components(case_path: &Path) -> ProjectResult<()> {
    let reactor = initialized_reactor(case_path)?;
    println!("Components of reactor '{}':", reactor.name());
    for i in 0..reactor.neq() {
        println!("  {:>4}  {}", i, reactor.component_name(i)?);
    }
    Ok(())
}

fn cmd_jacobian(case_path: &Path, epsilon: f64) -> ProjectResult<()> {
    let mut reactor = initialized_reactor(case_path)?;

    let start = Instant::now();
    let jac = reactor.jacobian()?;
    let assembly_s = start.elapsed().as_secs_f64();

    let time = reactor.time();
    let fd = finite_difference_jacobian(&mut reactor, time, epsilon)?;
    let deviation = max_abs_deviation(&sparse_to_dense(&jac), &fd)?;

    let (rows, cols) = jac.shape();
    println!("Jacobian of reactor '{}':", reactor.name());
    println!("  Shape:      {} x {}", rows, cols);
    println!("  Non-zeros:  {}", jac.nnz());
    println!("  Assembly:   {:.3e} s", assembly_s);
    println!(
        "  Max |analytic - finite difference| = {:.3e} (epsilon = {:.1e})",
        deviation, epsilon
    );
    Ok(())
}

fn cmd_run(
    case_path: &Path,
    dt: Option<f64>,
    t_end: Option<f64>,
    output: Option<&Path>,
) -> ProjectResult<()> {
    let case = load_case(case_path)?;
    let mut compiled = compile_case(&case)?;
    if let Some(dt) = dt {
        compiled.options.dt = dt;
    }
    if let Some(t_end) = t_end {
        compiled.options.t_end = t_end;
    }
    println!("Running case: {}", case.name);
    println!(
        "  dt = {:.3e} s, t_end = {:.3e} s",
        compiled.options.dt, compiled.options.t_end
    );

    let start = Instant::now();
    let record = run_sim(&mut compiled.reactor, &compiled.options)?;
    println!(
        "✓ Simulation completed in {:.3} s ({} recorded points)",
        start.elapsed().as_secs_f64(),
        record.t.len()
    );

    match output {
        Some(path) => {
            let is_json = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            let content = if is_json {
                serde_json::to_string_pretty(&record_json(&record))?
            } else {
                record_csv(&record)
            };
            std::fs::write(path, content)?;
            println!("✓ Wrote {} rows to {}", record.t.len(), path.display());
        }
        None => {
            if let (Some(t), Some(y)) = (record.t.last(), record.last()) {
                println!("\nFinal state at t = {:.6e} s:", t);
                for (name, v) in record.names.iter().zip(y) {
                    println!("  {:<16} {:.6e}", name, v);
                }
            }
        }
    }
    Ok(())
}

fn record_csv(record: &SimRecord) -> String {
    let mut csv = String::from("time_s");
    for name in &record.names {
        csv.push(',');
        csv.push_str(name);
    }
    csv.push('\n');
    for (t, y) in record.t.iter().zip(&record.y) {
        csv.push_str(&t.to_string());
        for v in y {
            csv.push(',');
            csv.push_str(&v.to_string());
        }
        csv.push('\n');
    }
    csv
}

fn record_json(record: &SimRecord) -> serde_json::Value {
    serde_json::json!({
        "names": record.names,
        "time_s": record.t,
        "states": record.y,
    })
}
