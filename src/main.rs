//! wake-farm entry point: CLI wiring and config-driven evaluation.

use std::path::Path;
use std::process;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wake_farm::config::ScenarioConfig;
use wake_farm::error::WakeResult;
use wake_farm::farm::FarmReport;
use wake_farm::io::export::{export_field_csv, export_turbines_csv};
use wake_farm::layout::LayoutReport;
use wake_farm::power_curve::study::{PowerStudy, run_power_study};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    turbines_out: Option<String>,
    field_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

/// Everything one scenario run produces.
struct Evaluation {
    farm: FarmReport,
    layout: LayoutReport,
    study: PowerStudy,
}

fn print_help() {
    eprintln!("wake-farm: Jensen wake model and wind-farm power aggregation");
    eprintln!();
    eprintln!("Usage: wake-farm [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>             Override random seed of the power study");
    eprintln!("  --turbines-out <path>    Export per-turbine results to CSV");
    eprintln!("  --field-out <path>       Export the effective wind field to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after evaluation");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostic output on stderr.");
}

/// Returns the value following flag `name`, exiting if it is missing.
fn flag_value(args: &[String], i: usize, name: &str, kind: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {name} requires a {kind} argument");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        turbines_out: None,
        field_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                cli.scenario_path = Some(flag_value(&args, i, "--scenario", "path"));
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(flag_value(&args, i, "--preset", "name"));
            }
            "--seed" => {
                i += 1;
                let raw = flag_value(&args, i, "--seed", "u64");
                if let Ok(s) = raw.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{raw}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--turbines-out" => {
                i += 1;
                cli.turbines_out = Some(flag_value(&args, i, "--turbines-out", "path"));
            }
            "--field-out" => {
                i += 1;
                cli.field_out = Some(flag_value(&args, i, "--field-out", "path"));
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = flag_value(&args, i, "--port", "u16");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Runs the point model, the grid model, and the power study for one scenario.
fn evaluate(cfg: &ScenarioConfig) -> WakeResult<Evaluation> {
    let farm = cfg.build_farm()?.evaluate()?;

    let ambient = cfg.build_ambient_field()?;
    let evaluator = cfg.layout_evaluator(ambient)?;
    let layout = evaluator.report(&cfg.layout_coords())?;

    let study = run_power_study(
        &cfg.power_curve()?,
        cfg.study.weibull_shape,
        cfg.study.weibull_scale,
        cfg.study.samples,
        cfg.simulation.seed,
    )?;

    Ok(Evaluation {
        farm,
        layout,
        study,
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let evaluation = match evaluate(&scenario) {
        Ok(ev) => ev,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    info!(
        turbines = evaluation.farm.turbines.len(),
        total_power_kw = evaluation.farm.total_power_kw,
        fitness = evaluation.layout.fitness,
        "scenario evaluated"
    );
    if evaluation.layout.penalty > 0.0 {
        warn!(
            penalty = evaluation.layout.penalty,
            min_spacing = scenario.field.min_spacing,
            "grid layout violates minimum turbine spacing"
        );
    }

    for t in &evaluation.farm.turbines {
        println!("{t}");
    }
    println!("\n{}", evaluation.farm);
    println!("\n{}", evaluation.layout);
    println!("\n{}", evaluation.study);

    if let Some(ref path) = cli.turbines_out {
        if let Err(e) = export_turbines_csv(&evaluation.farm.turbines, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Turbine results written to {path}");
    }

    if let Some(ref path) = cli.field_out {
        if let Err(e) = export_field_csv(&evaluation.layout.effective, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Effective field written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(wake_farm::api::AppState {
            farm: evaluation.farm,
            layout: evaluation.layout,
            study: evaluation.study,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(wake_farm::api::serve(state, addr));
    }
}
