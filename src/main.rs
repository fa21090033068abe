use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use reinsurance_calc::config::ScenarioConfig;
use reinsurance_calc::report;
use reinsurance_calc::summary::{self, CashflowSummary};

struct Args {
    config_path: Option<String>,
    csv_path: Option<String>,
    output_path: Option<String>,
    quiet: bool,
}

fn flag_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i).cloned().ok_or_else(|| format!("{flag} requires a path"))
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args { config_path: None, csv_path: None, output_path: None, quiet: false };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => parsed.config_path = Some(flag_value(&args, &mut i, "--config")?),
            "--csv" => parsed.csv_path = Some(flag_value(&args, &mut i, "--csv")?),
            "--output" => parsed.output_path = Some(flag_value(&args, &mut i, "--output")?),
            "--quiet" => parsed.quiet = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(parsed)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config_path {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::canonical(),
    };

    let treaty = config.treaty()?;
    let rows = treaty.calculate_cashflow(&config.periods)?;
    info!(scenario = %config.name, kind = treaty.terms().kind(), rows = rows.len(), "cashflow computed");

    if let Some(path) = &args.csv_path {
        report::write_csv(path, &rows)?;
        info!(path = %path, "wrote CSV");
    }
    if let Some(path) = &args.output_path {
        let mut writer = BufWriter::new(File::create(path)?);
        report::write_ndjson(&mut writer, &rows)?;
        writer.flush()?;
        info!(path = %path, "wrote NDJSON");
    }

    if args.quiet {
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "=== {} ({}) ===", config.name, treaty.terms().kind())?;
    report::write_cashflow_table(&mut out, &rows)?;
    writeln!(out, "\n=== Summary ===")?;
    report::write_summary(&mut out, &CashflowSummary::from_rows(&rows)?)?;

    if !config.alternatives.is_empty() {
        let comparison = summary::compare_structures(&config.structures()?, &config.periods)?;
        writeln!(out, "\n=== Structure comparison ===")?;
        report::write_comparison(&mut out, &comparison)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = match parse_args() {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: reinsurance_calc [--config scenario.json] [--csv rows.csv] [--output rows.ndjson] [--quiet]");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "calculation failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
